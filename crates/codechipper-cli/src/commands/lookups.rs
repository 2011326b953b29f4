use std::io::Write;

use codechipper::lookups::{CodeStats, LookupBundle};
use serde::Serialize;

use crate::{
    input_output::OutputArgs,
    logging::{LogArgs, WARN_LEVEL},
    lookup_args::LookupArgs,
};

/// Args for the lookups command.
#[derive(clap::Args, Debug)]
pub struct LookupsArgs {
    #[clap(flatten)]
    pub logging: LogArgs,

    #[clap(flatten)]
    pub lookup: LookupArgs,

    /// Number of top-ranked codes to list.
    #[arg(long, default_value = "10")]
    top: usize,

    #[command(flatten)]
    output: OutputArgs,
}

/// A ranked code entry in the summary.
#[derive(Debug, Serialize)]
struct RankedCode<'a> {
    code: &'a str,
    coarse: &'a str,

    #[serde(flatten)]
    stats: &'a CodeStats,
}

/// The JSON summary of a [`LookupBundle`].
#[derive(Debug, Serialize)]
struct LookupSummary<'a> {
    vocab_size: usize,
    pad_index: i64,
    unk_index: i64,
    num_fine: usize,
    num_coarse: usize,
    num_invalid: usize,
    num_non_billable: usize,
    desc_width: usize,
    top_codes: Vec<RankedCode<'a>>,
}

impl<'a> LookupSummary<'a> {
    fn new(
        lookups: &'a LookupBundle,
        top: usize,
    ) -> Self {
        let mut ranked = lookups
            .fine()
            .iter()
            .zip(lookups.stats())
            .map(|((idx, code), stats)| RankedCode {
                code,
                coarse: lookups
                    .coarse()
                    .code(lookups.fine2coarse()[idx])
                    .unwrap_or_default(),
                stats,
            })
            .collect::<Vec<_>>();
        ranked.sort_by_key(|entry| (entry.stats.rank, entry.code));
        ranked.truncate(top);

        Self {
            vocab_size: lookups.vocab().len(),
            pad_index: lookups.vocab().pad_index(),
            unk_index: lookups.unk_index(),
            num_fine: lookups.num_fine(),
            num_coarse: lookups.num_coarse(),
            num_invalid: lookups.stats().iter().filter(|s| !s.valid).count(),
            num_non_billable: lookups.stats().iter().filter(|s| !s.billable).count(),
            desc_width: lookups.desc().ncols(),
            top_codes: ranked,
        }
    }
}

impl LookupsArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.init(WARN_LEVEL)?;

        let (_, lookups) = self.lookup.build()?;
        let summary = LookupSummary::new(&lookups, self.top);

        let mut writer = self.output.open_writer()?;
        serde_json::to_writer_pretty(&mut writer, &summary)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}
