use std::path::PathBuf;

use codechipper::data::NoteDataset;

use crate::{
    logging::{INFO_LEVEL, LogArgs},
    lookup_args::LookupArgs,
};

/// Args for the batches command.
#[derive(clap::Args, Debug)]
pub struct BatchesArgs {
    /// Labeled split file (`.csv` or `.ndjson`).
    split: PathBuf,

    #[clap(flatten)]
    pub logging: LogArgs,

    #[clap(flatten)]
    pub lookup: LookupArgs,

    /// Examples per batch.
    #[arg(long, default_value = "16")]
    batch_size: usize,
}

impl BatchesArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.init(INFO_LEVEL)?;

        let (options, lookups) = self.lookup.build()?;
        log::info!(
            "fine codes: {}, coarse codes: {}, vocab: {}",
            lookups.num_fine(),
            lookups.num_coarse(),
            lookups.vocab().len()
        );

        let dataset = NoteDataset::open(&self.split, &lookups, options.max_len)?;
        log::info!("examples: {}", dataset.len());

        let mut total = 0;
        for (idx, batch) in dataset.batches(self.batch_size).enumerate() {
            let batch = batch?;
            total += batch.len();
            log::info!(
                "batch {idx}: tokens {:?}, fine {:?}, coarse {:?}",
                batch.tokens.shape(),
                batch.target_fine.shape(),
                batch.target_coarse.shape()
            );
        }
        log::info!("collated {total} examples");

        Ok(())
    }
}
