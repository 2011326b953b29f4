use std::path::PathBuf;

use codechipper::lookups::{LookupBundle, LookupOptions, load_lookup_options_path};

/// Lookup construction arg group.
///
/// Flags given on the command line override values loaded via `--options`.
#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// JSON `LookupOptions` file.
    #[arg(long, default_value = None)]
    pub options: Option<PathBuf>,

    /// Train split path; dev/test siblings are derived from it.
    #[arg(long, default_value = None)]
    pub data_path: Option<PathBuf>,

    /// Directory holding the reference description tables.
    #[arg(long, default_value = None)]
    pub data_dir: Option<PathBuf>,

    /// Base word list.
    #[arg(long, default_value = None)]
    pub vocab: Option<PathBuf>,

    /// Keep codes without descriptions.
    #[arg(long)]
    pub include_invalid: bool,

    /// Skip the supplementary description list.
    #[arg(long)]
    pub exclude_non_billable: bool,

    /// Fold description words into the vocabulary.
    #[arg(long)]
    pub embed_desc: bool,

    /// Disjoint fine and coarse code enumerations.
    #[arg(long)]
    pub hierarchical: bool,

    /// Truncate notes to this many tokens.
    #[arg(long, default_value = None)]
    pub max_len: Option<usize>,
}

impl LookupArgs {
    /// Resolve the effective [`LookupOptions`].
    pub fn lookup_options(&self) -> Result<LookupOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.options {
            Some(path) => load_lookup_options_path(path)?,
            None => LookupOptions::default(),
        };

        if let Some(data_path) = &self.data_path {
            options.data_path = data_path.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            options.data_dir = data_dir.clone();
        }
        if let Some(vocab) = &self.vocab {
            options.vocab_path = vocab.clone();
        }
        if self.max_len.is_some() {
            options.max_len = self.max_len;
        }

        options.include_invalid |= self.include_invalid;
        options.exclude_non_billable |= self.exclude_non_billable;
        options.embed_desc |= self.embed_desc;
        options.hierarchical |= self.hierarchical;

        if options.data_path.as_os_str().is_empty() {
            return Err("no train split given; use --data-path or --options".into());
        }

        Ok(options)
    }

    /// Resolve the options and build the [`LookupBundle`].
    pub fn build(&self) -> Result<(LookupOptions, LookupBundle), Box<dyn std::error::Error>> {
        let options = self.lookup_options()?;
        log::info!("building lookups from {}", options.data_path.display());
        let lookups = options.build()?;
        Ok((options, lookups))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(clap::Parser, Debug)]
    struct TestArgs {
        #[clap(flatten)]
        lookup: LookupArgs,
    }

    #[test]
    fn test_flags_to_options() {
        let args = TestArgs::try_parse_from([
            "test",
            "--data-path",
            "mimic/train_50.csv",
            "--data-dir",
            "mimic",
            "--vocab",
            "mimic/vocab.csv",
            "--hierarchical",
            "--max-len",
            "2500",
        ])
        .unwrap();

        let options = args.lookup.lookup_options().unwrap();
        assert_eq!(options.data_path, PathBuf::from("mimic/train_50.csv"));
        assert_eq!(options.data_dir, PathBuf::from("mimic"));
        assert_eq!(options.vocab_path, PathBuf::from("mimic/vocab.csv"));
        assert!(options.hierarchical);
        assert!(!options.embed_desc);
        assert_eq!(options.max_len, Some(2500));
    }

    #[test]
    fn test_flags_override_options_file() {
        let dir = tempdir::TempDir::new("cchipper_args").unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(
            &path,
            r#"{"data_path": "a/train_full.csv", "data_dir": "a", "max_len": 100}"#,
        )
        .unwrap();

        let args = TestArgs::try_parse_from([
            "test",
            "--options",
            path.to_str().unwrap(),
            "--data-dir",
            "b",
            "--embed-desc",
        ])
        .unwrap();

        let options = args.lookup.lookup_options().unwrap();
        assert_eq!(options.data_path, PathBuf::from("a/train_full.csv"));
        assert_eq!(options.data_dir, PathBuf::from("b"));
        assert_eq!(options.max_len, Some(100));
        assert!(options.embed_desc);
    }

    #[test]
    fn test_missing_data_path() {
        let args = TestArgs::try_parse_from(["test", "--data-dir", "mimic"]).unwrap();
        assert!(args.lookup.lookup_options().is_err());
    }
}
