use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{CCResult, CodechipperError},
    lookups::LookupBundle,
};

/// Options for building a [`LookupBundle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupOptions {
    /// Path to the train split; dev/test siblings are derived from it.
    pub data_path: PathBuf,

    /// Directory holding the reference description tables.
    pub data_dir: PathBuf,

    /// Path to the base word list.
    pub vocab_path: PathBuf,

    /// Keep codes which have no description (marked invalid and non-billable).
    pub include_invalid: bool,

    /// Skip the supplementary (non-billable) description list.
    pub exclude_non_billable: bool,

    /// Fold description tokens into the vocabulary.
    pub embed_desc: bool,

    /// Split codes into disjoint fine and coarse enumerations.
    pub hierarchical: bool,

    /// Truncate note token sequences to this length.
    pub max_len: Option<usize>,
}

impl LookupOptions {
    /// Create options for the given input paths, with all flags off.
    pub fn new<P: AsRef<Path>>(
        data_path: P,
        data_dir: P,
        vocab_path: P,
    ) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
            vocab_path: vocab_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set whether codes without descriptions are kept.
    pub fn with_include_invalid(
        mut self,
        include_invalid: bool,
    ) -> Self {
        self.include_invalid = include_invalid;
        self
    }

    /// Set whether the supplementary description list is skipped.
    pub fn with_exclude_non_billable(
        mut self,
        exclude_non_billable: bool,
    ) -> Self {
        self.exclude_non_billable = exclude_non_billable;
        self
    }

    /// Set whether description tokens are folded into the vocabulary.
    pub fn with_embed_desc(
        mut self,
        embed_desc: bool,
    ) -> Self {
        self.embed_desc = embed_desc;
        self
    }

    /// Set hierarchical (disjoint fine/coarse) mode.
    pub fn with_hierarchical(
        mut self,
        hierarchical: bool,
    ) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    /// Set the note truncation length.
    pub fn with_max_len(
        mut self,
        max_len: Option<usize>,
    ) -> Self {
        self.max_len = max_len;
        self
    }

    /// Build the [`LookupBundle`].
    ///
    /// See [`crate::lookups::load_lookups`].
    pub fn build(&self) -> CCResult<LookupBundle> {
        crate::lookups::load_lookups(self)
    }
}

/// Load [`LookupOptions`] from a JSON file.
///
/// Missing fields take their defaults.
pub fn load_lookup_options_path(path: impl AsRef<Path>) -> CCResult<LookupOptions> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CodechipperError::MissingFile(path.to_path_buf()));
    }
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = LookupOptions::new("mimic/train_full.csv", "mimic", "mimic/vocab.csv")
            .with_include_invalid(true)
            .with_embed_desc(true)
            .with_hierarchical(true)
            .with_max_len(Some(2500));

        assert_eq!(options.data_path, PathBuf::from("mimic/train_full.csv"));
        assert_eq!(options.data_dir, PathBuf::from("mimic"));
        assert!(options.include_invalid);
        assert!(!options.exclude_non_billable);
        assert!(options.embed_desc);
        assert!(options.hierarchical);
        assert_eq!(options.max_len, Some(2500));
    }

    #[test]
    fn test_options_json() -> CCResult<()> {
        let options: LookupOptions = serde_json::from_str(
            r#"{"data_path": "train_50.ndjson", "exclude_non_billable": true}"#,
        )?;
        assert_eq!(options.data_path, PathBuf::from("train_50.ndjson"));
        assert!(options.exclude_non_billable);
        assert!(!options.hierarchical);
        assert_eq!(options.max_len, None);

        let dir = tempdir::TempDir::new("codechipper_options")?;
        let path = dir.path().join("options.json");
        std::fs::write(&path, serde_json::to_string(&options)?)?;
        assert_eq!(load_lookup_options_path(&path)?, options);

        assert!(matches!(
            load_lookup_options_path(dir.path().join("missing.json")),
            Err(CodechipperError::MissingFile(_))
        ));
        Ok(())
    }
}
