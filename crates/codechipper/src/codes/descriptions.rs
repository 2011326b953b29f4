//! # Code Descriptions
//!
//! Loads tokenized descriptions for codes from the MIMIC-III reference tables,
//! and (optionally) from a supplementary flat-file list of non-billable codes.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::{
    codes::{reformat, tokenize_description},
    errors::{CCResult, CodechipperError},
};

/// The diagnosis reference table file name.
pub const DIAGNOSES_TABLE: &str = "D_ICD_DIAGNOSES.csv";

/// The procedure reference table file name.
pub const PROCEDURES_TABLE: &str = "D_ICD_PROCEDURES.csv";

/// The supplementary description list file name.
pub const SUPPLEMENTARY_DESCRIPTIONS: &str = "ICD9_descriptions";

/// Tokenized code descriptions and billable flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionLookup {
    descriptions: BTreeMap<String, Vec<String>>,
    billable: BTreeMap<String, bool>,
}

impl DescriptionLookup {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every row of a reference table as a billable description.
    ///
    /// The table has a header row; the code is in column 1 and
    /// the description is the last column.
    ///
    /// ## Arguments
    /// * `reader` - the csv stream.
    /// * `is_diag` - true for the diagnosis table, false for procedures.
    pub fn read_reference_table<R: Read>(
        &mut self,
        reader: R,
        is_diag: bool,
    ) -> CCResult<()> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        if rdr.headers()?.is_empty() {
            return Err(CodechipperError::Parse(
                "missing reference table header".to_string(),
            ));
        }

        for (idx, row) in rdr.records().enumerate() {
            let row = row?;
            if row.len() < 2 {
                return Err(CodechipperError::Parse(format!(
                    "line {}: expected at least 2 columns, found {}",
                    idx + 2,
                    row.len()
                )));
            }

            let code = reformat(&row[1], is_diag);
            let desc = &row[row.len() - 1];
            self.descriptions
                .insert(code.clone(), tokenize_description(desc));
            self.billable.insert(code, true);
        }
        Ok(())
    }

    /// Add supplementary descriptions for codes not already present.
    ///
    /// Lines are a code followed by description words, whitespace delimited.
    /// Codes are taken as written. Added codes are marked non-billable.
    pub fn read_supplementary<R: BufRead>(
        &mut self,
        reader: R,
    ) -> CCResult<()> {
        for line in reader.lines() {
            let line = line?;
            let mut words = line.split_whitespace();
            let Some(code) = words.next() else {
                continue;
            };
            if self.descriptions.contains_key(code) {
                continue;
            }

            let desc = words.collect::<Vec<_>>().join(" ");
            self.descriptions
                .insert(code.to_string(), tokenize_description(&desc));
            self.billable.insert(code.to_string(), false);
        }
        Ok(())
    }

    /// Check if the code has a description entry (possibly empty).
    pub fn contains(
        &self,
        code: &str,
    ) -> bool {
        self.descriptions.contains_key(code)
    }

    /// The description tokens for a code; empty for unknown codes.
    pub fn tokens_for(
        &self,
        code: &str,
    ) -> &[String] {
        match self.descriptions.get(code) {
            Some(tokens) => tokens,
            None => &[],
        }
    }

    /// Whether the code came from an official reference table.
    ///
    /// Unknown codes are not billable.
    pub fn is_billable(
        &self,
        code: &str,
    ) -> bool {
        self.billable.get(code).copied().unwrap_or(false)
    }

    /// The set of described codes.
    pub fn codes(&self) -> BTreeSet<&str> {
        self.descriptions.keys().map(String::as_str).collect()
    }

    /// The number of described codes.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Check if there are no descriptions.
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

fn open_required(path: &Path) -> CCResult<File> {
    if !path.is_file() {
        return Err(CodechipperError::MissingFile(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Load the [`DescriptionLookup`] for a MIMIC-III data directory.
///
/// ## Arguments
/// * `data_dir` - directory holding [`DIAGNOSES_TABLE`], [`PROCEDURES_TABLE`],
///   and [`SUPPLEMENTARY_DESCRIPTIONS`].
/// * `exclude_non_billable` - skip the supplementary list.
pub fn load_code_descriptions(
    data_dir: impl AsRef<Path>,
    exclude_non_billable: bool,
) -> CCResult<DescriptionLookup> {
    let data_dir = data_dir.as_ref();
    let mut lookup = DescriptionLookup::new();

    lookup.read_reference_table(open_required(&data_dir.join(DIAGNOSES_TABLE))?, true)?;
    lookup.read_reference_table(open_required(&data_dir.join(PROCEDURES_TABLE))?, false)?;
    let billable = lookup.len();

    if !exclude_non_billable {
        let reader = BufReader::new(open_required(&data_dir.join(SUPPLEMENTARY_DESCRIPTIONS))?);
        lookup.read_supplementary(reader)?;
    }

    log::info!(
        "loaded {} code descriptions ({} billable)",
        lookup.len(),
        billable
    );
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGNOSES: &str = "\"ROW_ID\",\"ICD9_CODE\",\"SHORT_TITLE\",\"LONG_TITLE\"\n\
        1,\"25001\",\"DMI wo cmp nt st uncntr\",\"Diabetes mellitus without mention of complication, type I\"\n\
        2,\"E8501\",\"Acc poison-meth/opiat\",\"Accidental poisoning by methadone\"\n\
        3,\"4019\",\"Hypertension NOS\",\"Unspecified essential hypertension\"\n";

    const PROCEDURES: &str = "\"ROW_ID\",\"ICD9_CODE\",\"SHORT_TITLE\",\"LONG_TITLE\"\n\
        1,\"966\",\"Entral infus nutrit sub\",\"Enteral infusion of concentrated nutritional substances\"\n";

    #[test]
    fn test_reference_tables() {
        let mut lookup = DescriptionLookup::new();
        lookup
            .read_reference_table(DIAGNOSES.as_bytes(), true)
            .unwrap();
        lookup
            .read_reference_table(PROCEDURES.as_bytes(), false)
            .unwrap();

        assert_eq!(lookup.len(), 4);
        assert_eq!(
            lookup.codes().into_iter().collect::<Vec<_>>(),
            vec!["250.01", "401.9", "96.6", "E850.1"]
        );
        assert_eq!(
            lookup.tokens_for("250.01"),
            &[
                "diabetes",
                "mellitus",
                "without",
                "mention",
                "of",
                "complication",
                "type",
                "i"
            ]
        );
        assert!(lookup.is_billable("96.6"));
        assert!(lookup.tokens_for("999.9").is_empty());
        assert!(!lookup.is_billable("999.9"));
        assert!(!lookup.contains("999.9"));
    }

    #[test]
    fn test_supplementary_descriptions() {
        let mut lookup = DescriptionLookup::new();
        lookup
            .read_reference_table(DIAGNOSES.as_bytes(), true)
            .unwrap();

        let supplement = "401.9\tShould not replace\n\
                          \n\
                          401\tEssential hypertension\n\
                          V30\tSingle liveborn\n";
        lookup.read_supplementary(supplement.as_bytes()).unwrap();

        assert_eq!(
            lookup.tokens_for("401.9"),
            &["unspecified", "essential", "hypertension"]
        );
        assert!(lookup.is_billable("401.9"));

        assert_eq!(lookup.tokens_for("401"), &["essential", "hypertension"]);
        assert!(!lookup.is_billable("401"));
        assert_eq!(lookup.tokens_for("V30"), &["single", "liveborn"]);
        assert_eq!(lookup.len(), 5);
    }

    #[test]
    fn test_malformed_reference_table() {
        let mut lookup = DescriptionLookup::new();
        assert!(matches!(
            lookup.read_reference_table("".as_bytes(), true),
            Err(CodechipperError::Parse(_))
        ));

        let short = "ROW_ID,ICD9_CODE\n1\n";
        assert!(matches!(
            lookup.read_reference_table(short.as_bytes(), true),
            Err(CodechipperError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_supplementary_descriptions() -> CCResult<()> {
        let dir = tempdir::TempDir::new("codechipper_desc")?;
        std::fs::write(dir.path().join(DIAGNOSES_TABLE), DIAGNOSES)?;
        std::fs::write(dir.path().join(PROCEDURES_TABLE), PROCEDURES)?;

        match load_code_descriptions(dir.path(), false) {
            Err(CodechipperError::MissingFile(path)) => {
                assert_eq!(path, dir.path().join(SUPPLEMENTARY_DESCRIPTIONS))
            }
            other => panic!("expected a missing supplementary list, got {other:?}"),
        }

        let lookup = load_code_descriptions(dir.path(), true)?;
        assert_eq!(lookup.len(), 4);
        assert!(lookup.is_billable("401.9"));
        Ok(())
    }

    #[test]
    fn test_missing_reference_table() -> CCResult<()> {
        let dir = tempdir::TempDir::new("codechipper_desc")?;
        assert!(matches!(
            load_code_descriptions(dir.path(), true),
            Err(CodechipperError::MissingFile(_))
        ));
        Ok(())
    }
}
