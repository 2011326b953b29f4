//! # Labeled Note Records
//!
//! Two on-disk layouts are supported, selected by file extension.
//!
//! `.csv`, with a header row:
//! ```terminaloutput
//! SUBJECT_ID,HADM_ID,TEXT,LABELS,LENGTH
//! 7,100,"patient admitted with chest pain",401.9;410.71,5
//! ```
//!
//! `.ndjson`, one JSON array per line:
//! ```terminaloutput
//! [7, 100, [["patient", "admitted"], ["chest", "pain"]], 4, ["401.9", "410.71"]]
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::errors::{CCResult, CodechipperError};

/// The placeholder in a train split path which names the split.
pub const TRAIN_SPLIT: &str = "train";

/// The splits scanned when building the code registry.
pub const ALL_SPLITS: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

/// A named labeled split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training split.
    Train,
    /// Development split.
    Dev,
    /// Test split.
    Test,
}

impl Split {
    /// The name substituted into split paths.
    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }
}

/// Derive the path of a sibling split from the train split path.
///
/// Every occurrence of `"train"` in the path is replaced with the split name.
/// Paths which are not valid UTF-8 are rejected with a [`CodechipperError::Parse`].
pub fn split_path(
    train_path: impl AsRef<Path>,
    split: Split,
) -> CCResult<PathBuf> {
    let train_path = train_path.as_ref();
    match train_path.to_str() {
        Some(path) => Ok(PathBuf::from(path.replace(TRAIN_SPLIT, split.name()))),
        None => Err(CodechipperError::Parse(format!(
            "split path is not valid UTF-8: {}",
            train_path.display()
        ))),
    }
}

/// Supported labeled-split file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Delimited table; codes joined by `;`, text joined by spaces.
    Csv,

    /// Line-delimited JSON arrays; nested sentence tokens, native label lists.
    NdJson,
}

impl DatasetFormat {
    /// Select the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> CCResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Ok(DatasetFormat::Csv),
            Some("ndjson") => Ok(DatasetFormat::NdJson),
            _ => Err(CodechipperError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// One labeled clinical note, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    /// Patient identifier.
    pub subject_id: i64,

    /// Hospital admission identifier.
    pub hadm_id: i64,

    /// The note text, as word tokens.
    pub text: Vec<String>,

    /// The fine codes assigned to the note, as written.
    pub labels: Vec<String>,

    /// The stored token count.
    pub length: i64,
}

/// Load all records from a labeled split file.
///
/// The format is chosen by [`DatasetFormat::from_path`]; the file is closed
/// before this returns, on success or failure.
pub fn load_note_records_path(path: impl AsRef<Path>) -> CCResult<Vec<NoteRecord>> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;
    if !path.is_file() {
        return Err(CodechipperError::MissingFile(path.to_path_buf()));
    }

    let file = File::open(path)?;
    match format {
        DatasetFormat::Csv => read_csv_note_records(file),
        DatasetFormat::NdJson => read_ndjson_note_records(BufReader::new(file)),
    }
}

/// Read records from a `.csv` labeled split stream.
///
/// Columns are positional: `SUBJECT_ID, HADM_ID, TEXT, LABELS, LENGTH`.
///
/// `TEXT` is split on single spaces and empty words are dropped, so repeated
/// spaces do not produce tokens and an empty `TEXT` has no tokens at all.
/// The token count may therefore be less than `LENGTH`.
pub fn read_csv_note_records<R: Read>(reader: R) -> CCResult<Vec<NoteRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    if rdr.headers()?.is_empty() {
        return Err(CodechipperError::Parse("missing csv header".to_string()));
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let row = row?;
        let line = idx + 2;
        if row.len() < 5 {
            return Err(CodechipperError::Parse(format!(
                "line {line}: expected 5 columns, found {}",
                row.len()
            )));
        }

        records.push(NoteRecord {
            subject_id: parse_int_field(&row[0], line, "SUBJECT_ID")?,
            hadm_id: parse_int_field(&row[1], line, "HADM_ID")?,
            text: row[2]
                .split(' ')
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
            labels: split_csv_labels(&row[3]),
            length: parse_int_field(&row[4], line, "LENGTH")?,
        });
    }
    Ok(records)
}

/// Read records from a `.ndjson` labeled split stream.
///
/// Each non-blank line is an array: `[SUBJECT_ID, HADM_ID, TEXT, LENGTH, LABELS]`,
/// where `TEXT` is a list of sentences, each a list of words.
pub fn read_ndjson_note_records<R: BufRead>(reader: R) -> CCResult<Vec<NoteRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let lineno = idx + 1;

        let row: Value = serde_json::from_str(&line)?;
        let fields = match row.as_array() {
            Some(fields) if fields.len() == 5 => fields,
            _ => {
                return Err(CodechipperError::Parse(format!(
                    "line {lineno}: expected an array of 5 fields"
                )));
            }
        };

        let text = json_array(&fields[2], lineno, "TEXT")?
            .iter()
            .map(|sentence| json_string_list(sentence, lineno, "TEXT"))
            .collect::<CCResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        records.push(NoteRecord {
            subject_id: json_int(&fields[0], lineno, "SUBJECT_ID")?,
            hadm_id: json_int(&fields[1], lineno, "HADM_ID")?,
            text,
            labels: json_string_list(&fields[4], lineno, "LABELS")?,
            length: json_int(&fields[3], lineno, "LENGTH")?,
        });
    }
    Ok(records)
}

/// Read only the label lists from a labeled split file.
///
/// Only the `LABELS` field of each row is decoded; note text is skipped.
pub fn load_split_labels_path(path: impl AsRef<Path>) -> CCResult<Vec<Vec<String>>> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path)?;
    if !path.is_file() {
        return Err(CodechipperError::MissingFile(path.to_path_buf()));
    }

    let file = File::open(path)?;
    match format {
        DatasetFormat::Csv => read_csv_split_labels(file),
        DatasetFormat::NdJson => read_ndjson_split_labels(BufReader::new(file)),
    }
}

/// Read the label lists from a `.csv` labeled split stream.
pub fn read_csv_split_labels<R: Read>(reader: R) -> CCResult<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    if rdr.headers()?.is_empty() {
        return Err(CodechipperError::Parse("missing csv header".to_string()));
    }

    let mut labels = Vec::new();
    let mut row = csv::StringRecord::new();
    let mut line = 1;
    while rdr.read_record(&mut row)? {
        line += 1;
        if row.len() < 5 {
            return Err(CodechipperError::Parse(format!(
                "line {line}: expected 5 columns, found {}",
                row.len()
            )));
        }
        labels.push(split_csv_labels(&row[3]));
    }
    Ok(labels)
}

/// An `.ndjson` row with every field but `LABELS` skipped.
type LabelsRow = (IgnoredAny, IgnoredAny, IgnoredAny, IgnoredAny, Vec<String>);

/// Read the label lists from a `.ndjson` labeled split stream.
pub fn read_ndjson_split_labels<R: BufRead>(reader: R) -> CCResult<Vec<Vec<String>>> {
    let mut labels = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (_, _, _, _, row_labels): LabelsRow = serde_json::from_str(&line)?;
        labels.push(row_labels);
    }
    Ok(labels)
}

fn split_csv_labels(field: &str) -> Vec<String> {
    field
        .split(';')
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_int_field(
    field: &str,
    line: usize,
    name: &str,
) -> CCResult<i64> {
    field.trim().parse().map_err(|e: core::num::ParseIntError| {
        CodechipperError::Parse(format!("line {line}: {name}: {e}"))
    })
}

fn json_int(
    value: &Value,
    line: usize,
    name: &str,
) -> CCResult<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed
        .ok_or_else(|| CodechipperError::Parse(format!("line {line}: {name}: expected an integer")))
}

fn json_array<'a>(
    value: &'a Value,
    line: usize,
    name: &str,
) -> CCResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| CodechipperError::Parse(format!("line {line}: {name}: expected a list")))
}

fn json_string_list(
    value: &Value,
    line: usize,
    name: &str,
) -> CCResult<Vec<String>> {
    json_array(value, line, name)?
        .iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            _ => Err(CodechipperError::Parse(format!(
                "line {line}: {name}: expected a list of strings"
            ))),
        })
        .collect()
}
