//! # Note Dataset

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use ndarray::Array1;

use crate::{
    data::{
        NoteBatch,
        collate,
        records::{NoteRecord, load_note_records_path},
    },
    errors::{CCResult, CodechipperError},
    lookups::LookupBundle,
    types::{IndexType, TargetType},
};

/// A note with its text and labels encoded against a [`LookupBundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct EncodedNote {
    hadm_id: i64,
    tokens: Vec<IndexType>,
    fine: Vec<usize>,
    coarse: Vec<usize>,
    text: Vec<String>,
}

/// One dataset example.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    /// Word indices, truncated to the dataset `max_len` if set.
    pub tokens: Vec<IndexType>,

    /// Binary fine-label vector, `[num_fine]`.
    pub target_fine: Array1<TargetType>,

    /// Binary coarse-label vector, `[num_coarse]`.
    pub target_coarse: Array1<TargetType>,

    /// Hospital admission identifier.
    pub hadm_id: i64,

    /// The original note words.
    pub text: Vec<String>,
}

/// A labeled split, encoded for a [`LookupBundle`].
///
/// Records are encoded once, at construction:
/// * unknown words map to the bundle's out-of-vocabulary sentinel,
/// * labels absent from the fine index are dropped,
/// * coarse labels are the distinct coarse indices of the known labels' prefixes.
///
/// Item access is read-only; a dataset can be shared across loader threads.
#[derive(Debug, Clone)]
pub struct NoteDataset {
    path: PathBuf,
    notes: Vec<EncodedNote>,
    num_fine: usize,
    num_coarse: usize,
    max_len: Option<usize>,
}

impl NoteDataset {
    /// Load and encode a labeled split file.
    ///
    /// ## Arguments
    /// * `path` - a `.csv` or `.ndjson` split; other extensions are rejected.
    /// * `lookups` - the assembled lookup tables.
    /// * `max_len` - truncate token sequences to this length.
    pub fn open(
        path: impl AsRef<Path>,
        lookups: &LookupBundle,
        max_len: Option<usize>,
    ) -> CCResult<Self> {
        let path = path.as_ref();
        log::info!("loading data from {}", path.display());

        let records = load_note_records_path(path)?;
        let mut dataset = Self::from_records(records, lookups, max_len);
        dataset.path = path.to_path_buf();
        Ok(dataset)
    }

    /// Encode in-memory records.
    pub fn from_records(
        records: Vec<NoteRecord>,
        lookups: &LookupBundle,
        max_len: Option<usize>,
    ) -> Self {
        let mut dropped = 0;
        let notes = records
            .into_iter()
            .map(|record| {
                let note = encode_record(record, lookups);
                dropped += note.1;
                note.0
            })
            .collect::<Vec<_>>();

        if dropped > 0 {
            log::info!("dropped {dropped} labels not present in the code index");
        }

        Self {
            path: PathBuf::new(),
            notes,
            num_fine: lookups.num_fine(),
            num_coarse: lookups.num_coarse(),
            max_len,
        }
    }

    /// The source path; empty for in-memory datasets.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The number of examples.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The number of fine labels.
    pub fn num_fine(&self) -> usize {
        self.num_fine
    }

    /// The number of coarse labels.
    pub fn num_coarse(&self) -> usize {
        self.num_coarse
    }

    /// The truncation length.
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Materialize the example at `index`.
    pub fn get(
        &self,
        index: usize,
    ) -> Option<NoteItem> {
        let note = self.notes.get(index)?;

        let mut tokens = note.tokens.clone();
        if let Some(max_len) = self.max_len {
            tokens.truncate(max_len);
        }

        Some(NoteItem {
            tokens,
            target_fine: multi_hot(&note.fine, self.num_fine),
            target_coarse: multi_hot(&note.coarse, self.num_coarse),
            hadm_id: note.hadm_id,
            text: note.text.clone(),
        })
    }

    /// Materialize the example at `index`, or fail with [`CodechipperError::IndexOutOfRange`].
    pub fn try_get(
        &self,
        index: usize,
    ) -> CCResult<NoteItem> {
        self.get(index).ok_or(CodechipperError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Iterate over all examples, in order.
    pub fn iter(&self) -> impl Iterator<Item = NoteItem> + '_ {
        (0..self.len()).filter_map(|idx| self.get(idx))
    }

    /// Collate the examples at `indices` into a [`NoteBatch`].
    pub fn batch(
        &self,
        indices: &[usize],
    ) -> CCResult<NoteBatch> {
        let items = indices
            .iter()
            .map(|&idx| self.try_get(idx))
            .collect::<CCResult<Vec<_>>>()?;
        collate(&items)
    }

    /// Iterate over consecutive batches of up to `batch_size` examples.
    pub fn batches(
        &self,
        batch_size: usize,
    ) -> impl Iterator<Item = CCResult<NoteBatch>> + '_ {
        let batch_size = batch_size.max(1);
        (0..self.len()).step_by(batch_size).map(move |start| {
            let end = (start + batch_size).min(self.len());
            self.batch(&(start..end).collect::<Vec<_>>())
        })
    }
}

/// Encode one record; returns the note and the count of dropped fine labels.
fn encode_record(
    record: NoteRecord,
    lookups: &LookupBundle,
) -> (EncodedNote, usize) {
    let tokens = lookups.vocab().encode(&record.text);

    let mut fine = Vec::with_capacity(record.labels.len());
    for label in &record.labels {
        match lookups.fine().index_of(label) {
            Some(idx) => fine.push(idx),
            None => log::debug!("HADM_ID {}: dropping unknown label {label:?}", record.hadm_id),
        }
    }
    let dropped = record.labels.len() - fine.len();

    // A coarse code is itself a known label in hierarchical mode.
    let coarse = record
        .labels
        .iter()
        .filter(|label| {
            lookups.fine().index_of(label).is_some() || lookups.coarse().index_of(label).is_some()
        })
        .filter_map(|label| lookups.coarse_index_of(label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    (
        EncodedNote {
            hadm_id: record.hadm_id,
            tokens,
            fine,
            coarse,
            text: record.text,
        },
        dropped,
    )
}

fn multi_hot(
    indices: &[usize],
    size: usize,
) -> Array1<TargetType> {
    let mut target = Array1::zeros(size);
    for &idx in indices {
        target[idx] = 1.0;
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codes::{CodeRegistry, DescriptionLookup},
        data::records::{Split, read_csv_note_records},
        lookups::{LookupOptions, assemble_lookups},
        vocab::read_vocab_words,
    };

    fn lookups() -> LookupBundle {
        let rows: Vec<Vec<String>> = vec![vec![
            "401.9".to_string(),
            "250.01".to_string(),
            "96.6".to_string(),
        ]];
        let registry = CodeRegistry::from_split_labels([(Split::Train, rows.as_slice())]);

        let mut descriptions = DescriptionLookup::new();
        descriptions
            .read_reference_table(
                "ROW_ID,ICD9_CODE,LONG_TITLE\n\
                 1,4019,Unspecified essential hypertension\n\
                 2,25001,Diabetes mellitus type I\n"
                    .as_bytes(),
                true,
            )
            .unwrap();
        descriptions
            .read_reference_table(
                "ROW_ID,ICD9_CODE,LONG_TITLE\n1,966,Enteral infusion\n".as_bytes(),
                false,
            )
            .unwrap();

        let words = read_vocab_words("admitted\nchest\npain\npatient\n".as_bytes()).unwrap();
        assemble_lookups(&registry, &descriptions, words, &LookupOptions::default()).unwrap()
    }

    fn records() -> Vec<NoteRecord> {
        read_csv_note_records(
            "SUBJECT_ID,HADM_ID,TEXT,LABELS,LENGTH\n\
             7,100,patient admitted with chest pain,401.9;250.01,5\n\
             8,101,chest pain,401.9;401.1;999.99,2\n\
             9,102,patient,,1\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_dataset_items() {
        let lookups = lookups();
        assert_eq!(lookups.fine().codes(), &["250.01", "401.9", "96.6"]);
        assert_eq!(lookups.coarse().codes(), &["250", "401", "96"]);

        let dataset = NoteDataset::from_records(records(), &lookups, None);
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());

        let item = dataset.get(0).unwrap();
        let unk = lookups.unk_index();
        assert_eq!(item.tokens, vec![4, 1, unk, 2, 3]);
        assert_eq!(item.target_fine.to_vec(), vec![1.0, 1.0, 0.0]);
        assert_eq!(item.target_coarse.to_vec(), vec![1.0, 1.0, 0.0]);
        assert_eq!(item.hadm_id, 100);
        assert_eq!(item.text, vec!["patient", "admitted", "with", "chest", "pain"]);

        assert!(dataset.get(3).is_none());
        assert!(matches!(
            dataset.try_get(3),
            Err(CodechipperError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_unknown_labels_are_dropped() {
        let lookups = lookups();
        let dataset = NoteDataset::from_records(records(), &lookups, None);

        // 401.1 and 999.99 are unknown; 401.1 must not leak coarse code 401.
        let item = dataset.get(1).unwrap();
        assert_eq!(item.target_fine.to_vec(), vec![0.0, 1.0, 0.0]);
        assert_eq!(item.target_coarse.to_vec(), vec![0.0, 1.0, 0.0]);

        let records = read_csv_note_records(
            "SUBJECT_ID,HADM_ID,TEXT,LABELS,LENGTH\n1,200,pain,401.1;999.99,1\n".as_bytes(),
        )
        .unwrap();
        let item = NoteDataset::from_records(records, &lookups, None)
            .get(0)
            .unwrap();
        assert_eq!(item.target_fine.sum(), 0.0);
        assert_eq!(item.target_coarse.sum(), 0.0);

        let item = dataset.get(2).unwrap();
        assert_eq!(item.target_fine.sum(), 0.0);
        assert_eq!(item.target_coarse.sum(), 0.0);
    }

    #[test]
    fn test_max_len() {
        let lookups = lookups();
        let dataset = NoteDataset::from_records(records(), &lookups, Some(2));
        assert_eq!(dataset.max_len(), Some(2));

        assert_eq!(dataset.get(0).unwrap().tokens, vec![4, 1]);
        assert_eq!(dataset.get(2).unwrap().tokens, vec![4]);
        // The raw text is never truncated.
        assert_eq!(dataset.get(0).unwrap().text.len(), 5);
    }

    #[test]
    fn test_batches() {
        let lookups = lookups();
        let dataset = NoteDataset::from_records(records(), &lookups, None);

        let batches = dataset.batches(2).collect::<CCResult<Vec<_>>>().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].tokens.shape(), &[2, 5]);
        assert_eq!(batches[1].tokens.shape(), &[1, 1]);
        assert_eq!(batches[1].hadm_ids, vec![102]);

        let batch = dataset.batch(&[2, 0]).unwrap();
        assert_eq!(batch.hadm_ids, vec![102, 100]);
        assert!(dataset.batch(&[0, 7]).is_err());

        assert_eq!(dataset.iter().count(), 3);
    }

    #[test]
    fn test_unsupported_format() {
        let lookups = lookups();
        assert!(matches!(
            NoteDataset::open("notes/train_full.parquet", &lookups, None),
            Err(CodechipperError::UnsupportedFormat(_))
        ));
    }
}
