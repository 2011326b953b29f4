//! # Code Registry
//!
//! Scans the train/dev/test splits for the universe of codes,
//! per-split occurrence counts, and a global frequency rank.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use crate::{
    codes::strip_code,
    data::records::{ALL_SPLITS, Split, load_split_labels_path, split_path},
    errors::CCResult,
    types::{CCHashMap, hash_map_new},
};

/// The codes seen across all labeled splits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeRegistry {
    codes: BTreeSet<String>,
    train_examples: BTreeMap<String, usize>,
    test_examples: BTreeMap<String, usize>,
    ranks: BTreeMap<String, usize>,
}

/// Occurrence tallies, remembering the order codes were first seen.
#[derive(Debug, Default)]
struct CodeCounter {
    counts: CCHashMap<String, (usize, usize)>,
}

impl CodeCounter {
    fn new() -> Self {
        Self {
            counts: hash_map_new(),
        }
    }

    fn update(
        &mut self,
        code: &str,
    ) {
        let next = self.counts.len();
        match self.counts.get_mut(code) {
            Some((count, _)) => *count += 1,
            None => {
                self.counts.insert(code.to_string(), (1, next));
            }
        }
    }

    /// Codes ordered most common first; ties keep first-seen order.
    fn most_common(&self) -> Vec<(&str, usize)> {
        let mut items: Vec<(&str, usize, usize)> = self
            .counts
            .iter()
            .map(|(code, &(count, seen))| (code.as_str(), count, seen))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        items
            .into_iter()
            .map(|(code, count, _)| (code, count))
            .collect()
    }

    fn into_counts(self) -> BTreeMap<String, usize> {
        self.counts
            .into_iter()
            .map(|(code, (count, _))| (code, count))
            .collect()
    }
}

impl CodeRegistry {
    /// Build a registry from per-split label lists.
    ///
    /// Codes are stripped of separator artifacts. Codes which strip to
    /// nothing are skipped entirely: they are never counted or ranked.
    ///
    /// ## Arguments
    /// * `splits` - `(split, labels-per-record)` pairs, in scan order.
    pub fn from_split_labels<'a, I>(splits: I) -> Self
    where
        I: IntoIterator<Item = (Split, &'a [Vec<String>])>,
    {
        let mut codes = BTreeSet::new();
        let mut train = CodeCounter::new();
        let mut test = CodeCounter::new();
        let mut global = CodeCounter::new();

        for (split, records) in splits {
            for labels in records {
                for label in labels {
                    let code = strip_code(label);
                    if code.is_empty() {
                        continue;
                    }
                    codes.insert(code.to_string());
                    match split {
                        Split::Train => train.update(code),
                        Split::Test => test.update(code),
                        Split::Dev => (),
                    }
                    global.update(code);
                }
            }
        }
        let ranks = global
            .most_common()
            .into_iter()
            .enumerate()
            .map(|(rank, (code, _))| (code.to_string(), rank + 1))
            .collect();

        Self {
            codes,
            train_examples: train.into_counts(),
            test_examples: test.into_counts(),
            ranks,
        }
    }

    /// The set of all non-empty codes seen.
    pub fn codes(&self) -> &BTreeSet<String> {
        &self.codes
    }

    /// The number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if no codes were seen.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Occurrences of the code in the train split; 0 if absent.
    pub fn train_examples(
        &self,
        code: &str,
    ) -> usize {
        self.train_examples.get(code).copied().unwrap_or(0)
    }

    /// Occurrences of the code in the test split; 0 if absent.
    pub fn test_examples(
        &self,
        code: &str,
    ) -> usize {
        self.test_examples.get(code).copied().unwrap_or(0)
    }

    /// The 1-based global frequency rank of the code, if seen.
    pub fn rank(
        &self,
        code: &str,
    ) -> Option<usize> {
        self.ranks.get(code).copied()
    }
}

/// Build a [`CodeRegistry`] from a train split and its dev/test siblings.
///
/// Sibling paths are derived with [`split_path`]. Any missing or malformed
/// split aborts the whole build.
///
/// ## Arguments
/// * `train_path` - path to the train split (`.csv` or `.ndjson`).
pub fn load_full_codes(train_path: impl AsRef<Path>) -> CCResult<CodeRegistry> {
    let train_path = train_path.as_ref();

    let mut splits = Vec::with_capacity(ALL_SPLITS.len());
    for split in ALL_SPLITS {
        let path = split_path(train_path, split)?;
        log::debug!("scanning {} codes: {}", split.name(), path.display());
        splits.push((split, load_split_labels_path(&path)?));
    }

    let registry = CodeRegistry::from_split_labels(
        splits
            .iter()
            .map(|(split, labels)| (*split, labels.as_slice())),
    );
    log::info!("found {} codes across all splits", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_registry_counts() {
        let train = labels(&[&["401.9", "250.01"], &["401.9", "96.6."]]);
        let dev = labels(&[&["428.0"], &[""]]);
        let test = labels(&[&["250.01", "v30.00"]]);

        let registry = CodeRegistry::from_split_labels([
            (Split::Train, train.as_slice()),
            (Split::Dev, dev.as_slice()),
            (Split::Test, test.as_slice()),
        ]);

        assert_eq!(
            registry.codes().iter().collect::<Vec<_>>(),
            vec!["250.01", "401.9", "428.0", "96.6", "v30.00"]
        );
        assert_eq!(registry.len(), 5);

        assert_eq!(registry.train_examples("401.9"), 2);
        assert_eq!(registry.train_examples("96.6"), 1);
        assert_eq!(registry.train_examples("428.0"), 0);

        assert_eq!(registry.test_examples("250.01"), 1);
        assert_eq!(registry.test_examples("401.9"), 0);
    }

    #[test]
    fn test_registry_ranks() {
        let train = labels(&[&["b", "a"], &["a"]]);
        let dev = labels(&[&["c", "d"]]);
        let test = labels(&[&["d", "b"]]);

        let registry = CodeRegistry::from_split_labels([
            (Split::Train, train.as_slice()),
            (Split::Dev, dev.as_slice()),
            (Split::Test, test.as_slice()),
        ]);

        // a=2, b=2 (b seen first), d=2, c=1.
        assert_eq!(registry.rank("b"), Some(1));
        assert_eq!(registry.rank("a"), Some(2));
        assert_eq!(registry.rank("d"), Some(3));
        assert_eq!(registry.rank("c"), Some(4));
        assert_eq!(registry.rank("z"), None);
    }

    #[test]
    fn test_empty_codes_never_ranked() {
        use crate::data::records::{read_csv_split_labels, read_ndjson_split_labels};

        let csv_rows = read_csv_split_labels(
            "SUBJECT_ID,HADM_ID,TEXT,LABELS,LENGTH\n\
             1,10,pain,;.,1\n\
             2,11,pain,.;,1\n\
             3,12,pain,a,1\n"
                .as_bytes(),
        )
        .unwrap();
        let ndjson_rows = read_ndjson_split_labels(
            concat!(
                r#"[1, 10, [["pain"]], 1, ["", "."]]"#,
                "\n",
                r#"[2, 11, [["pain"]], 1, [".", ""]]"#,
                "\n",
                r#"[3, 12, [["pain"]], 1, ["a"]]"#,
                "\n",
            )
            .as_bytes(),
        )
        .unwrap();

        let from_csv = CodeRegistry::from_split_labels([(Split::Train, csv_rows.as_slice())]);
        let from_ndjson =
            CodeRegistry::from_split_labels([(Split::Train, ndjson_rows.as_slice())]);

        assert_eq!(from_csv, from_ndjson);
        assert_eq!(from_csv.rank("a"), Some(1));
        assert_eq!(from_csv.rank(""), None);
        assert_eq!(from_ndjson.rank("a"), Some(1));
        assert_eq!(from_ndjson.train_examples(""), 0);
        assert_eq!(from_ndjson.len(), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = CodeRegistry::from_split_labels(Vec::<(Split, &[Vec<String>])>::new());
        assert!(registry.is_empty());
        assert_eq!(registry.train_examples("401.9"), 0);
    }
}
