//! # Word Vocabulary

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    errors::{CCResult, CodechipperError},
    types::{CCHashMap, IndexType, hash_map_with_capacity},
};

/// The padding index; never assigned to a word.
pub const PAD_INDEX: IndexType = 0;

/// A word <-> index bijection.
///
/// Words are assigned dense indices `1..=N` in sorted order.
/// Index `0` is the padding sentinel and `N + 1` is the out-of-vocabulary
/// sentinel; neither is ever assigned to a word.
#[derive(Debug, Clone, Default)]
pub struct WordVocab {
    /// Words in index order; `ind2w[i]` has index `i + 1`.
    ind2w: Vec<String>,

    w2ind: CCHashMap<String, IndexType>,
}

impl PartialEq for WordVocab {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.ind2w == other.ind2w
    }
}

impl Eq for WordVocab {}

impl<S: Into<String>> FromIterator<S> for WordVocab {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter.into_iter().map(Into::into).collect())
    }
}

impl WordVocab {
    /// Build a vocabulary from a word set.
    pub fn from_words(words: BTreeSet<String>) -> Self {
        let mut w2ind = hash_map_with_capacity(words.len());
        let ind2w: Vec<String> = words.into_iter().collect();
        for (idx, word) in ind2w.iter().enumerate() {
            w2ind.insert(word.clone(), idx as IndexType + 1);
        }
        Self { ind2w, w2ind }
    }

    /// Build a vocabulary from base words, optionally folding in description tokens.
    ///
    /// ## Arguments
    /// * `base` - the base word list.
    /// * `descriptions` - description token sequences to merge, if any.
    pub fn with_descriptions<'a, D>(
        base: BTreeSet<String>,
        descriptions: Option<D>,
    ) -> Self
    where
        D: IntoIterator<Item = &'a [String]>,
    {
        let mut words = base;
        if let Some(descriptions) = descriptions {
            for desc in descriptions {
                words.extend(desc.iter().cloned());
            }
        }
        Self::from_words(words)
    }

    /// The number of words.
    pub fn len(&self) -> usize {
        self.ind2w.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.ind2w.is_empty()
    }

    /// The padding sentinel.
    pub fn pad_index(&self) -> IndexType {
        PAD_INDEX
    }

    /// The out-of-vocabulary sentinel: `len() + 1`.
    pub fn unk_index(&self) -> IndexType {
        self.len() as IndexType + 1
    }

    /// Get the index of a word, if present.
    pub fn get(
        &self,
        word: &str,
    ) -> Option<IndexType> {
        self.w2ind.get(word).copied()
    }

    /// Get the index of a word, or the out-of-vocabulary sentinel.
    pub fn lookup(
        &self,
        word: &str,
    ) -> IndexType {
        match self.get(word) {
            Some(idx) => idx,
            None => self.unk_index(),
        }
    }

    /// Encode a word sequence.
    pub fn encode<S: AsRef<str>>(
        &self,
        words: &[S],
    ) -> Vec<IndexType> {
        words.iter().map(|w| self.lookup(w.as_ref())).collect()
    }

    /// Get the word for an index; `None` for sentinels and out-of-range indices.
    pub fn word(
        &self,
        index: IndexType,
    ) -> Option<&str> {
        if index < 1 {
            return None;
        }
        self.ind2w.get(index as usize - 1).map(String::as_str)
    }

    /// Iterate over `(index, word)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (IndexType, &str)> {
        self.ind2w
            .iter()
            .enumerate()
            .map(|(idx, w)| (idx as IndexType + 1, w.as_str()))
    }
}

/// Read a base word list: one word per line, trimmed; blank lines skipped.
pub fn read_vocab_words<R: BufRead>(reader: R) -> CCResult<BTreeSet<String>> {
    let mut words = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }
    Ok(words)
}

/// Load a base word list from a file.
///
/// See [`read_vocab_words`].
pub fn load_vocab_words_path(path: impl AsRef<Path>) -> CCResult<BTreeSet<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CodechipperError::MissingFile(path.to_path_buf()));
    }
    read_vocab_words(BufReader::new(File::open(path)?))
}
