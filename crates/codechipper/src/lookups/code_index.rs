use std::collections::BTreeSet;

use crate::types::{CCHashMap, hash_map_with_capacity};

/// A dense code <-> index bijection.
///
/// Indices `0..N` follow lexicographic code order.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    ind2c: Vec<String>,
    c2ind: CCHashMap<String, usize>,
}

impl PartialEq for CodeIndex {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.ind2c == other.ind2c
    }
}

impl Eq for CodeIndex {}

impl From<BTreeSet<String>> for CodeIndex {
    fn from(codes: BTreeSet<String>) -> Self {
        Self::from_codes(codes)
    }
}

impl CodeIndex {
    /// Assign indices to a code set, in sorted order.
    pub fn from_codes(codes: BTreeSet<String>) -> Self {
        let mut c2ind = hash_map_with_capacity(codes.len());
        let ind2c: Vec<String> = codes.into_iter().collect();
        for (idx, code) in ind2c.iter().enumerate() {
            c2ind.insert(code.clone(), idx);
        }
        Self { ind2c, c2ind }
    }

    /// The number of codes.
    pub fn len(&self) -> usize {
        self.ind2c.len()
    }

    /// Check if there are no codes.
    pub fn is_empty(&self) -> bool {
        self.ind2c.is_empty()
    }

    /// The index of a code, if present.
    pub fn index_of(
        &self,
        code: &str,
    ) -> Option<usize> {
        self.c2ind.get(code).copied()
    }

    /// The code at an index, if in range.
    pub fn code(
        &self,
        index: usize,
    ) -> Option<&str> {
        self.ind2c.get(index).map(String::as_str)
    }

    /// All codes, in index order.
    pub fn codes(&self) -> &[String] {
        &self.ind2c
    }

    /// Iterate over `(index, code)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ind2c
            .iter()
            .enumerate()
            .map(|(idx, code)| (idx, code.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_index_bijection() {
        let codes: BTreeSet<String> = ["401.9", "250.01", "E850.1", "96.6", "250.00"]
            .into_iter()
            .map(str::to_string)
            .collect();
        let index = CodeIndex::from(codes.clone());

        assert_eq!(index.len(), 5);
        assert_eq!(
            index.codes(),
            &["250.00", "250.01", "401.9", "96.6", "E850.1"]
        );

        for code in &codes {
            let idx = index.index_of(code).unwrap();
            assert_eq!(index.code(idx), Some(code.as_str()));
        }
        for (idx, code) in index.iter() {
            assert_eq!(index.index_of(code), Some(idx));
        }

        assert_eq!(index.index_of("999.9"), None);
        assert_eq!(index.code(5), None);
    }

    #[test]
    fn test_sorted_order_matches_index_order() {
        let index: CodeIndex = ["b", "c", "a"]
            .into_iter()
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into();
        let codes = index.codes();
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }
}
