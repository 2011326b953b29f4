//! # Batch Collation

use ndarray::Array2;

use crate::{
    data::NoteItem,
    errors::{CCResult, CodechipperError},
    lookups::pad_sequences,
    types::{IndexType, TargetType},
};

/// A padded batch of notes.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteBatch {
    /// Word indices, `[batch x max_len]`, right-padded with 0.
    pub tokens: Array2<IndexType>,

    /// Fine targets, `[batch x num_fine]`.
    pub target_fine: Array2<TargetType>,

    /// Coarse targets, `[batch x num_coarse]`.
    pub target_coarse: Array2<TargetType>,

    /// Admission ids, in batch order.
    pub hadm_ids: Vec<i64>,

    /// Original note words, in batch order.
    pub texts: Vec<Vec<String>>,
}

impl NoteBatch {
    /// The number of examples in the batch.
    pub fn len(&self) -> usize {
        self.hadm_ids.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.hadm_ids.is_empty()
    }
}

/// Collate examples into a [`NoteBatch`], in the given order.
///
/// All items must share the same label-space widths.
pub fn collate(items: &[NoteItem]) -> CCResult<NoteBatch> {
    let num_fine = items.first().map_or(0, |item| item.target_fine.len());
    let num_coarse = items.first().map_or(0, |item| item.target_coarse.len());

    let tokens = pad_sequences(&items.iter().map(|item| &item.tokens).collect::<Vec<_>>());

    let mut target_fine = Array2::zeros((items.len(), num_fine));
    let mut target_coarse = Array2::zeros((items.len(), num_coarse));
    let mut hadm_ids = Vec::with_capacity(items.len());
    let mut texts = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        if item.target_fine.len() != num_fine || item.target_coarse.len() != num_coarse {
            return Err(CodechipperError::Invariant(format!(
                "batch item {i} has label widths ({}, {}), expected ({num_fine}, {num_coarse})",
                item.target_fine.len(),
                item.target_coarse.len(),
            )));
        }
        target_fine.row_mut(i).assign(&item.target_fine);
        target_coarse.row_mut(i).assign(&item.target_coarse);
        hadm_ids.push(item.hadm_id);
        texts.push(item.text.clone());
    }

    Ok(NoteBatch {
        tokens,
        target_fine,
        target_coarse,
        hadm_ids,
        texts,
    })
}
