//! # Note Data
//!
//! * [`records`] - the labeled split file formats.
//! * [`NoteDataset`] - a split encoded against a [`crate::lookups::LookupBundle`].
//! * [`collate`] - padding examples into a [`NoteBatch`].

pub mod collate;
pub mod dataset;
pub mod records;

#[doc(inline)]
pub use collate::{NoteBatch, collate};
#[doc(inline)]
pub use dataset::{NoteDataset, NoteItem};
#[doc(inline)]
pub use records::{DatasetFormat, NoteRecord, Split, load_note_records_path, split_path};
