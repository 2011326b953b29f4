//! # `codechipper` ICD Coding Data Suite
//!
//! Builds the code and word lookups for multi-label ICD-9 coding of
//! MIMIC-III discharge summaries, and turns labeled notes into padded
//! token batches with fine (full code) and coarse (category) targets.
//!
//! See:
//! * [`codes`] for code formatting, the code registry, and code descriptions.
//! * [`vocab`] for the word vocabulary.
//! * [`lookups`] to assemble the immutable [`lookups::LookupBundle`].
//! * [`data`] for labeled split formats, the dataset, and batch collation.
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``.
//!
//! This is done by the ``types::CCHash{*}`` type alias machinery.
//!
//! ## Loading a Split
//!
//! ```rust,no_run
//! use codechipper::{data::NoteDataset, lookups::LookupOptions};
//!
//! fn example() -> codechipper::errors::CCResult<()> {
//!     let options = LookupOptions::new("mimic/train_50.csv", "mimic", "mimic/vocab.csv")
//!         .with_max_len(Some(2500));
//!     let lookups = options.build()?;
//!
//!     let dataset = NoteDataset::open("mimic/dev_50.csv", &lookups, options.max_len)?;
//!     for batch in dataset.batches(16) {
//!         let batch = batch?;
//!         println!("{:?}", batch.tokens.shape());
//!     }
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

pub mod codes;
pub mod data;
pub mod errors;
pub mod lookups;
pub mod types;
pub mod vocab;
