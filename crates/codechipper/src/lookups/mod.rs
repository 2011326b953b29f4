//! # Lookup Tables
//!
//! Assembles the code registry, the code descriptions, and the word list
//! into a single immutable [`LookupBundle`]:
//! * `fine` / `coarse` - [`CodeIndex`] bijections, in sorted code order,
//! * `fine2coarse` - the coarse index of each fine index,
//! * `desc` - padded description token indices, per fine code,
//! * `stats` - [`CodeStats`], per fine code.
//!
//! ```rust,no_run
//! use codechipper::lookups::LookupOptions;
//!
//! fn example() -> codechipper::errors::CCResult<()> {
//!     let bundle = LookupOptions::new("mimic/train_full.csv", "mimic", "mimic/vocab.csv")
//!         .with_hierarchical(true)
//!         .build()?;
//!
//!     println!("{} fine codes", bundle.num_fine());
//!     Ok(())
//! }
//! ```

mod code_index;
mod lookup_bundle;
mod lookup_options;

#[doc(inline)]
pub use code_index::CodeIndex;
#[doc(inline)]
pub use lookup_bundle::{CodeStats, LookupBundle, assemble_lookups, load_lookups, pad_sequences};
#[doc(inline)]
pub use lookup_options::{LookupOptions, load_lookup_options_path};
