//! # ICD Codes
//!
//! Code string handling, the code registry built from the labeled splits,
//! and the description lookup built from the reference tables.
//!
//! ## Fine and Coarse Codes
//!
//! A fine code such as `"250.01"` belongs to the coarse code (category)
//! before its first separator, `"250"`. See [`coarse_code`].

pub mod code_strings;
pub mod descriptions;
pub mod registry;

#[doc(inline)]
pub use code_strings::{coarse_code, reformat, strip_code, tokenize_description};
#[doc(inline)]
pub use descriptions::{DescriptionLookup, load_code_descriptions};
#[doc(inline)]
pub use registry::{CodeRegistry, load_full_codes};
