//! # Vocabulary
//!
//! The word vocabulary used to encode note text and code descriptions.
//! See [`WordVocab`] for the index layout and sentinels.

pub mod word_vocab;

#[doc(inline)]
pub use word_vocab::{PAD_INDEX, WordVocab, load_vocab_words_path, read_vocab_words};
