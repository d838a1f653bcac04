//! Shared engine pieces: the page store, the inverted index and its textual
//! codec, and the HTML/word extraction helpers used by the binaries.

pub mod html;
pub mod index;
pub mod pages;
pub mod persist;
pub mod words;

pub use index::{DocId, InvertedIndex, Postings};
pub use pages::{Page, PageDir};
