use std::collections::HashMap;

use crate::html;
use crate::pages::{Page, PageDir};
use crate::words;

pub type DocId = u32;

/// Per-word map of document id to occurrence count. Counts are at least 1
/// once built or loaded; zero-count entries are pruned, never stored.
pub type Postings = HashMap<DocId, u32>;

/// In-memory inverted index: normalized word -> postings.
#[derive(Debug, Default, PartialEq)]
pub struct InvertedIndex {
    terms: HashMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.terms.contains_key(word)
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.terms.get(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Postings)> {
        self.terms.iter()
    }

    /// Count one occurrence of `word` in `doc_id`.
    pub fn increment(&mut self, word: String, doc_id: DocId) {
        *self.terms.entry(word).or_default().entry(doc_id).or_insert(0) += 1;
    }

    /// Install a fully formed postings map under `word`.
    pub fn insert(&mut self, word: String, postings: Postings) {
        self.terms.insert(word, postings);
    }

    /// Scan a page directory and build the index over it, one record at a
    /// time under the enumeration contract of [`PageDir::docs`].
    pub fn build(pages: &PageDir) -> Self {
        let mut index = Self::new();
        let mut docs = 0u32;
        for (doc_id, page) in pages.docs() {
            index.index_page(&page, doc_id);
            docs += 1;
        }
        tracing::info!(docs, words = index.len(), "index built");
        index
    }

    /// Index every word of length >= [`words::MIN_WORD_LEN`] in the page.
    fn index_page(&mut self, page: &Page, doc_id: DocId) {
        let text = html::extract_text(&page.content);
        for word in words::extract_words(&text) {
            if word.len() >= words::MIN_WORD_LEN {
                self.increment(words::normalize(&word), doc_id);
            }
        }
    }
}
