use std::collections::HashMap;

use crate::tokenizer;

pub type DocId = u32;

/// One (document, occurrence count) pair within an index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub count: u32,
}

/// In-memory inverted index mapping each word to its postings. Postings
/// within an entry keep the order in which documents were first seen for
/// that word; that order is what the index file records.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    entries: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `word` in `doc_id`.
    pub fn add_occurrence(&mut self, word: &str, doc_id: DocId) {
        let postings = self.entries.entry(word.to_string()).or_default();
        match postings.iter_mut().find(|p| p.doc_id == doc_id) {
            Some(p) => p.count += 1,
            None => postings.push(Posting { doc_id, count: 1 }),
        }
    }

    /// Tokenise `html` and record every accepted word for document `doc_id`.
    pub fn index_document(&mut self, doc_id: DocId, html: &str) {
        for word in tokenizer::words(html) {
            self.add_occurrence(&word, doc_id);
        }
    }

    pub fn postings(&self, word: &str) -> Option<&[Posting]> {
        self.entries.get(word).map(|v| v.as_slice())
    }

    /// Install a whole entry at once. Used by the index loader.
    pub fn insert_entry(&mut self, word: String, postings: Vec<Posting>) {
        self.entries.insert(word, postings);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> + '_ {
        self.entries.iter().map(|(w, p)| (w.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of word occurrences recorded across all entries.
    pub fn total_occurrences(&self) -> u64 {
        self.entries.values().flatten().map(|p| u64::from(p.count)).sum()
    }
}
