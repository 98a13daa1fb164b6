use crate::document::{DocId, DocumentStatus};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Word to term frequency for a single document.
pub type WordFrequencies = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocMeta {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Forward and reverse word index plus per-document metadata.
///
/// `postings` and `doc_words` mirror each other exactly: a `(word, id, tf)` triple is
/// present in one iff it is present in the other. Callers validate ids and words
/// before calling [`InvertedIndex::insert`], which never fails.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: BTreeMap<String, BTreeMap<DocId, f64>>,
    doc_words: BTreeMap<DocId, WordFrequencies>,
    docs: BTreeMap<DocId, DocMeta>,
    doc_ids: Vec<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_words(&self) -> usize {
        self.postings.len()
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.docs.contains_key(&id)
    }

    pub fn doc(&self, id: DocId) -> Option<&DocMeta> {
        self.docs.get(&id)
    }

    /// Live ids in insertion order.
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    pub fn postings(&self, word: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.postings.get(word)
    }

    pub fn word_frequencies(&self, id: DocId) -> Option<&WordFrequencies> {
        self.doc_words.get(&id)
    }

    pub fn contains_word(&self, id: DocId, word: &str) -> bool {
        self.postings.get(word).is_some_and(|docs| docs.contains_key(&id))
    }

    /// `ln(N / df)` for a word present in `docs_with_word` documents.
    pub fn inverse_document_freq(&self, docs_with_word: usize) -> f64 {
        (self.num_docs() as f64 / docs_with_word as f64).ln()
    }

    /// Index `words` (stop words already removed) for a new document.
    pub fn insert(&mut self, id: DocId, words: &[&str], meta: DocMeta) {
        let inv_word_count = 1.0 / words.len() as f64;
        let doc_words = self.doc_words.entry(id).or_default();
        for &word in words {
            *self
                .postings
                .entry(word.to_string())
                .or_default()
                .entry(id)
                .or_insert(0.0) += inv_word_count;
            *doc_words.entry(word.to_string()).or_insert(0.0) += inv_word_count;
        }
        self.docs.insert(id, meta);
        self.doc_ids.push(id);
    }

    /// Retire a document from every structure. Returns `false` if it was absent.
    ///
    /// With `parallel` set, the id lookup and the sweep over word buckets run on the
    /// rayon pool.
    pub fn remove(&mut self, id: DocId, parallel: bool) -> bool {
        let position = if parallel {
            self.doc_ids.par_iter().position_first(|&doc| doc == id)
        } else {
            self.doc_ids.iter().position(|&doc| doc == id)
        };
        let Some(position) = position else {
            return false;
        };
        self.doc_ids.remove(position);
        self.docs.remove(&id);
        let words = self.doc_words.remove(&id).unwrap_or_default();

        if parallel {
            self.postings.par_iter_mut().for_each(|(_, docs)| {
                docs.remove(&id);
            });
        } else {
            for word in words.keys() {
                if let Some(docs) = self.postings.get_mut(word) {
                    docs.remove(&id);
                }
            }
        }
        for word in words.keys() {
            if self.postings.get(word).is_some_and(|docs| docs.is_empty()) {
                self.postings.remove(word);
            }
        }
        true
    }
}
