use crate::concurrent_map::ConcurrentMap;
use crate::config::SearchConfig;
use crate::document::{DocId, Document, DocumentStatus};
use crate::error::{Error, Result};
use crate::index::{DocMeta, InvertedIndex, WordFrequencies};
use crate::query::Query;
use crate::tokenizer::{is_valid_word, make_unique_non_empty_strings, split_into_words};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How an operation spreads its work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    /// Fan out over query words and index buckets on the rayon pool.
    Parallel,
}

impl ExecutionPolicy {
    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionPolicy::Parallel)
    }
}

/// Decides which documents may be scored.
#[derive(Clone, Copy)]
pub enum DocumentFilter<'a> {
    Status(DocumentStatus),
    Predicate(&'a (dyn Fn(DocId, DocumentStatus, i32) -> bool + Sync + 'a)),
}

impl DocumentFilter<'_> {
    pub fn matches(&self, id: DocId, status: DocumentStatus, rating: i32) -> bool {
        match self {
            DocumentFilter::Status(wanted) => *wanted == status,
            DocumentFilter::Predicate(predicate) => predicate(id, status, rating),
        }
    }
}

impl Default for DocumentFilter<'_> {
    fn default() -> Self {
        DocumentFilter::Status(DocumentStatus::Actual)
    }
}

impl From<DocumentStatus> for DocumentFilter<'_> {
    fn from(status: DocumentStatus) -> Self {
        DocumentFilter::Status(status)
    }
}

impl<'a, F> From<&'a F> for DocumentFilter<'a>
where
    F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    fn from(predicate: &'a F) -> Self {
        DocumentFilter::Predicate(predicate)
    }
}

impl fmt::Debug for DocumentFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFilter::Status(status) => f.debug_tuple("Status").field(status).finish(),
            DocumentFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// In-memory TF-IDF search engine.
///
/// All operations take `&self`: the index sits behind a read-write lock, so
/// removals may run while other threads are searching. A search observes the index
/// either entirely before or entirely after a concurrent add or remove.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: BTreeSet<String>,
    config: SearchConfig,
    index: RwLock<InvertedIndex>,
}

impl SearchServer {
    /// Build a server whose stop words are the space-separated words of `stop_words_text`.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Self::with_config(split_into_words(stop_words_text), SearchConfig::default())
    }

    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = make_unique_non_empty_strings(stop_words);
        if let Some(invalid) = stop_words.iter().find(|word| !is_valid_word(word)) {
            return Err(Error::InvalidWord(invalid.clone()));
        }
        Ok(Self { stop_words, config, index: RwLock::new(InvertedIndex::new()) })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &BTreeSet<String> {
        &self.stop_words
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::InvalidWord(word.to_string()));
            }
            if !self.is_stop_word(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    pub fn parse_query(&self, raw_query: &str) -> Result<Query> {
        Query::parse(raw_query, &self.stop_words)
    }

    /// Index a document. Nothing is stored unless every check passes.
    pub fn add_document(
        &self,
        id: DocId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(Error::InvalidDocumentId(id));
        }
        let mut index = self.index.write();
        if index.contains(id) {
            return Err(Error::InvalidDocumentId(id));
        }
        let words = self.split_into_words_no_stop(text)?;
        let meta = DocMeta { rating: compute_average_rating(ratings), status };
        index.insert(id, &words, meta);
        tracing::debug!(id, words = words.len(), rating = meta.rating, "added document");
        Ok(())
    }

    /// Top documents with status `Actual`, ranked sequentially.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, DocumentFilter::default())
    }

    pub fn find_top_documents_by<'a>(
        &self,
        raw_query: &str,
        filter: impl Into<DocumentFilter<'a>>,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(ExecutionPolicy::Sequential, raw_query, filter)
    }

    /// Rank the documents accepted by `filter`: relevance descending, near-equal
    /// relevances by rating descending, cut to the configured maximum.
    pub fn find_top_documents_with<'a>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        filter: impl Into<DocumentFilter<'a>>,
    ) -> Result<Vec<Document>> {
        let query = self.parse_query(raw_query)?;
        let mut matched = self.find_all_documents(policy, &query, filter.into());

        sort_by_rank(&mut matched, self.config.relevance_epsilon, policy);
        matched.truncate(self.config.max_result_document_count);
        tracing::trace!(query = raw_query, hits = matched.len(), "found top documents");
        Ok(matched)
    }

    /// Every document scoring on `query`, in ascending id order.
    pub fn find_all_documents(
        &self,
        policy: ExecutionPolicy,
        query: &Query,
        filter: DocumentFilter<'_>,
    ) -> Vec<Document> {
        let index = self.index.read();
        match policy {
            ExecutionPolicy::Sequential => find_all_sequential(&index, query, &filter),
            ExecutionPolicy::Parallel => {
                find_all_parallel(&index, query, &filter, self.config.accumulator_buckets)
            }
        }
    }

    /// Plus-words of `raw_query` found in document `id`, or nothing if any minus-word is.
    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, id)
    }

    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let guard = self.index.read();
        let index: &InvertedIndex = &guard;
        let status = index.doc(id).ok_or(Error::UnknownDocumentId(id))?.status;
        let query = self.parse_query(raw_query)?;
        let in_doc = |word: &String| index.contains_word(id, word);

        let matched: Vec<String> = match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(in_doc) {
                    return Ok((Vec::new(), status));
                }
                query.plus_words.iter().filter(|word| in_doc(*word)).cloned().collect()
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(in_doc) {
                    return Ok((Vec::new(), status));
                }
                query.plus_words.par_iter().filter(|word| in_doc(*word)).cloned().collect()
            }
        };
        Ok((matched, status))
    }

    /// Remove a document. Unknown ids are ignored.
    pub fn remove_document(&self, id: DocId) {
        self.remove_document_with(ExecutionPolicy::Sequential, id);
    }

    pub fn remove_document_with(&self, policy: ExecutionPolicy, id: DocId) {
        if self.index.write().remove(id, policy.is_parallel()) {
            tracing::debug!(id, ?policy, "removed document");
        }
    }

    pub fn document_count(&self) -> usize {
        self.index.read().num_docs()
    }

    /// Snapshot of the live ids in insertion order.
    pub fn document_ids(&self) -> Vec<DocId> {
        self.index.read().doc_ids().to_vec()
    }

    pub fn iter(&self) -> std::vec::IntoIter<DocId> {
        self.document_ids().into_iter()
    }

    /// Term frequencies of a document; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> WordFrequencies {
        self.index.read().word_frequencies(id).cloned().unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = std::vec::IntoIter<DocId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mean of the ratings, truncated toward zero; zero for no ratings.
pub fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

/// Relevance descending, then each run of adjacent relevances closer than
/// `epsilon` reordered by rating descending and id ascending.
fn sort_by_rank(documents: &mut [Document], epsilon: f64, policy: ExecutionPolicy) {
    let by_relevance = |lhs: &Document, rhs: &Document| {
        rhs.relevance
            .total_cmp(&lhs.relevance)
            .then_with(|| rhs.rating.cmp(&lhs.rating))
            .then_with(|| lhs.id.cmp(&rhs.id))
    };
    match policy {
        ExecutionPolicy::Sequential => documents.sort_by(by_relevance),
        ExecutionPolicy::Parallel => documents.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len() && (documents[end - 1].relevance - documents[end].relevance).abs() < epsilon {
            end += 1;
        }
        documents[start..end].sort_by(|lhs, rhs| rhs.rating.cmp(&lhs.rating).then_with(|| lhs.id.cmp(&rhs.id)));
        start = end;
    }
}

fn find_all_sequential(index: &InvertedIndex, query: &Query, filter: &DocumentFilter<'_>) -> Vec<Document> {
    let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for word in &query.plus_words {
        let Some(postings) = index.postings(word) else {
            continue;
        };
        let idf = index.inverse_document_freq(postings.len());
        for (&id, &term_freq) in postings {
            let Some(meta) = index.doc(id) else {
                continue;
            };
            if filter.matches(id, meta.status, meta.rating) {
                *relevance.entry(id).or_insert(0.0) += term_freq * idf;
            }
        }
    }
    for word in &query.minus_words {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                relevance.remove(id);
            }
        }
    }
    collect_documents(index, relevance)
}

fn find_all_parallel(
    index: &InvertedIndex,
    query: &Query,
    filter: &DocumentFilter<'_>,
    buckets: usize,
) -> Vec<Document> {
    let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(buckets);
    query.plus_words.par_iter().for_each(|word| {
        let Some(postings) = index.postings(word) else {
            return;
        };
        let idf = index.inverse_document_freq(postings.len());
        for (&id, &term_freq) in postings {
            let Some(meta) = index.doc(id) else {
                continue;
            };
            if filter.matches(id, meta.status, meta.rating) {
                *relevance.access(id) += term_freq * idf;
            }
        }
    });
    query.minus_words.par_iter().for_each(|word| {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                relevance.erase(id);
            }
        }
    });
    collect_documents(index, relevance.build_ordinary_map())
}

fn collect_documents(index: &InvertedIndex, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| index.doc(id).map(|meta| Document::new(id, relevance, meta.rating)))
        .collect()
}
