/// Tuning constants for [`SearchServer`](crate::SearchServer) and its collaborators.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upper bound on the length of a `find_top_documents` result.
    pub max_result_document_count: usize,
    /// Relevances closer than this are ranked by rating instead.
    pub relevance_epsilon: f64,
    /// Bucket count of the accumulator used by parallel ranking.
    pub accumulator_buckets: usize,
    /// Number of most recent requests a [`RequestQueue`](crate::RequestQueue) remembers.
    pub request_window: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_result_document_count: 5,
            relevance_epsilon: 1e-6,
            accumulator_buckets: 1000,
            request_window: 1440, // one request per minute for a day
        }
    }
}
