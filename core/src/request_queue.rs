use crate::document::Document;
use crate::error::Result;
use crate::server::{DocumentFilter, SearchServer};
use std::collections::VecDeque;

/// Remembers, for the most recent requests, whether each one found anything.
pub struct RequestQueue<'s> {
    server: &'s SearchServer,
    requests: VecDeque<bool>,
    window: usize,
}

impl<'s> RequestQueue<'s> {
    pub fn new(server: &'s SearchServer) -> Self {
        let window = server.config().request_window.max(1);
        Self { server, requests: VecDeque::with_capacity(window), window }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, DocumentFilter::default())
    }

    /// Run the search and record its outcome. Failed requests are not recorded.
    pub fn add_find_request_by<'a>(
        &mut self,
        raw_query: &str,
        filter: impl Into<DocumentFilter<'a>>,
    ) -> Result<Vec<Document>> {
        let documents = self.server.find_top_documents_by(raw_query, filter)?;
        self.record(&documents);
        Ok(documents)
    }

    /// Record the outcome of a search that already ran against the server.
    pub fn record(&mut self, documents: &[Document]) {
        if self.requests.len() >= self.window {
            self.requests.pop_front();
        }
        self.requests.push_back(documents.is_empty());
    }

    /// Requests inside the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.requests.iter().filter(|&&empty| empty).count()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
