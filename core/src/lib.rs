//! In-memory TF-IDF document search.
//!
//! Documents are split on spaces, stop words are dropped, and every remaining word
//! is indexed with its term frequency. Queries are plus-words that score a document
//! and `-`-prefixed minus-words that exclude it. Ranking runs either on the calling
//! thread or on the rayon pool, see [`ExecutionPolicy`].
//!
//! ```
//! use search_core::{DocumentStatus, SearchServer};
//!
//! let server = SearchServer::new("and in on").unwrap();
//! server.add_document(0, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3]).unwrap();
//! server.add_document(1, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
//!
//! let top = server.find_top_documents("fluffy groomed cat").unwrap();
//! assert_eq!(top[0].id, 1);
//! ```

pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod request_queue;
pub mod server;
pub mod tokenizer;

pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use dedup::remove_duplicates;
pub use document::{DocId, Document, DocumentStatus};
pub use error::{Error, Result};
pub use index::{InvertedIndex, WordFrequencies};
pub use paginator::{paginate, Paginator};
pub use process_queries::{process_queries, process_queries_joined};
pub use query::Query;
pub use request_queue::RequestQueue;
pub use server::{compute_average_rating, DocumentFilter, ExecutionPolicy, SearchServer};
