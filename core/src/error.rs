use crate::DocId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid document id {0}: negative or already present")]
    InvalidDocumentId(DocId),

    #[error("word {0:?} contains a control character")]
    InvalidWord(String),

    #[error("query contains an empty word")]
    EmptyQueryWord,

    #[error("query word {0:?} has more than one leading minus")]
    DoubleMinus(String),

    #[error("document {0} not found")]
    UnknownDocumentId(DocId),
}
