use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, split_into_words};
use std::collections::BTreeSet;

/// A parsed query: words that score a document and words that exclude it.
///
/// Both sets are sorted and free of duplicates. The same word may end up in both
/// sets when the query spells it with and without a minus; exclusion wins then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(token: &'a str, stop_words: &BTreeSet<String>) -> Result<QueryWord<'a>> {
    let (data, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    if data.is_empty() {
        return Err(Error::EmptyQueryWord);
    }
    if data.starts_with('-') {
        return Err(Error::DoubleMinus(token.to_string()));
    }
    if !is_valid_word(data) {
        return Err(Error::InvalidWord(data.to_string()));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}

impl Query {
    /// Parse raw query text. Any malformed token rejects the whole query.
    pub fn parse(text: &str, stop_words: &BTreeSet<String>) -> Result<Self> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = parse_query_word(token, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.data.to_string());
            } else {
                query.plus_words.insert(word.data.to_string());
            }
        }
        tracing::trace!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            "parsed query"
        );
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}
