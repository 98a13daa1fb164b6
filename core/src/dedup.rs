use crate::document::DocId;
use crate::server::SearchServer;
use std::collections::{BTreeSet, HashSet};

/// Remove every document whose set of indexed words matches an earlier document.
///
/// Documents are visited in insertion order, so the first of each group survives.
/// Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &SearchServer) -> Vec<DocId> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = BTreeSet::new();
    for id in server {
        let words: BTreeSet<String> = server.word_frequencies(id).into_keys().collect();
        if !seen.insert(words) {
            duplicates.insert(id);
        }
    }
    for &id in &duplicates {
        tracing::info!(id, "found duplicate document");
        server.remove_document(id);
    }
    duplicates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus::Actual;

    #[test]
    fn keeps_first_of_each_word_set() {
        let server = SearchServer::new("and with").unwrap();
        server.add_document(1, "funny pet and nasty rat", Actual, &[7, 2, 7]).unwrap();
        server.add_document(2, "funny pet with curly hair", Actual, &[1, 2]).unwrap();
        // same words as 2
        server.add_document(3, "funny pet with curly hair", Actual, &[1, 2]).unwrap();
        // differs only in stop words
        server.add_document(4, "funny pet and curly hair", Actual, &[1, 2]).unwrap();
        // same set, different frequencies
        server.add_document(5, "funny funny pet and nasty nasty rat", Actual, &[1, 2]).unwrap();
        server.add_document(6, "funny pet and not very nasty rat", Actual, &[1, 2]).unwrap();
        server.add_document(7, "very nasty rat and not very funny pet", Actual, &[1, 2]).unwrap();
        server.add_document(8, "pet with rat and rat and rat", Actual, &[1, 2]).unwrap();
        server.add_document(9, "nasty rat with curly hair", Actual, &[1, 2]).unwrap();

        assert_eq!(server.document_count(), 9);
        assert_eq!(remove_duplicates(&server), vec![3, 4, 5, 7]);
        assert_eq!(server.document_ids(), vec![1, 2, 6, 8, 9]);
    }
}
