use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use search_core::{Document, DocumentStatus, ExecutionPolicy, SearchServer};
use std::thread;

fn random_word(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(1..=max_len);
    (0..len).map(|_| rng.gen_range(b'a'..=b'f') as char).collect()
}

fn random_server(seed: u64, docs: i32) -> (SearchServer, Vec<String>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let dictionary: Vec<String> = (0..300).map(|_| random_word(&mut rng, 5)).collect();
    let server = SearchServer::new("a b c").unwrap();
    for id in 0..docs {
        let words: Vec<&str> = (0..rng.gen_range(1..40))
            .filter_map(|_| dictionary.choose(&mut rng).map(String::as_str))
            .collect();
        let ratings: Vec<i32> = (0..3).map(|_| rng.gen_range(-10..=10)).collect();
        let status = if id % 7 == 0 { DocumentStatus::Banned } else { DocumentStatus::Actual };
        server.add_document(id, &words.join(" "), status, &ratings).unwrap();
    }
    let queries = (0..50)
        .map(|_| {
            (0..6)
                .map(|i| {
                    let word = dictionary.choose(&mut rng).cloned().unwrap_or_default();
                    if i == 5 { format!("-{word}") } else { word }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    (server, queries)
}

fn assert_same(seq: &[Document], par: &[Document]) {
    assert_eq!(seq.len(), par.len());
    for (s, p) in seq.iter().zip(par) {
        assert_eq!(s.id, p.id);
        assert_eq!(s.rating, p.rating);
        assert!((s.relevance - p.relevance).abs() < 1e-9);
    }
}

#[test]
fn parallel_ranking_matches_sequential() {
    let (server, queries) = random_server(42, 2000);
    let high = |_: i32, _: DocumentStatus, rating: i32| rating > 0;
    for query in &queries {
        let seq = server.find_top_documents_with(ExecutionPolicy::Sequential, query, DocumentStatus::Actual).unwrap();
        let par = server.find_top_documents_with(ExecutionPolicy::Parallel, query, DocumentStatus::Actual).unwrap();
        assert_same(&seq, &par);

        let seq = server.find_top_documents_with(ExecutionPolicy::Sequential, query, &high).unwrap();
        let par = server.find_top_documents_with(ExecutionPolicy::Parallel, query, &high).unwrap();
        assert_same(&seq, &par);
    }
}

#[test]
fn parallel_find_all_matches_sequential() {
    let (server, queries) = random_server(7, 500);
    for raw in &queries {
        let query = server.parse_query(raw).unwrap();
        let any = |_: i32, _: DocumentStatus, _: i32| true;
        let seq = server.find_all_documents(ExecutionPolicy::Sequential, &query, (&any).into());
        let par = server.find_all_documents(ExecutionPolicy::Parallel, &query, (&any).into());
        assert_same(&seq, &par);
    }
}

#[test]
fn parallel_match_matches_sequential() {
    let (server, queries) = random_server(3, 200);
    for query in queries.iter().take(10) {
        for id in &server {
            assert_eq!(
                server.match_document_with(ExecutionPolicy::Sequential, query, id),
                server.match_document_with(ExecutionPolicy::Parallel, query, id)
            );
        }
    }
}

#[test]
fn parallel_and_sequential_removal_agree() {
    let (left, queries) = random_server(11, 300);
    let (right, _) = random_server(11, 300);
    for id in (0..300).step_by(3) {
        left.remove_document_with(ExecutionPolicy::Sequential, id);
        right.remove_document_with(ExecutionPolicy::Parallel, id);
    }
    assert_eq!(left.document_ids(), right.document_ids());
    for id in &left {
        assert_eq!(left.word_frequencies(id), right.word_frequencies(id));
    }
    for query in &queries {
        assert_same(&left.find_top_documents(query).unwrap(), &right.find_top_documents(query).unwrap());
    }
}

#[test]
fn removal_during_parallel_searches() {
    let (server, queries) = random_server(99, 1000);
    let doomed: Vec<i32> = (0..1000).filter(|id| id % 2 == 1).collect();

    thread::scope(|s| {
        for chunk in queries.chunks(10) {
            let server = &server;
            s.spawn(move || {
                for _ in 0..5 {
                    for query in chunk {
                        let found = server
                            .find_top_documents_with(ExecutionPolicy::Parallel, query, DocumentStatus::Actual)
                            .unwrap();
                        assert!(found.len() <= 5);
                    }
                }
            });
        }
        let server = &server;
        let doomed = &doomed;
        s.spawn(move || {
            for &id in doomed {
                server.remove_document_with(ExecutionPolicy::Parallel, id);
            }
        });
    });

    assert_eq!(server.document_count(), 500);
    assert!(server.document_ids().iter().all(|id| id % 2 == 0));
    for query in &queries {
        for doc in server.find_top_documents_with(ExecutionPolicy::Parallel, query, DocumentStatus::Actual).unwrap() {
            assert_eq!(doc.id % 2, 0);
        }
    }
    for &id in &doomed {
        assert!(server.word_frequencies(id).is_empty());
    }
}
