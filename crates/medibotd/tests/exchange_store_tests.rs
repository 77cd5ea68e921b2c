//! Exchange Store Tests
//!
//! Append/list behaviour of the SQLite store: ordering, score round-trips,
//! persistence across handles and concurrent appends.

use medibot_common::{NewExchange, Scores};
use medibotd::store::ExchangeStore;
use tempfile::TempDir;

fn open_store() -> (TempDir, ExchangeStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = ExchangeStore::open(temp_dir.path().join("medical_chat.db")).unwrap();
    (temp_dir, store)
}

#[test]
fn test_fresh_store_is_empty() {
    let (_dir, store) = open_store();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_list_is_most_recent_first() {
    let (_dir, store) = open_store();

    for i in 0..5 {
        store
            .append(NewExchange::new(format!("query-{}", i), "response", Scores::default()))
            .unwrap();
    }

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(listed[0].query, "query-4");
    assert_eq!(listed[4].query, "query-0");

    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
        assert!(pair[0].id > pair[1].id);
    }
}

#[test]
fn test_scores_round_trip_exactly() {
    let (_dir, store) = open_store();

    let full = Scores {
        rouge1: Some(0.123456789012345),
        rouge2: Some(0.0),
        rouge_l: Some(1.0),
        bleu: Some(0.3333333333333333),
    };
    let partial = Scores {
        rouge1: None,
        rouge2: Some(0.5),
        rouge_l: None,
        bleu: Some(0.25),
    };

    store.append(NewExchange::new("full", "r", full)).unwrap();
    store.append(NewExchange::new("partial", "r", partial)).unwrap();
    store.append(NewExchange::new("none", "r", Scores::default())).unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed[0].query, "none");
    assert_eq!(listed[0].scores, Scores::default());
    assert_eq!(listed[1].scores, partial);
    assert_eq!(listed[2].scores, full);
}

#[test]
fn test_append_returns_what_list_reads() {
    let (_dir, store) = open_store();

    let appended = store
        .append(NewExchange::new(
            "Is it safe to take paracetamol with ibuprofen?",
            "Generally yes, but **consult** a pharmacist.\n\n- point one",
            Scores {
                rouge1: Some(0.4),
                ..Default::default()
            },
        ))
        .unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed, vec![appended]);
}

#[test]
fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("medical_chat.db");

    {
        let store = ExchangeStore::open(&path).unwrap();
        store.append(NewExchange::new("q1", "r1", Scores::default())).unwrap();
    }

    let store = ExchangeStore::open(&path).unwrap();
    store.append(NewExchange::new("q2", "r2", Scores::default())).unwrap();

    let queries: Vec<String> = store.list_all().unwrap().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["q2".to_string(), "q1".to_string()]);
}

#[test]
fn test_concurrent_appends_all_land() {
    let (_dir, store) = open_store();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                store
                    .append(NewExchange::new(format!("q{}", i), "r", Scores::default()))
                    .unwrap()
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap().id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(store.count().unwrap(), 8);
}
