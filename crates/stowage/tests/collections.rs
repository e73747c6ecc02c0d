//! End-to-end tests for typed collections against a real environment file.
//!
//! Each test opens its own environment in a temporary directory, writes through
//! one or more maps, and checks what later transactions (and later processes,
//! simulated by reopening) observe.

// Test code is allowed to use unwrap for simplicity
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use stowage::{
    AutoPaddedArrayMap, AutoPaddedMap, BinaryCollection, CollectionOptions, Environment, EnvironmentConfig,
    PaddedValue, TypedArrayMap, TypedMap, View,
};
use stowage_test_utils::{Sample, TestDir};

fn config() -> EnvironmentConfig {
    EnvironmentConfig::builder().map_size(32 * 1024 * 1024).max_collections(8).build().expect("valid config")
}

fn open(path: &Path) -> Environment {
    Environment::open(path, config()).expect("open environment")
}

fn sample(id: u64) -> Sample {
    Sample { id, reading: id as f64 * 0.5, flags: id as u32, channel: 3, level: 9, reserved: 0 }
}

#[test]
fn typed_records_survive_reopen() {
    let dir = TestDir::new();
    let path = dir.db_path("records.mdb");
    let samples = TypedMap::<u64, Sample>::new("samples");

    {
        let env = open(&path);
        let mut txn = env.write_txn().expect("begin write");
        for id in 0..100 {
            samples.put(&mut txn, &id, &sample(id)).expect("put");
        }
        txn.commit().expect("commit");
    }

    let env = open(&path);
    let txn = env.read_txn().expect("begin read");
    for id in 0..100 {
        assert_eq!(*samples.get(&txn, &id).expect("get"), sample(id));
    }
    assert!(!samples.exists(&txn, &100).expect("exists"));
}

#[test]
fn padded_scenarios_share_one_environment() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("scenarios.mdb"));
    let single = AutoPaddedMap::<i32, u8>::new("mdb_p_p");
    let arrays = AutoPaddedArrayMap::<i32, u8>::new("mdb_p_parr");

    let mut txn = env.write_txn().expect("begin write");
    single.put(&mut txn, 123, b'a').expect("put");
    arrays.put(&mut txn, 22, [b'a', b'b', b'c']).expect("put");
    txn.commit().expect("commit");

    let txn = env.read_txn().expect("begin read");
    assert_eq!(*single.get(&txn, 123).expect("get"), b'a');

    let view = arrays.get(&txn, 22).expect("get");
    assert_eq!(view.len(), 3);
    assert_eq!(*view[1], b'b');

    // The two collections do not see each other's keys.
    assert!(!single.exists(&txn, 22).expect("exists"));
    assert!(!arrays.exists(&txn, 123).expect("exists"));
}

#[test]
fn raw_and_typed_access_agree() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("raw.mdb"));
    let typed = TypedArrayMap::<u64, u64>::new("numbers");
    let raw = BinaryCollection::new("numbers");

    let mut txn = env.write_txn().expect("begin write");
    typed.put(&mut txn, &1, &[10, 20, 30]).expect("put");
    txn.commit().expect("commit");

    let txn = env.read_txn().expect("begin read");
    let bytes = raw.get(&txn, &1u64.to_ne_bytes()).expect("raw get");
    assert_eq!(bytes.len(), 24);
    assert_eq!(bytes.cast::<u64>().as_slice(), typed.get(&txn, &1).expect("typed get").as_slice());

    let reread: View<'_, u64> = View::from_bytes(bytes.as_slice());
    assert_eq!(reread.to_vec(), vec![10, 20, 30]);
}

#[test]
fn padded_bytes_are_reproducible() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("padding.mdb"));
    let map = AutoPaddedMap::<u16, u16>::new("shorts");
    let raw = BinaryCollection::new("shorts");

    let mut txn = env.write_txn().expect("begin write");
    map.put(&mut txn, 0x0102, 0xBEEF).expect("put");
    txn.commit().expect("commit");

    let txn = env.read_txn().expect("begin read");
    let key = PaddedValue::<u16>::new(0x0102);
    let stored = raw.get(&txn, key.as_bytes()).expect("raw get");
    assert_eq!(stored.as_slice(), PaddedValue::<u16>::new(0xBEEF).as_bytes());
    assert!(stored.as_slice()[2..].iter().all(|&b| b == 0));
}

#[test]
fn readers_keep_their_snapshot() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("snapshots.mdb"));
    let counters = TypedMap::<u64, u64>::new("counters");

    let mut txn = env.write_txn().expect("begin write");
    counters.put(&mut txn, &0, &1).expect("put");
    txn.commit().expect("commit");

    let before = env.read_txn().expect("begin read");
    let old = counters.get(&before, &0).expect("get");

    let mut txn = env.write_txn().expect("begin write");
    counters.put(&mut txn, &0, &2).expect("put");
    txn.commit().expect("commit");

    // One live read transaction per thread; observe the new value elsewhere.
    let current = std::thread::scope(|scope| {
        scope
            .spawn(|| {
                let after = env.read_txn().expect("begin read");
                *counters.get(&after, &0).expect("get")
            })
            .join()
            .expect("reader thread")
    });

    assert_eq!(*old, 1);
    assert_eq!(current, 2);
}

#[test]
fn concurrent_readers_see_committed_data() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("readers.mdb"));
    let map = TypedArrayMap::<u64, Sample>::new("batches");

    let mut txn = env.write_txn().expect("begin write");
    for batch in 0..8u64 {
        let rows: Vec<Sample> = (0..batch).map(sample).collect();
        map.put(&mut txn, &batch, &rows).expect("put");
    }
    txn.commit().expect("commit");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let env = env.clone();
            let map = &map;
            scope.spawn(move || {
                let txn = env.read_txn().expect("begin read");
                for batch in 0..8u64 {
                    let view = map.get(&txn, &batch).expect("get");
                    assert_eq!(view.len() as u64, batch);
                    assert!(view.iter().zip(0..).all(|(row, id)| *row == sample(id)));
                }
            });
        }
    });
}

#[test]
fn existing_only_maps_need_a_created_collection() {
    let dir = TestDir::new();
    let env = open(&dir.db_path("strict.mdb"));
    let strict = TypedMap::<u64, u64>::with_options("strict", CollectionOptions::existing());

    let mut txn = env.write_txn().expect("begin write");
    let err = strict.put(&mut txn, &1, &1).unwrap_err();
    assert!(matches!(err, stowage::Error::CollectionMissing { .. }));
    txn.abort();

    let mut txn = env.write_txn().expect("begin write");
    TypedMap::<u64, u64>::new("strict").put(&mut txn, &0, &0).expect("create");
    strict.put(&mut txn, &1, &1).expect("put once created");
    txn.commit().expect("commit");

    let txn = env.read_txn().expect("begin read");
    assert_eq!(*strict.get(&txn, &1).expect("get"), 1);
}

#[test]
fn collection_limit_is_enforced() {
    let dir = TestDir::new();
    let config = EnvironmentConfig::builder().map_size(8 * 1024 * 1024).max_collections(1).build().expect("config");
    let env = Environment::open(dir.db_path("limit.mdb"), config).expect("open");

    let mut txn = env.write_txn().expect("begin write");
    BinaryCollection::new("first").put(&mut txn, b"k", b"v").expect("first collection");
    let err = BinaryCollection::new("second").put(&mut txn, b"k", b"v").unwrap_err();
    assert!(matches!(err, stowage::Error::Collection { .. }));
}
