// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end coordinator tests over a file-backed SQLite store:
// write/read across the type catalog, durability across reopen, overlay
// discard/reload, and the standard process-wide instance.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use prefstore::{Blob, JsonRecord, PrefStore, RowStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    age: i64,
    score: f64,
}

fn open_store(dir: &TempDir) -> PrefStore {
    PrefStore::open(dir.path().join("caches.db")).expect("open store")
}

#[test]
fn full_catalog_survives_set_and_get() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    store.set("boolean", true).expect("set bool");
    store.set("int", 13_503i64).expect("set i64");
    store.set("int_negative", -113_503i64).expect("set i64");
    store
        .set("uint", 0xC002_0840_020C_4011u64)
        .expect("set u64");
    store.set("float", 73.43f32).expect("set f32");
    store.set("double", 73.43f64).expect("set f64");
    store
        .set("string", String::from("This is String \u{1F60A}"))
        .expect("set text");
    store
        .set("data", Blob::from(&b"Data data \xE2\x9C\x94"[..]))
        .expect("set blob");

    assert!(store.get::<bool>("boolean").expect("get bool"));
    assert_eq!(store.get::<i64>("int").expect("get i64"), 13_503);
    assert_eq!(store.get::<i64>("int_negative").expect("get i64"), -113_503);
    assert_eq!(
        store.get::<u64>("uint").expect("get u64"),
        0xC002_0840_020C_4011
    );
    assert_eq!(store.get::<f32>("float").expect("get f32"), 73.43);
    assert_eq!(store.get::<f64>("double").expect("get f64"), 73.43);
    assert_eq!(
        store.get::<String>("string").expect("get text"),
        "This is String \u{1F60A}"
    );
    assert_eq!(
        store.get::<Blob>("data").expect("get blob").as_bytes(),
        b"Data data \xE2\x9C\x94"
    );
}

#[test]
fn timestamp_roundtrips_to_double_precision() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    let stamp = SystemTime::now();
    store.set("date", stamp).expect("set timestamp");
    let loaded: SystemTime = store.get("date").expect("get timestamp");

    let expected = stamp.duration_since(UNIX_EPOCH).expect("after epoch");
    let actual = loaded.duration_since(UNIX_EPOCH).expect("after epoch");
    assert!((expected.as_secs_f64() - actual.as_secs_f64()).abs() < 1e-6);
}

#[test]
fn containers_and_records_roundtrip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    let ints: Vec<i64> = (0..10_000).collect();
    store.set("array_int", ints.clone()).expect("set sequence");
    assert_eq!(store.get::<Vec<i64>>("array_int").expect("get"), ints);

    let mut dict: HashMap<String, Vec<i64>> = HashMap::new();
    dict.insert(String::from("k1"), vec![1, 2, 3, 4]);
    dict.insert(String::from("k2"), vec![45, 6575, 74]);
    store.set("dict_com", dict.clone()).expect("set map");
    assert_eq!(
        store.get::<HashMap<String, Vec<i64>>>("dict_com").expect("get"),
        dict
    );

    let app = vec![
        JsonRecord::new(User {
            name: String::from("Li Hua"),
            age: 18,
            score: 550.0,
        }),
        JsonRecord::new(User {
            name: String::from("Han Meimei"),
            age: 19,
            score: 690.0,
        }),
    ];
    store.set("codable", app.clone()).expect("set records");
    assert_eq!(
        store.get::<Vec<JsonRecord<User>>>("codable").expect("get"),
        app
    );
}

#[test]
fn values_survive_reopen_from_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");

    {
        let store = open_store(&dir);
        store.set("persisted", String::from("still here")).expect("set");
    }

    // A fresh coordinator over the same file starts with an empty
    // overlay and must decode from the durable tier.
    let store = open_store(&dir);
    assert_eq!(
        store.get::<String>("persisted").expect("get"),
        "still here"
    );
}

#[test]
fn overwrite_keeps_one_row_per_key() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    store.set("k", 5i64).expect("set");
    store.set("k", 6i64).expect("set");
    assert_eq!(store.get::<i64>("k").expect("get"), 6);
    assert_eq!(store.rows().count().expect("count"), 1);
}

#[test]
fn discard_overlay_then_read_reloads_transparently() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    store.set("k", vec![String::from("a"), String::from("b")]).expect("set");
    assert!(store.discard_overlay());

    let value: Vec<String> = store.get("k").expect("get after discard");
    assert_eq!(value, vec!["a", "b"]);
}

#[test]
fn remove_all_empties_the_durable_store() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    store.set("a", 1i64).expect("set");
    store.set("b", 2i64).expect("set");
    store.remove_all().expect("remove_all");

    assert_eq!(store.rows().count().expect("count"), 0);
    assert!(matches!(
        store.get::<i64>("a").unwrap_err(),
        StoreError::NoSuchValue { .. }
    ));
    assert!(matches!(
        store.get::<i64>("b").unwrap_err(),
        StoreError::NoSuchValue { .. }
    ));
}

#[test]
fn decode_failures_propagate_through_get() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = open_store(&dir);

    store.set("typed", 42i64).expect("set");
    store.discard_overlay();

    let err = store.get::<Vec<i64>>("typed").unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[test]
fn standard_store_is_one_instance_per_process() {
    let first = prefstore::standard().expect("open standard store");
    let second = prefstore::standard().expect("open standard store");
    assert!(std::ptr::eq(first, second));

    first.set("standard_probe", 99i64).expect("set");
    assert_eq!(second.get::<i64>("standard_probe").expect("get"), 99);

    prefstore::reset_standard().expect("reset standard store");
    assert!(matches!(
        first.get::<i64>("standard_probe").unwrap_err(),
        StoreError::NoSuchValue { .. }
    ));
    assert_eq!(first.rows().count().expect("count"), 0);
}
