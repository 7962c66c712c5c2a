//! Integration tests for the typed store under concurrent installs.

use hotprops::codec::{Delimiters, NamedVariant, TypedValue};
use hotprops::props::PropertyMapping;
use hotprops::store::TypedStore;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Mapping for generation `generation` with `width` keys.
///
/// Every key holds the generation, `width` holds the key count, and `list`
/// repeats the generation once per key, so a torn read is detectable.
fn generation_mapping(generation: u64, width: usize) -> PropertyMapping {
    let mut entries: Vec<(String, String)> = (0..width)
        .map(|i| (format!("k{i}"), generation.to_string()))
        .collect();
    entries.push(("generation".into(), generation.to_string()));
    entries.push(("width".into(), width.to_string()));
    entries.push((
        "list".into(),
        vec![generation.to_string(); width].join(","),
    ));
    entries.into_iter().collect()
}

fn check_consistent(mapping: &PropertyMapping) -> u64 {
    let generation: u64 = mapping.get("generation").unwrap().parse().unwrap();
    let width: usize = mapping.get("width").unwrap().parse().unwrap();
    assert_eq!(mapping.len(), width + 3, "mapping has keys from another load");
    for i in 0..width {
        assert_eq!(
            mapping.get(&format!("k{i}")),
            Some(generation.to_string().as_str())
        );
    }
    generation
}

#[test]
fn reload_atomicity_under_concurrent_reads() {
    let store = Arc::new(TypedStore::with_mapping(generation_mapping(0, 1)));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..6)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut last_seen = 0u64;
                let mut reads = 0usize;
                while !done.load(Ordering::Acquire) {
                    if rng.gen_bool(0.5) {
                        let snapshot = store.snapshot().unwrap();
                        let generation = check_consistent(&snapshot);
                        assert!(generation >= last_seen, "generation went backwards");
                        last_seen = generation;
                    } else {
                        let list: Vec<String> = store.get("list", Vec::new());
                        assert!(!list.is_empty());
                        assert!(list.iter().all(|item| item == &list[0]));
                    }
                    reads += 1;
                    if rng.gen_ratio(1, 8) {
                        thread::yield_now();
                    }
                }
                reads
            })
        })
        .collect();

    let mut rng = rand::thread_rng();
    for generation in 1..=500u64 {
        let width = rng.gen_range(1..=40);
        store.install(generation_mapping(generation, width));
        if rng.gen_ratio(1, 4) {
            thread::sleep(Duration::from_micros(rng.gen_range(0..200)));
        }
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(store.get("generation", 0u64), 500);
}

#[test]
fn absent_key_yields_exact_default_for_every_kind() {
    let store = TypedStore::with_mapping([("present", "1")].into_iter().collect());
    assert!(store.get("absent", true));
    assert!(!store.get("absent", false));
    assert_eq!(store.get("absent", i8::MIN), i8::MIN);
    assert_eq!(store.get("absent", i32::MAX), i32::MAX);
    assert_eq!(store.get("absent", -1i64), -1);
    assert_eq!(store.get("absent", 2.5f64), 2.5);
    assert_eq!(store.get("absent", String::from("dflt")), "dflt");
    assert_eq!(store.get("absent", vec![1, 2]), vec![1, 2]);
    let map: HashMap<String, String> = store.get("absent", HashMap::from([("a".into(), "b".into())]));
    assert_eq!(map["a"], "b");
}

#[test]
fn malformed_numerics_yield_default() {
    let store = TypedStore::with_mapping(
        [
            ("overflow", "99999999999"),
            ("float", "1.5"),
            ("hex_bad", "0xZZ"),
            ("empty", ""),
            ("byte", "128"),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(store.get("overflow", 7i32), 7);
    assert_eq!(store.get("float", 7i32), 7);
    assert_eq!(store.get("hex_bad", 7i64), 7);
    assert_eq!(store.get("empty", 7i32), 7);
    assert_eq!(store.get("empty", 0.25f64), 0.25);
    assert_eq!(store.get("byte", 7i8), 7);
}

#[test]
fn boolean_synonyms() {
    let truthy = ["true", "VERO", " on ", "Yes", "si", "1"];
    let falsy = ["FALSE", "falso", "Off ", " no", "0"];
    let entries = truthy
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("t{i}"), v.to_string()))
        .chain(falsy.iter().enumerate().map(|(i, v)| (format!("f{i}"), v.to_string())))
        .chain([("maybe".to_string(), "maybe".to_string())]);
    let store = TypedStore::with_mapping(entries.collect());

    for i in 0..truthy.len() {
        assert!(store.get(&format!("t{i}"), false), "{}", truthy[i]);
    }
    for i in 0..falsy.len() {
        assert!(!store.get(&format!("f{i}"), true), "{}", falsy[i]);
    }
    assert!(store.get("maybe", true));
    assert!(!store.get("maybe", false));
}

#[test]
fn typed_map_through_store() {
    let store = TypedStore::with_mapping(
        [("objects", "k1:(Integer)5,k2:(List)a|b|c")].into_iter().collect(),
    );
    let map: HashMap<String, TypedValue> = store.get("objects", HashMap::new());
    assert_eq!(map.len(), 2);
    assert_eq!(map["k1"], TypedValue::Integer(5));
    assert_eq!(
        map["k2"].as_list(),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Transport {
    Tcp,
    Udp,
}

impl NamedVariant for Transport {
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("TCP", Transport::Tcp), ("UDP", Transport::Udp)];
}

#[test]
fn enum_resolution_is_exact() {
    let store = TypedStore::with_mapping(
        [
            ("upper", "UDP"),
            ("lower", "udp"),
            ("list", "TCP;tcp;UDP"),
        ]
        .into_iter()
        .collect(),
    );
    assert_eq!(store.get_enum::<Transport>("upper"), Some(Transport::Udp));
    assert_eq!(store.get_enum::<Transport>("lower"), None);

    let delims = Delimiters::default().with_literal_record(";");
    assert_eq!(
        store.get_enum_list_with::<Transport>("list", vec![], &delims),
        vec![Transport::Tcp, Transport::Udp]
    );
}
