//! Concurrency: get-or-create must collapse concurrent identical misses
//! onto a single producer run and never corrupt the map.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use serde_json::json;

use common::{demo_descriptor, demo_interface, demo_registry, demo_resolver, invoke};
use entwine::domain::models::invocation::CachePolicy;
use entwine::{CacheStore, ChainBuilder, MemoryCacheStore};

const WORKERS: usize = 8;

#[test]
fn test_store_single_flight() {
    let store = Arc::new(MemoryCacheStore::new());
    let produced = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let store = store.clone();
            let produced = produced.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                store
                    .get_or_create("shared", Duration::from_secs(60), &mut || {
                        produced.fetch_add(1, Ordering::SeqCst);
                        // Make the race window wide enough to matter.
                        std::thread::sleep(Duration::from_millis(50));
                        Ok(json!("expensive"))
                    })
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), json!("expensive"));
    }
    assert_eq!(produced.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_distinct_keys_do_not_block_each_other() {
    let store = Arc::new(MemoryCacheStore::new());
    let produced = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let store = store.clone();
            let produced = produced.clone();
            std::thread::spawn(move || {
                let key = format!("key-{worker}");
                store
                    .get_or_create(&key, Duration::from_secs(60), &mut || {
                        produced.fetch_add(1, Ordering::SeqCst);
                        Ok(json!(worker))
                    })
                    .unwrap()
            })
        })
        .collect();

    for (worker, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), json!(worker));
    }
    assert_eq!(produced.load(Ordering::SeqCst), WORKERS);
}

#[test]
fn test_concurrent_calls_through_shared_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let interface = demo_interface(Some(CachePolicy::with_key("someKey")));
    let registry = demo_registry(interface.clone(), calls.clone());
    let builder = ChainBuilder::new(Arc::new(registry), Arc::new(demo_resolver(None)));
    let chain = builder
        .build(&demo_descriptor(&["Caching", "Logging"]))
        .unwrap();

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let chain = chain.clone();
            let interface = interface.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                chain
                    .call(&invoke(
                        &interface,
                        "run",
                        vec![json!(2), json!([worker])],
                    ))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        // Every caller sees the one memoized result under the explicit key.
        assert_eq!(handle.join().unwrap(), json!(30));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
