use std::sync::Arc;
use std::thread;
use sublink::runtime::MetadataCache;

#[test]
fn test_put_is_insert_or_noop() {
    let cache = MetadataCache::new();

    assert!(cache.put(100, b"first".to_vec()));
    assert!(!cache.put(100, b"second".to_vec()));
    assert!(!cache.put(100, b"third".to_vec()));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(100).as_deref(), Some(&b"first"[..]));
}

#[test]
fn test_lookup_is_by_exact_version() {
    let cache = MetadataCache::new();
    cache.put(9_100, vec![1, 2, 3]);

    assert!(cache.has(9_100));
    assert!(!cache.has(9_101));
    assert!(cache.get(9_099).is_none());
}

#[test]
fn test_versions_are_sorted_and_clear_empties() {
    let cache = MetadataCache::new();
    for version in [30, 10, 20] {
        cache.put(version, vec![version as u8]);
    }

    assert_eq!(cache.versions(), vec![10, 20, 30]);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_puts_store_one_blob_per_version() {
    let cache = Arc::new(MetadataCache::new());

    let handles: Vec<_> = (0..8u8)
        .map(|n| {
            let cache = cache.clone();
            thread::spawn(move || cache.put(7, vec![n]))
        })
        .collect();

    let inserted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|stored| *stored)
        .count();

    assert_eq!(inserted, 1);
    assert_eq!(cache.len(), 1);
}
