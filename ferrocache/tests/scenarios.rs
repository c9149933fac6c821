//  Copyright 2024 Foyer Project Authors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! End-to-end scenarios exercising both policies through the public
//! [`ferrocache::Cache`] surface, across both concurrency disciplines.

use ferrocache::{CacheError, S3FifoCache, S3FifoCacheShared, SieveCache, SieveCacheShared};

#[test]
fn sieve_basic_four_slot_scenario() {
    let cache: SieveCache<&str, &str> = SieveCache::new(4).unwrap();
    assert!(cache.set("foo", "bar").unwrap());
    assert!(cache.set("zig", "zag").unwrap());
    assert_eq!(cache.len(), 2);
    assert!(cache.set("flip", "flop").unwrap());
    assert!(cache.set("tick", "tock").unwrap());
    assert_eq!(cache.capacity(), 4);

    assert_eq!(cache.fetch_remove("foo"), Some(("foo", "bar")));
    assert_eq!(cache.get("foo"), None);
    assert_eq!(cache.get("zig"), Some("zag"));
    assert_eq!(cache.get("flip"), Some("flop"));
    assert_eq!(cache.get("tick"), Some("tock"));
}

#[test]
fn s3fifo_string_keys_shared_variant() {
    let cache: S3FifoCacheShared<String, String> = S3FifoCacheShared::new(2).unwrap();
    cache.set("apple".into(), "red".into()).unwrap();
    cache.set("banana".into(), "yellow".into()).unwrap();
    assert_eq!(cache.get("apple"), Some("red".to_string()));
    assert_eq!(cache.get("banana"), Some("yellow".to_string()));
}

#[test_log::test]
fn eviction_under_pressure_capacity_two_sieve() {
    let cache: SieveCache<u32, u32> = SieveCache::new(2).unwrap();
    cache.set(1, 1).unwrap();
    cache.set(2, 2).unwrap();
    cache.set(3, 3).unwrap();
    assert_eq!(cache.len(), 2);
    let present = [cache.contains(&1), cache.contains(&2), cache.contains(&3)];
    assert_eq!(present.iter().filter(|p| **p).count(), 2);
    // No intervening reads: SIEVE evicts the oldest (tail) entry.
    assert!(!cache.contains(&1));
}

#[test_log::test]
fn eviction_under_pressure_capacity_two_s3fifo() {
    let cache: S3FifoCache<u32, u32> = S3FifoCache::new(2).unwrap();
    cache.set(1, 1).unwrap();
    cache.set(2, 2).unwrap();
    cache.set(3, 3).unwrap();
    assert_eq!(cache.len(), 2);
    let present = [cache.contains(&1), cache.contains(&2), cache.contains(&3)];
    assert_eq!(present.iter().filter(|p| **p).count(), 2);
}

#[test]
fn idempotent_purge_then_reuse() {
    let cache: SieveCache<u32, u32> = SieveCache::new(4).unwrap();
    for k in 0..4u32 {
        cache.set(k, k).unwrap();
    }
    cache.purge();
    assert_eq!(cache.len(), 0);
    for k in 0..4u32 {
        assert!(cache.get(&k).is_none());
    }
    assert!(cache.set(9, 9).unwrap());
    assert_eq!(cache.len(), 1);
}

#[test]
fn bad_capacity_is_rejected() {
    let err = SieveCache::<u32, u32>::new(0).unwrap_err();
    assert!(matches!(err, CacheError::BadCapacity));
    let err = S3FifoCache::<u32, u32>::new(0).unwrap_err();
    assert!(matches!(err, CacheError::BadCapacity));
}

#[test]
fn round_trip_laws_hold_for_both_policies() {
    fn check<D: ferrocache::RawCache<u32, u32>>(cache: ferrocache::Cache<u32, u32, D>) {
        assert!(cache.set(1, 10).unwrap());
        assert_eq!(cache.get(&1), Some(10));
        assert!(!cache.set(1, 20).unwrap());
        assert_eq!(cache.get(&1), Some(20));
        assert_eq!(cache.contains(&1), cache.get(&1).is_some());
        assert_eq!(cache.fetch_remove(&1), Some((1, 20)));
        assert_eq!(cache.get(&1), None);
    }
    check(SieveCache::<u32, u32>::new(8).unwrap());
    check(S3FifoCache::<u32, u32>::new(8).unwrap());
}

#[test]
fn no_leak_under_ten_thousand_interleaved_operations() {
    let sieve: SieveCacheShared<u64, u64> = SieveCacheShared::new(32).unwrap();
    for i in 0..10_000u64 {
        sieve.set(i % 128, i).unwrap();
        if i % 3 == 0 {
            sieve.get(&(i % 128));
        }
        if i % 11 == 0 {
            sieve.fetch_remove(&(i % 128));
        }
    }
    assert!(sieve.len() <= sieve.capacity());
    drop(sieve);

    let s3fifo: S3FifoCache<u64, u64> = S3FifoCache::new(32).unwrap();
    for i in 0..10_000u64 {
        s3fifo.set(i % 128, i).unwrap();
        if i % 3 == 0 {
            s3fifo.get(&(i % 128));
        }
        if i % 11 == 0 {
            s3fifo.fetch_remove(&(i % 128));
        }
    }
    assert!(s3fifo.len() <= s3fifo.capacity());
}
