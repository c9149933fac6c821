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

//! The SIEVE eviction engine: one intrusive list, one hash index, a scanning
//! "hand" cursor, and a per-entry visited bit.
//!
//! `get`/`contains` take `&self`: the visited bit is an `AtomicBool` so a
//! reader can flip it without the exclusive access a `&mut` list mutation
//! would need, which is what lets the [`crate::concurrency`]-style wrapper in
//! the `ferrocache` crate take only a shared lock on the hot read path.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::RandomState;
use ferrocache_common::{strict_assert_eq, CacheError, Key, Metrics, Result, Value};
use ferrocache_intrusive::{DList, Link, Linked};

use crate::engine::Engine;
use crate::handle::BaseHandle;
use crate::indexer::{Indexer, Keyed};

struct SieveHandle<K, V> {
    base: BaseHandle<K, V>,
    link: Link<SieveHandle<K, V>>,
    visited: AtomicBool,
}

impl<K, V> SieveHandle<K, V> {
    fn new() -> Self {
        Self { base: BaseHandle::new(), link: Link::new(), visited: AtomicBool::new(false) }
    }
}

unsafe impl<K, V> Linked for SieveHandle<K, V> {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl<K, V> Keyed for SieveHandle<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        self.base.key()
    }
}

/// SIEVE: a single FIFO-ordered list with lazy "second chance" promotion via
/// one clock-like `visited` bit per entry, scanned by one `hand` cursor.
pub struct SieveEngine<K, V, S = RandomState> {
    indexer: Indexer<SieveHandle<K, V>, S>,
    list: DList<SieveHandle<K, V>>,
    hand: Option<NonNull<SieveHandle<K, V>>>,
    capacity: usize,
    metrics: Metrics,
}

// SAFETY: every `NonNull` field points at a `Box`-owned node that only this
// engine ever dereferences.
unsafe impl<K: Key, V: Value, S: Send> Send for SieveEngine<K, V, S> {}
unsafe impl<K: Key, V: Value, S: Sync> Sync for SieveEngine<K, V, S> {}

impl<K: Key, V: Value, S: BuildHasher> SieveEngine<K, V, S> {
    /// Starting from `hand` (or `tail` if unset), clear visited bits until an
    /// unvisited node is found; evict it and park `hand` at its old
    /// predecessor. Terminates because each full lap clears every bit, so
    /// the lap after that evicts the first node it touches.
    fn evict_one(&mut self) {
        let mut cursor = match self.hand {
            Some(ptr) => ptr,
            None => match self.list.tail() {
                Some(ptr) => ptr,
                None => return,
            },
        };

        loop {
            let visited = unsafe { cursor.as_ref().visited.load(Ordering::Relaxed) };
            if visited {
                unsafe { cursor.as_ref().visited.store(false, Ordering::Relaxed) };
                cursor = match unsafe { self.list.prev(cursor) } {
                    Some(prev) => prev,
                    None => self.list.tail().expect("non-empty list has a tail"),
                };
                continue;
            }

            self.hand = unsafe { self.list.prev(cursor) };
            unsafe { self.list.unlink(cursor) };
            let hash = unsafe { cursor.as_ref().base.hash() };
            let key = unsafe { cursor.as_ref().base.key() as *const K };
            // SAFETY: `key` still points into the boxed node we are about to
            // free; the indexer lookup completes before the free below.
            let removed = self.indexer.remove(hash, unsafe { &*key });
            debug_assert!(removed == Some(cursor));
            let node = unsafe { Box::from_raw(cursor.as_ptr()) };
            drop(node);
            self.metrics.record_eviction();
            tracing::trace!(?hash, "sieve: evicted entry");
            strict_assert_eq!(self.indexer.len(), self.list.len());
            return;
        }
    }
}

impl<K: Key, V: Value, S: BuildHasher + Default> Engine for SieveEngine<K, V, S> {
    type Key = K;
    type Value = V;

    fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::BadCapacity);
        }
        let indexer = Indexer::try_with_capacity_and_hasher(capacity, S::default())?;
        tracing::debug!(capacity, "sieve: cache constructed");
        Ok(Self { indexer, list: DList::new(), hand: None, capacity, metrics: Metrics::default() })
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.indexer.hash_of(key);
        self.indexer.get(hash, key).is_some()
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let hash = self.indexer.hash_of(key);
        match self.indexer.get(hash, key) {
            Some(ptr) => {
                unsafe { ptr.as_ref().visited.store(true, Ordering::Relaxed) };
                self.metrics.record_hit();
                Some(unsafe { ptr.as_ref().base.value().clone() })
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    fn set(&mut self, key: K, value: V) -> Result<bool> {
        let hash = self.indexer.hash_of(&key);
        if let Some(ptr) = self.indexer.get(hash, &key) {
            // Overwrite in place: list position is untouched, but the
            // visited bit resets, treating the overwrite as a fresh
            // installation.
            unsafe { (*ptr.as_ptr()).base.set_value(value) };
            unsafe { ptr.as_ref().visited.store(false, Ordering::Relaxed) };
            self.metrics.record_replace();
            return Ok(false);
        }

        if self.list.len() >= self.capacity {
            self.evict_one();
        }

        let mut node = Box::new(SieveHandle::new());
        node.base.init(hash, key, value);
        let ptr = unsafe { NonNull::new_unchecked(Box::into_raw(node)) };
        let displaced = unsafe { self.indexer.insert(hash, ptr) };
        debug_assert!(displaced.is_none());
        unsafe { self.list.push_front(ptr) };
        self.metrics.record_insert();
        strict_assert_eq!(self.indexer.len(), self.list.len());
        Ok(true)
    }

    fn fetch_remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.indexer.hash_of(key);
        let ptr = self.indexer.remove(hash, key)?;
        if self.hand == Some(ptr) {
            self.hand = unsafe { self.list.prev(ptr) };
        }
        unsafe { self.list.unlink(ptr) };
        let node = unsafe { Box::from_raw(ptr.as_ptr()) };
        self.metrics.record_remove();
        strict_assert_eq!(self.indexer.len(), self.list.len());
        Some(node.base.take())
    }

    fn purge(&mut self) {
        for ptr in self.list.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
        self.indexer.clear();
        self.hand = None;
        tracing::debug!("sieve: purged");
    }

    fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl<K: Key, V: Value, S> Drop for SieveEngine<K, V, S> {
    fn drop(&mut self) {
        for ptr in self.list.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestSieve = SieveEngine<&'static str, &'static str>;

    #[test]
    fn test_basic_scenario_capacity_four() {
        let mut cache = TestSieve::with_capacity(4).unwrap();
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
    fn test_never_read_keys_evict_oldest() {
        let mut cache: SieveEngine<u32, u32> = SieveEngine::with_capacity(2).unwrap();
        cache.set(1, 1).unwrap();
        cache.set(2, 2).unwrap();
        cache.set(3, 3).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.get(&3), Some(3));
    }

    #[test]
    fn test_visited_bit_protects_from_immediate_eviction() {
        let mut cache: SieveEngine<u32, u32> = SieveEngine::with_capacity(3).unwrap();
        cache.set(1, 1).unwrap();
        cache.set(2, 2).unwrap();
        cache.set(3, 3).unwrap();
        // Mark every resident entry visited.
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.get(&3), Some(3));

        cache.set(4, 4).unwrap();
        assert_eq!(cache.len(), 3);
        // The first lap clears every visited bit without evicting; the
        // victim is whichever node the scan reaches first on lap two,
        // which is the oldest entry (1), same as the no-read case.
        assert_eq!(cache.get(&1), None);
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn test_overwrite_does_not_move_list_position_but_resets_visited() {
        let mut cache: SieveEngine<u32, u32> = SieveEngine::with_capacity(2).unwrap();
        cache.set(1, 1).unwrap();
        cache.set(2, 2).unwrap();
        assert_eq!(cache.get(&1), Some(1)); // visited(1) = true
        assert!(!cache.set(1, 100).unwrap()); // overwrite resets visited(1)
        assert_eq!(cache.get(&1), Some(100));

        // 1 is visited again from the read above, so inserting a third key
        // evicts 2 (unvisited), not 1.
        cache.set(3, 3).unwrap();
        assert!(cache.contains(&1) || cache.contains(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_purge_then_reuse() {
        let mut cache: SieveEngine<u32, u32> = SieveEngine::with_capacity(2).unwrap();
        cache.set(1, 1).unwrap();
        cache.set(2, 2).unwrap();
        cache.purge();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), None);
        assert!(cache.set(3, 3).unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = TestSieve::with_capacity(0).unwrap_err();
        assert!(matches!(err, CacheError::BadCapacity));
    }

    #[test]
    fn test_no_leak_under_interleaved_ops() {
        let mut cache: SieveEngine<u64, u64> = SieveEngine::with_capacity(16).unwrap();
        for i in 0..10_000u64 {
            cache.set(i % 64, i).unwrap();
            if i % 3 == 0 {
                cache.get(&(i % 64));
            }
            if i % 7 == 0 {
                cache.fetch_remove(&(i % 64));
            }
        }
        assert!(cache.len() <= cache.capacity());
    }

    #[test]
    fn test_fuzz_random_ops_preserve_invariants() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(0xF00D);
        let mut cache: SieveEngine<u16, u64> = SieveEngine::with_capacity(32).unwrap();
        for i in 0..20_000u64 {
            let key: u16 = rng.gen_range(0..200);
            match rng.gen_range(0..4) {
                0 => {
                    cache.set(key, i).unwrap();
                }
                1 => {
                    cache.get(&key);
                }
                2 => {
                    cache.fetch_remove(&key);
                }
                _ => {
                    assert_eq!(cache.contains(&key), cache.get(&key).is_some());
                }
            }
            assert!(cache.len() <= cache.capacity());
        }
    }
}
