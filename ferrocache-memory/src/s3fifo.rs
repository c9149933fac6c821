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

//! The S3-FIFO eviction engine: a `small` admission queue, a `main` long-term
//! queue, and a `ghost` queue of bare keys recently evicted from `small`,
//! plus a saturating per-entry frequency counter.
//!
//! Two behaviors worth calling out explicitly:
//! - overwriting a resident key unlinks and frees the old entry and installs
//!   a fresh one in `main`, rather than leaking the old node;
//! - a key whose hash is present in `ghost` is admitted straight into `main`
//!   instead of `small`, per the published S3-FIFO admission rule.

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::hash::{BuildHasher, Hash};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU8, Ordering};

use ahash::RandomState;
use ferrocache_common::{strict_assert, strict_assert_eq, CacheError, Key, Metrics, Result, Value};
use ferrocache_intrusive::{DList, Link, Linked};

use crate::engine::Engine;
use crate::handle::BaseHandle;
use crate::indexer::{Indexer, Keyed};

/// Saturating cap on the per-entry frequency counter.
const MAX_FREQ: u8 = 3;

struct S3FifoHandle<K, V> {
    base: BaseHandle<K, V>,
    link: Link<S3FifoHandle<K, V>>,
    freq: AtomicU8,
    /// Which queue currently owns this node. Mutated only on paths that
    /// already hold `&mut self`, so a plain `bool` (not atomic) is enough.
    in_main: bool,
}

impl<K, V> S3FifoHandle<K, V> {
    fn new() -> Self {
        Self { base: BaseHandle::new(), link: Link::new(), freq: AtomicU8::new(0), in_main: false }
    }
}

unsafe impl<K, V> Linked for S3FifoHandle<K, V> {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl<K, V> Keyed for S3FifoHandle<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        self.base.key()
    }
}

/// S3-FIFO: three FIFO queues plus a per-entry saturating frequency counter.
pub struct S3FifoEngine<K, V, S = RandomState> {
    indexer: Indexer<S3FifoHandle<K, V>, S>,
    small: DList<S3FifoHandle<K, V>>,
    main: DList<S3FifoHandle<K, V>>,
    ghost: VecDeque<(u64, K)>,
    small_cap: usize,
    main_cap: usize,
    capacity: usize,
    metrics: Metrics,
}

// SAFETY: see `SieveEngine`'s identical impl; same single-owner `Box` shape.
unsafe impl<K: Key, V: Value, S: Send> Send for S3FifoEngine<K, V, S> {}
unsafe impl<K: Key, V: Value, S: Sync> Sync for S3FifoEngine<K, V, S> {}

impl<K: Key, V: Value, S: BuildHasher> S3FifoEngine<K, V, S> {
    fn ghost_position(&self, hash: u64, key: &K) -> Option<usize> {
        self.ghost.iter().position(|(h, k)| *h == hash && k == key)
    }

    /// `|small| + |main| >= capacity` triggers exactly one eviction; the
    /// trigger is re-checked by the caller (`set`) only once, since evicting
    /// one entry always restores headroom for one pending insertion.
    fn evict_if_needed(&mut self) {
        if self.small.len() + self.main.len() < self.capacity {
            return;
        }
        if self.main.len() >= self.main_cap || self.small.is_empty() {
            self.evict_from_main();
        } else {
            self.evict_from_small();
        }
    }

    /// Pop from `main`'s head; reinsert with decremented frequency until a
    /// zero-frequency node is found, which is evicted. Bounded: each pass
    /// strictly decreases that node's frequency, and frequency is bounded by
    /// `MAX_FREQ`, so the loop cannot cycle forever on any fixed-size list.
    fn evict_from_main(&mut self) {
        while let Some(ptr) = self.main.pop_front() {
            let freq = unsafe { ptr.as_ref().freq.load(Ordering::SeqCst) };
            if freq > 0 {
                unsafe { ptr.as_ref().freq.store(freq - 1, Ordering::SeqCst) };
                unsafe { self.main.push_back(ptr) };
                continue;
            }
            let hash = unsafe { ptr.as_ref().base.hash() };
            let key = unsafe { ptr.as_ref().base.key() as *const K };
            let removed = self.indexer.remove(hash, unsafe { &*key });
            debug_assert!(removed == Some(ptr));
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
            self.metrics.record_eviction();
            tracing::trace!(?hash, "s3fifo: evicted entry from main");
            strict_assert_eq!(self.indexer.len(), self.small.len() + self.main.len());
            return;
        }
    }

    /// Pop from `small`'s head; promote to `main` if it earned a second
    /// look (`freq > 1`), otherwise ghost the key and free the entry.
    fn evict_from_small(&mut self) {
        let Some(ptr) = self.small.pop_front() else { return };
        let freq = unsafe { ptr.as_ref().freq.load(Ordering::SeqCst) };
        if freq > 1 {
            unsafe { (*ptr.as_ptr()).in_main = true };
            unsafe { self.main.push_back(ptr) };
            return;
        }

        let hash = unsafe { ptr.as_ref().base.hash() };
        let key = unsafe { ptr.as_ref().base.key() as *const K };
        let removed = self.indexer.remove(hash, unsafe { &*key });
        debug_assert!(removed == Some(ptr));
        let (key, _value) = unsafe { Box::from_raw(ptr.as_ptr()) }.base.take();
        if self.main_cap > 0 {
            if self.ghost.len() >= self.main_cap {
                self.ghost.pop_front();
            }
            self.ghost.push_back((hash, key));
        }
        self.metrics.record_eviction();
        tracing::trace!(?hash, "s3fifo: ghosted entry from small");
        strict_assert!(self.ghost.len() <= self.main_cap);
        strict_assert_eq!(self.indexer.len(), self.small.len() + self.main.len());
    }
}

impl<K: Key, V: Value, S: BuildHasher + Default> Engine for S3FifoEngine<K, V, S> {
    type Key = K;
    type Value = V;

    fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::BadCapacity);
        }
        let small_cap = capacity / 10;
        let main_cap = capacity - small_cap;
        let indexer = Indexer::try_with_capacity_and_hasher(capacity, S::default())?;
        tracing::debug!(capacity, small_cap, main_cap, "s3fifo: cache constructed");
        Ok(Self {
            indexer,
            small: DList::new(),
            main: DList::new(),
            ghost: VecDeque::with_capacity(main_cap),
            small_cap,
            main_cap,
            capacity,
            metrics: Metrics::default(),
        })
    }

    fn len(&self) -> usize {
        self.small.len() + self.main.len()
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
                let handle = unsafe { ptr.as_ref() };
                let _ = handle.freq.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| {
                    if f >= MAX_FREQ {
                        None
                    } else {
                        Some(f + 1)
                    }
                });
                self.metrics.record_hit();
                Some(handle.base.value().clone())
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    fn set(&mut self, key: K, value: V) -> Result<bool> {
        self.evict_if_needed();

        let hash = self.indexer.hash_of(&key);
        let existed = self.indexer.get(hash, &key).is_some();
        let route_main = if existed {
            true
        } else if let Some(pos) = self.ghost_position(hash, &key) {
            self.ghost.remove(pos);
            true
        } else {
            false
        };

        let mut node = Box::new(S3FifoHandle::new());
        node.base.init(hash, key, value);
        node.in_main = route_main;
        let ptr = unsafe { NonNull::new_unchecked(Box::into_raw(node)) };

        if let Some(old) = unsafe { self.indexer.insert(hash, ptr) } {
            if unsafe { old.as_ref().in_main } {
                unsafe { self.main.unlink(old) };
            } else {
                unsafe { self.small.unlink(old) };
            }
            drop(unsafe { Box::from_raw(old.as_ptr()) });
        }

        if route_main {
            unsafe { self.main.push_back(ptr) };
        } else {
            unsafe { self.small.push_back(ptr) };
        }

        if existed {
            self.metrics.record_replace();
        } else {
            self.metrics.record_insert();
        }
        strict_assert_eq!(self.indexer.len(), self.small.len() + self.main.len());
        Ok(!existed)
    }

    fn fetch_remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.indexer.hash_of(key);
        let ptr = self.indexer.remove(hash, key)?;
        if unsafe { ptr.as_ref().in_main } {
            unsafe { self.main.unlink(ptr) };
        } else {
            unsafe { self.small.unlink(ptr) };
        }
        let node = unsafe { Box::from_raw(ptr.as_ptr()) };
        self.metrics.record_remove();
        strict_assert_eq!(self.indexer.len(), self.small.len() + self.main.len());
        Some(node.base.take())
    }

    fn purge(&mut self) {
        for ptr in self.small.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
        for ptr in self.main.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
        self.ghost.clear();
        self.indexer.clear();
        tracing::debug!("s3fifo: purged");
    }

    fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl<K: Key, V: Value, S> Drop for S3FifoEngine<K, V, S> {
    fn drop(&mut self) {
        for ptr in self.small.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
        for ptr in self.main.drain() {
            drop(unsafe { Box::from_raw(ptr.as_ptr()) });
        }
    }
}
