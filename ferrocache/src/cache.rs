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

//! The public, policy-agnostic cache handle and the four concrete type
//! aliases callers actually name.

use std::borrow::Borrow;
use std::hash::Hash;
use std::marker::PhantomData;

use ferrocache_common::{CacheError, Key, Result, Value};
use ferrocache_memory::{S3FifoEngine, SieveEngine};

use crate::concurrency::{RawCache, Serial, Shared};
use crate::metrics::MetricsSnapshot;

/// A fixed-capacity, generic key-value cache over one of two eviction
/// policies (`E`, selected via the `Sieve`/`S3Fifo` type aliases below) and
/// one of two concurrency disciplines (`D`, [`Serial`] or [`Shared`]).
///
/// Construct it through [`CacheBuilder`] or the inherent [`Cache::new`].
pub struct Cache<K, V, D> {
    discipline: D,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, D> Cache<K, V, D>
where
    K: Key,
    V: Value,
    D: RawCache<K, V>,
{
    /// Construct a cache of the given capacity. Fails with
    /// [`CacheError::BadCapacity`] if `capacity == 0`, or
    /// [`CacheError::OutOfMemory`] if the hash index cannot be preallocated.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::BadCapacity);
        }
        Ok(Self { discipline: D::new_with_capacity(capacity)?, _marker: PhantomData })
    }

    pub fn len(&self) -> usize {
        self.discipline.len()
    }

    pub fn capacity(&self) -> usize {
        self.discipline.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.discipline.is_empty()
    }

    /// `O(1)`; does not change policy state (no visited-bit flip, no
    /// frequency bump).
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.discipline.contains(key)
    }

    /// `O(1)`. On a hit, bumps the policy's recency/frequency metadata and
    /// returns a clone of the stored value; on a miss, returns `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.discipline.get(key)
    }

    /// Insert or replace. Returns `Ok(true)` iff `key` was absent before the
    /// call. Runs eviction first if the cache is at capacity.
    pub fn set(&self, key: K, value: V) -> Result<bool> {
        self.discipline.set(key, value)
    }

    /// Detach and return the entry for `key`, if present. `O(1)`.
    pub fn fetch_remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.discipline.fetch_remove(key)
    }

    /// Delete every entry, leaving the cache empty but still usable at the
    /// same capacity.
    pub fn purge(&self) {
        self.discipline.purge()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.discipline.metrics()
    }
}

/// SIEVE policy, caller-synchronized (or single-threaded) access.
pub type SieveCache<K, V, S = ahash::RandomState> = Cache<K, V, Serial<SieveEngine<K, V, S>>>;
/// SIEVE policy, behind an internal reader/writer lock.
pub type SieveCacheShared<K, V, S = ahash::RandomState> = Cache<K, V, Shared<SieveEngine<K, V, S>>>;
/// S3-FIFO policy, caller-synchronized (or single-threaded) access.
pub type S3FifoCache<K, V, S = ahash::RandomState> = Cache<K, V, Serial<S3FifoEngine<K, V, S>>>;
/// S3-FIFO policy, behind an internal reader/writer lock.
pub type S3FifoCacheShared<K, V, S = ahash::RandomState> = Cache<K, V, Shared<S3FifoEngine<K, V, S>>>;
