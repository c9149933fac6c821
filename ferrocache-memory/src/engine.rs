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

//! The cache contract every eviction engine implements.
//!
//! SIEVE and S3-FIFO diverge enough on what "replace an existing key" means
//! (SIEVE overwrites the resident node in place; S3-FIFO always frees the old
//! node and reinserts fresh into `main`) that forcing them through one
//! generic low-level eviction trait would hide that difference behind a
//! leaky abstraction. Instead both engines implement this single
//! higher-level contract directly, and share only the primitives underneath
//! it (`BaseHandle`, `Indexer`, `DList`, `Metrics`).
//!
//! The split between `&self` and `&mut self` methods is deliberate: it is
//! exactly the read/write boundary the [`crate::concurrency::Shared`]
//! wrapper uses to decide whether an operation takes a read or a write lock.

use std::borrow::Borrow;
use std::hash::Hash;

use ferrocache_common::{Key, Metrics, Result, Value};

pub trait Engine: Sized {
    type Key: Key;
    type Value: Value;

    fn with_capacity(capacity: usize) -> Result<Self>;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Membership test. Must not change policy state (no visited-bit flip,
    /// no frequency bump): it answers "is this key resident", nothing more.
    fn contains<Q>(&self, key: &Q) -> bool
    where
        Self::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn get<Q>(&self, key: &Q) -> Option<Self::Value>
    where
        Self::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        Self::Value: Clone;

    /// Insert or replace. Returns `Ok(true)` for a fresh key, `Ok(false)` for
    /// a replace of an already-resident key.
    fn set(&mut self, key: Self::Key, value: Self::Value) -> Result<bool>;

    fn fetch_remove<Q>(&mut self, key: &Q) -> Option<(Self::Key, Self::Value)>
    where
        Self::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn purge(&mut self);

    fn metrics(&self) -> &Metrics;
}
