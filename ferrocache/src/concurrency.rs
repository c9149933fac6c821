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

//! The concurrency discipline selected at type-construction time:
//! [`Serial`] for caller-synchronized single-threaded use, [`Shared`] for an
//! embedded reader/writer lock. Both implement [`RawCache`] so
//! [`crate::Cache`] call sites are generic over the choice.
//!
//! [`ferrocache_memory::Engine::get`]/`contains` already take `&self` (the
//! policy metadata they touch is interior-mutable), so `Serial` needs only a
//! `RefCell` to present the same `&self` surface `Shared`'s `RwLock` does —
//! there is no separate read/write split to thread through at this layer.

use std::borrow::Borrow;
use std::cell::RefCell;
use std::hash::Hash;

use ferrocache_common::{Key, Result, Value};
use ferrocache_memory::Engine;
use parking_lot::RwLock;

use crate::metrics::MetricsSnapshot;

/// Implemented by the two concurrency disciplines over a fixed [`Engine`].
///
/// Every method takes `&self`: `Serial` and `Shared` each supply their own
/// interior mutability (a `RefCell` or an `RwLock`) so [`crate::Cache`] does
/// not need a `&mut` binding to mutate the cache.
pub trait RawCache<K, V>: Sized
where
    K: Key,
    V: Value,
{
    fn new_with_capacity(capacity: usize) -> Result<Self>;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone;

    fn set(&self, key: K, value: V) -> Result<bool>;

    fn fetch_remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn purge(&self);

    fn metrics(&self) -> MetricsSnapshot;
}

/// No synchronization: the caller guarantees single-threaded access or
/// external mutual exclusion. Not `Sync` (the `RefCell` forbids it), so the
/// type system itself rejects sharing one `Serial`-backed cache across
/// threads without a lock the caller supplies.
pub struct Serial<E> {
    engine: RefCell<E>,
}

impl<K, V, E> RawCache<K, V> for Serial<E>
where
    K: Key,
    V: Value,
    E: Engine<Key = K, Value = V>,
{
    fn new_with_capacity(capacity: usize) -> Result<Self> {
        let engine = E::with_capacity(capacity)?;
        tracing::debug!(discipline = "serial", "cache wrapper constructed");
        Ok(Self { engine: RefCell::new(engine) })
    }

    fn len(&self) -> usize {
        self.engine.borrow().len()
    }

    fn capacity(&self) -> usize {
        self.engine.borrow().capacity()
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.borrow().contains(key)
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.engine.borrow().get(key)
    }

    fn set(&self, key: K, value: V) -> Result<bool> {
        self.engine.borrow_mut().set(key, value)
    }

    fn fetch_remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.borrow_mut().fetch_remove(key)
    }

    fn purge(&self) {
        self.engine.borrow_mut().purge()
    }

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::from(self.engine.borrow().metrics())
    }
}

/// An embedded reader/writer lock (`parking_lot::RwLock`), coarse-grained
/// over the whole engine: `get`/`contains`/`len` take the lock in shared
/// mode, `set`/`fetch_remove`/`purge` in exclusive mode, released on every
/// exit path (including panics, via the guard's `Drop`).
pub struct Shared<E> {
    engine: RwLock<E>,
}

impl<K, V, E> RawCache<K, V> for Shared<E>
where
    K: Key,
    V: Value,
    E: Engine<Key = K, Value = V>,
{
    fn new_with_capacity(capacity: usize) -> Result<Self> {
        let engine = E::with_capacity(capacity)?;
        tracing::debug!(discipline = "shared", "cache wrapper constructed");
        Ok(Self { engine: RwLock::new(engine) })
    }

    fn len(&self) -> usize {
        self.engine.read().len()
    }

    fn capacity(&self) -> usize {
        self.engine.read().capacity()
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.read().contains(key)
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.engine.read().get(key)
    }

    fn set(&self, key: K, value: V) -> Result<bool> {
        self.engine.write().set(key, value)
    }

    fn fetch_remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.engine.write().fetch_remove(key)
    }

    fn purge(&self) {
        self.engine.write().purge()
    }

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::from(self.engine.read().metrics())
    }
}
