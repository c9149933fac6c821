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

//! The key/value payload shared by every eviction engine's node type.

use std::mem;

/// The key, value, and precomputed hash carried by every resident entry.
///
/// Engines embed a `BaseHandle` alongside whatever intrusive-list and
/// policy-metadata fields their own node type needs (a visited bit for
/// SIEVE, a frequency counter for S3-FIFO).
///
/// A `BaseHandle` is always constructed via [`BaseHandle::new`] followed
/// immediately by [`BaseHandle::init`]; the two-step dance exists only so the
/// node can be boxed before its contents are known, matching the allocate-then-
/// initialize order the intrusive list and the indexer both want.
pub(crate) struct BaseHandle<K, V> {
    hash: u64,
    data: Option<(K, V)>,
}

impl<K, V> BaseHandle<K, V> {
    pub(crate) const fn new() -> Self {
        Self { hash: 0, data: None }
    }

    pub(crate) fn init(&mut self, hash: u64, key: K, value: V) {
        self.hash = hash;
        self.data = Some((key, value));
    }

    pub(crate) fn hash(&self) -> u64 {
        self.hash
    }

    pub(crate) fn key(&self) -> &K {
        debug_assert!(self.data.is_some(), "handle read before init");
        // SAFETY: every handle is init'd before it is linked into a list or
        // the indexer, and init is never undone short of `take`.
        unsafe { &self.data.as_ref().unwrap_unchecked().0 }
    }

    pub(crate) fn value(&self) -> &V {
        debug_assert!(self.data.is_some(), "handle read before init");
        unsafe { &self.data.as_ref().unwrap_unchecked().1 }
    }

    /// Overwrite the value in place, returning the previous one.
    pub(crate) fn set_value(&mut self, value: V) -> V {
        debug_assert!(self.data.is_some(), "handle written before init");
        let (_, slot) = unsafe { self.data.as_mut().unwrap_unchecked() };
        mem::replace(slot, value)
    }

    /// Consume the handle, recovering the owned key/value pair.
    pub(crate) fn take(self) -> (K, V) {
        debug_assert!(self.data.is_some(), "handle taken before init");
        unsafe { self.data.unwrap_unchecked() }
    }
}
