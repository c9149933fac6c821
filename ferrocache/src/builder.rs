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

//! A small builder over [`Cache::new`](crate::Cache::new): construction
//! options are gathered and validated once, at `build()`, rather than
//! panicking deep inside the policy engine.

use std::marker::PhantomData;

use ferrocache_common::{CacheError, Key, Result, Value};

use crate::cache::Cache;
use crate::concurrency::RawCache;

/// Builds a [`Cache`] of a chosen policy/concurrency pair.
///
/// ```
/// use ferrocache::{CacheBuilder, SieveCache};
///
/// let cache: SieveCache<&str, &str> = CacheBuilder::new(16).build().unwrap();
/// assert_eq!(cache.capacity(), 16);
/// ```
pub struct CacheBuilder<K, V, D> {
    capacity: usize,
    _marker: PhantomData<(K, V, D)>,
}

impl<K, V, D> CacheBuilder<K, V, D>
where
    K: Key,
    V: Value,
    D: RawCache<K, V>,
{
    pub fn new(capacity: usize) -> Self {
        Self { capacity, _marker: PhantomData }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validates every recognized construction option and constructs the
    /// cache, or returns [`CacheError::BadCapacity`] /
    /// [`CacheError::OutOfMemory`] without leaving anything half-built.
    pub fn build(self) -> Result<Cache<K, V, D>> {
        if self.capacity == 0 {
            return Err(CacheError::BadCapacity);
        }
        Cache::new(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use ferrocache_memory::SieveEngine;

    use super::*;
    use crate::concurrency::Serial;
    use crate::SieveCache;

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let err: CacheError =
            CacheBuilder::<u32, u32, Serial<SieveEngine<u32, u32>>>::new(0).build().unwrap_err();
        assert!(matches!(err, CacheError::BadCapacity));
    }

    #[test]
    fn test_builder_happy_path() {
        let cache: SieveCache<u32, u32> = CacheBuilder::new(4).build().unwrap();
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_builder_capacity_override() {
        let cache: SieveCache<u32, u32> = CacheBuilder::new(4).capacity(8).build().unwrap();
        assert_eq!(cache.capacity(), 8);
    }
}
