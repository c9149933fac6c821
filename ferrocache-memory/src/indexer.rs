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

//! A hash index from key to node pointer, built directly on
//! [`hashbrown::HashTable`] rather than wrapping a `HashMap`: the table stores
//! only `NonNull<H>`, not a second copy of the key, since the key already
//! lives in the node behind the pointer.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::ptr::NonNull;

use ferrocache_common::{CacheError, Result};
use hashbrown::HashTable;

/// Implemented by node types that can report the key they were indexed under.
pub(crate) trait Keyed {
    type Key;

    fn key(&self) -> &Self::Key;
}

pub(crate) struct Indexer<H: Keyed, S> {
    table: HashTable<NonNull<H>>,
    hash_builder: S,
}

impl<H: Keyed, S: BuildHasher> Indexer<H, S>
where
    H::Key: Hash + Eq,
{
    pub(crate) fn try_with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self> {
        let table = HashTable::try_with_capacity(capacity)
            .map_err(|err| CacheError::OutOfMemory { reason: format!("{err:?}") })?;
        Ok(Self { table, hash_builder })
    }

    pub(crate) fn hash_of<Q>(&self, key: &Q) -> u64
    where
        H::Key: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn get<Q>(&self, hash: u64, key: &Q) -> Option<NonNull<H>>
    where
        H::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table
            .find(hash, |candidate| unsafe { candidate.as_ref().key().borrow() == key })
            .copied()
    }

    /// Index `ptr` under `hash`, replacing and returning whatever handle was
    /// previously indexed under the same key, if any. The caller owns the
    /// returned handle and is responsible for freeing it.
    ///
    /// # Safety
    ///
    /// `ptr` must point at a live, fully initialized node not already present
    /// in this index.
    pub(crate) unsafe fn insert(&mut self, hash: u64, ptr: NonNull<H>) -> Option<NonNull<H>> {
        let key = unsafe { ptr.as_ref().key() };
        let eq = |candidate: &NonNull<H>| unsafe { candidate.as_ref().key() == key };
        match self.table.find_entry(hash, eq) {
            Ok(occupied) => {
                let (old, vacant) = occupied.remove();
                vacant.insert(ptr);
                Some(old)
            }
            Err(_absent) => {
                let hash_builder = &self.hash_builder;
                self.table.insert_unique(hash, ptr, |candidate| unsafe {
                    hash_builder.hash_one(candidate.as_ref().key())
                });
                None
            }
        }
    }

    /// Remove whatever handle is indexed under `key`, if any. The caller owns
    /// the returned handle and is responsible for freeing it.
    pub(crate) fn remove<Q>(&mut self, hash: u64, key: &Q) -> Option<NonNull<H>>
    where
        H::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let eq = |candidate: &NonNull<H>| unsafe { candidate.as_ref().key().borrow() == key };
        match self.table.find_entry(hash, eq) {
            Ok(occupied) => Some(occupied.remove().0),
            Err(_absent) => None,
        }
    }

    /// Drop every entry from the index. Does not free the nodes themselves;
    /// callers drain the owning list(s) for that.
    pub(crate) fn clear(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::ptr::NonNull;

    use ahash::RandomState;

    use super::*;

    struct Entry {
        key: &'static str,
        value: u32,
    }

    impl Keyed for Entry {
        type Key = &'static str;

        fn key(&self) -> &&'static str {
            &self.key
        }
    }

    unsafe fn alloc(key: &'static str, value: u32) -> NonNull<Entry> {
        unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Entry { key, value }))) }
    }

    unsafe fn free(ptr: NonNull<Entry>) -> u32 {
        unsafe { Box::from_raw(ptr.as_ptr()) }.value
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut indexer: Indexer<Entry, RandomState> =
            Indexer::try_with_capacity_and_hasher(4, RandomState::new()).unwrap();

        unsafe {
            let a = alloc("a", 1);
            let hash = indexer.hash_of("a");
            assert!(indexer.insert(hash, a).is_none());
            assert_eq!(indexer.len(), 1);

            let found = indexer.get(hash, "a").unwrap();
            assert_eq!(found.as_ref().value, 1);

            let removed = indexer.remove(hash, "a").unwrap();
            assert_eq!(free(removed), 1);
            assert_eq!(indexer.len(), 0);
            assert!(indexer.get(hash, "a").is_none());
        }
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut indexer: Indexer<Entry, RandomState> =
            Indexer::try_with_capacity_and_hasher(4, RandomState::new()).unwrap();

        unsafe {
            let a1 = alloc("a", 1);
            let hash = indexer.hash_of("a");
            indexer.insert(hash, a1);

            let a2 = alloc("a", 2);
            let old = indexer.insert(hash, a2).unwrap();
            assert_eq!(free(old), 1);
            assert_eq!(indexer.len(), 1);
            assert_eq!(indexer.get(hash, "a").unwrap().as_ref().value, 2);

            free(indexer.remove(hash, "a").unwrap());
        }
    }
}
