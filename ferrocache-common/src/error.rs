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

use thiserror::Error;

/// Errors surfaced across the cache's public API.
///
/// `KeyAbsent` is deliberately not a variant here: absence of a key is modeled
/// with `Option::None` on `get`/`fetch_remove`/`remove`, not as an error.
#[derive(Debug, Error)]
pub enum CacheError {
    /// `create`/`CacheBuilder::build` was asked for a zero capacity.
    #[error("cache capacity must be at least 1")]
    BadCapacity,
    /// Preallocating the hash index failed.
    #[error("failed to allocate cache storage: {reason}")]
    OutOfMemory {
        /// Human-readable detail forwarded from the failed allocation.
        reason: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CacheError>;
