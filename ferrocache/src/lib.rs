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

//! `ferrocache`: a fixed-capacity, generic, in-memory cache offering two
//! modern eviction policies — [`SieveCache`] (a simplified clock-like
//! policy) and [`S3FifoCache`] (three-FIFO-queue with ghost-entry admission)
//! — each available with or without an internal reader/writer lock.
//!
//! ```
//! use ferrocache::SieveCache;
//!
//! let cache: SieveCache<&str, &str> = SieveCache::new(4).unwrap();
//! cache.set("foo", "bar").unwrap();
//! assert_eq!(cache.get("foo"), Some("bar"));
//! ```
//!
//! No TTL-based expiry, no resize-after-construction, no persistence, and no
//! eviction-callback delivery.

mod builder;
mod cache;
mod concurrency;
mod metrics;

pub use builder::CacheBuilder;
pub use cache::{Cache, S3FifoCache, S3FifoCacheShared, SieveCache, SieveCacheShared};
pub use concurrency::{RawCache, Serial, Shared};
pub use ferrocache_common::{CacheError, Result};
pub use metrics::MetricsSnapshot;
