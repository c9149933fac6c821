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

//! The two eviction engines: [`sieve`] and [`s3fifo`].
//!
//! Both engines implement the same [`Engine`] contract over the same
//! `BaseHandle`/`Indexer`/`DList` primitives, but diverge in queue topology
//! and in what "replace an existing key" means. See [`engine`] for why they
//! are not forced through a single low-level eviction trait.

mod engine;
mod handle;
mod indexer;
pub mod s3fifo;
pub mod sieve;

pub use engine::Engine;
pub use s3fifo::S3FifoEngine;
pub use sieve::SieveEngine;
