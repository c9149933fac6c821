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

use std::fmt::Debug;
use std::hash::Hash;

/// Trait bound alias for cache keys.
///
/// Any `Hash + Eq` type that can cross thread boundaries qualifies. Byte-sequence
/// keys (`Vec<u8>`, `String`, ...) and structural keys (`u64`, tuples, ...) are not
/// distinguished at the trait level: both hash through `std::hash::Hash`, and the
/// cache's configured `BuildHasher` is what actually decides the hashing strategy.
pub trait Key: Hash + Eq + Debug + Send + Sync + 'static {}
impl<T: Hash + Eq + Debug + Send + Sync + 'static> Key for T {}

/// Trait bound alias for cache values.
pub trait Value: Debug + Send + Sync + 'static {}
impl<T: Debug + Send + Sync + 'static> Value for T {}
