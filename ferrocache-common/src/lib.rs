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

//! Shared code-level building blocks for `ferrocache`: the `Key`/`Value` marker
//! traits, the error taxonomy, the metrics record, and the
//! `strict_assert!`/`strict_assert_eq!` macros.

pub mod assert;
pub mod code;
pub mod error;
pub mod metrics;

pub use code::{Key, Value};
pub use error::{CacheError, Result};
pub use metrics::Metrics;
