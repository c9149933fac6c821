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

//! Assertions gated behind the `strict_assertions` feature.
//!
//! `debug_assert!` already drops out of release builds; these macros go one
//! step further and drop out of *debug* builds too unless the feature is on,
//! for invariant checks (index/queue size parity, no key in both the index
//! and the ghost queue) that are too expensive to pay on every `set`/`get`
//! even in a debug build's test suite.

/// Like `assert!`, but only compiled in when the `strict_assertions` feature
/// is enabled.
#[macro_export]
macro_rules! strict_assert {
    ($($arg:tt)*) => {
        if cfg!(feature = "strict_assertions") {
            assert!($($arg)*);
        }
    };
}

/// Like `assert_eq!`, but only compiled in when the `strict_assertions`
/// feature is enabled.
#[macro_export]
macro_rules! strict_assert_eq {
    ($($arg:tt)*) => {
        if cfg!(feature = "strict_assertions") {
            assert_eq!($($arg)*);
        }
    };
}
