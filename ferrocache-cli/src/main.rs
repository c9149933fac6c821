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

//! Thin demonstrator binary for `ferrocache`. Holds no cache logic of its
//! own: it only sequences `get:`/`set:` tokens from a script (or stdin) into
//! the library and prints one line per operation.

use std::io::Read;
use std::path::PathBuf;
use std::{fs, io};

use clap::{Parser, Subcommand};
use ferrocache::{Cache, CacheBuilder, RawCache, S3FifoCache, SieveCache};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "ferrocache")]
#[command(author, version, about = "Demonstrator CLI for the ferrocache eviction engines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    policy: Policy,
}

#[derive(Subcommand)]
enum Policy {
    /// Drive a SIEVE-policy cache.
    Sieve {
        /// Fixed cache capacity; must be at least 1.
        #[arg(long)]
        capacity: usize,
        /// Read operations from this file instead of stdin.
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Drive an S3-FIFO-policy cache.
    S3fifo {
        #[arg(long)]
        capacity: usize,
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read script: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Cache(#[from] ferrocache::CacheError),
    #[error("unrecognized token {0:?}: expected `get:<key>` or `set:<key>=<value>`")]
    BadToken(String),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.policy {
        Policy::Sieve { capacity, script } => {
            let input = read_input(script)?;
            let cache: SieveCache<String, String> = CacheBuilder::new(capacity).build()?;
            tracing::debug!(capacity, policy = "sieve", "cache constructed");
            run(&cache, &input)
        }
        Policy::S3fifo { capacity, script } => {
            let input = read_input(script)?;
            let cache: S3FifoCache<String, String> = CacheBuilder::new(capacity).build()?;
            tracing::debug!(capacity, policy = "s3fifo", "cache constructed");
            run(&cache, &input)
        }
    }
}

fn read_input(script: Option<PathBuf>) -> Result<String, CliError> {
    match script {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Sequence whitespace-separated `get:<key>` / `set:<key>=<value>` tokens
/// into `cache`, printing `HIT <key> <value>` / `MISS <key>` / `OK <key>`.
fn run<D>(cache: &Cache<String, String, D>, input: &str) -> Result<(), CliError>
where
    D: RawCache<String, String>,
{
    for token in input.split_whitespace() {
        if let Some(key) = token.strip_prefix("get:") {
            match cache.get(key) {
                Some(value) => println!("HIT {key} {value}"),
                None => println!("MISS {key}"),
            }
        } else if let Some(rest) = token.strip_prefix("set:") {
            let (key, value) =
                rest.split_once('=').ok_or_else(|| CliError::BadToken(token.to_string()))?;
            cache.set(key.to_string(), value.to_string())?;
            println!("OK {key}");
        } else {
            return Err(CliError::BadToken(token.to_string()));
        }
    }
    Ok(())
}
