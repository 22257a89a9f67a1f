// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Strategy;

/// Represents errors that can occur when configuring a hash table
///
/// A full table is not an error, see [`crate::HashTable::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The strategy probes with a secondary hash, but none was supplied
    MissingSecondaryHash(Strategy),

    /// Unrecognized strategy identifier
    InvalidStrategy(String),

    /// Configuration value out of range
    InvalidConfig(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSecondaryHash(strategy) => {
                write!(f, "HashTableError: {strategy} requires a secondary hash function")
            }
            Self::InvalidStrategy(tag) => write!(f, "HashTableError: unknown strategy {tag:?}"),
            Self::InvalidConfig(reason) => write!(f, "HashTableError: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// Hash table result
pub type Result<T> = std::result::Result<T, Error>;
