// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A bucketed hash table engine with pluggable collision resolution.
//!
//! ##### About
//!
//! This crate exports a [`HashTable`] whose storage is a fixed-length sequence of
//! bounded-capacity buckets. When a bucket overflows, the configured [`Strategy`]
//! decides where the entry goes:
//!
//! - [`Strategy::Chaining`]: into the bucket's lazily allocated overflow chain
//! - [`Strategy::LinearProbing`]: into the next bucket along `(h1 + i) mod m`
//! - [`Strategy::ChainedLinearProbing`]: along `(h1 + i) mod m`, then into the home bucket's chain
//! - [`Strategy::SeparateOverflow`]: into a bounded, shared overflow area
//! - [`Strategy::DoubleHashing`]: into the next bucket along `(h1 + i * h2) mod m`
//! - [`Strategy::ExtensibleHashing`]: the bucket is split and the directory updated
//!
//! Probing strategies delete by leaving a tombstone so that probe sequences stay
//! replayable; the others splice entries out physically.
//!
//! Tables are either static (a full table rejects inserts) or dynamic (the bucket
//! count doubles once the load factor exceeds a threshold), see [`CapacityPolicy`].
//!
//! Hash functions are supplied by the caller as plain closures `&K -> i64`.
//!
//! ```
//! use bucket_hash::{Config, Strategy};
//!
//! let mut table = Config::new(Strategy::LinearProbing, |k: &i64| *k)
//!     .num_buckets(5)
//!     .bucket_capacity(2)
//!     .open()?;
//!
//! assert!(table.insert(0, "a"));
//! assert!(table.insert(5, "b"));
//! assert!(table.insert(10, "c")); // bucket 0 is full, probes into bucket 1
//!
//! assert_eq!(Some(&"c"), table.search(&10));
//! assert!(table.delete(&5));
//! assert_eq!(None, table.search(&5));
//! #
//! # Ok::<(), bucket_hash::Error>(())
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bucket;

/// Configuration
pub mod config;

mod directory;
mod entry;
mod error;

/// Hash adapters and stock hash functions
pub mod hash;

mod overflow;
mod snapshot;
mod strategy;
mod table;

pub use {
    config::{CapacityPolicy, Config},
    directory::DirectorySlot,
    entry::{BucketId, Entry},
    error::{Error, Result},
    snapshot::{BucketSnapshot, Snapshot},
    strategy::Strategy,
    table::HashTable,
};
