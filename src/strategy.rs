// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Error;

/// Collision resolution strategy
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum::EnumIter))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Strategy {
    /// Overflowing entries are pushed into the bucket's own unbounded chain
    Chaining,

    /// `index(i) = (h1 + i) mod m`, deletes leave tombstones
    LinearProbing,

    /// Linear probing across buckets, then the home bucket's chain once all are full
    ChainedLinearProbing,

    /// Overflowing entries go into a bounded overflow area shared by all buckets
    SeparateOverflow,

    /// `index(i) = (h1 + i * h2) mod m`, deletes leave tombstones
    ///
    /// Also known as table-assisted hashing.
    DoubleHashing,

    /// Directory of `2^globalDepth` slots, buckets are split on overflow
    ExtensibleHashing,
}

impl Strategy {
    /// All strategies, in tag order.
    pub const ALL: [Self; 6] = [
        Self::Chaining,
        Self::LinearProbing,
        Self::ChainedLinearProbing,
        Self::SeparateOverflow,
        Self::DoubleHashing,
        Self::ExtensibleHashing,
    ];

    /// Returns `true` if the strategy needs a secondary hash function.
    #[must_use]
    pub fn requires_secondary_hash(self) -> bool {
        matches!(self, Self::DoubleHashing)
    }

    /// Returns `true` if deletes leave tombstones instead of splicing.
    ///
    /// The separate overflow strategy only tombstones in static tables; dynamic
    /// tables replace its overflow area with per-bucket chains.
    #[must_use]
    pub fn uses_tombstones(self) -> bool {
        matches!(
            self,
            Self::LinearProbing | Self::DoubleHashing | Self::SeparateOverflow
        )
    }

    /// Short identifier, as accepted by [`std::str::FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chaining => "chaining",
            Self::LinearProbing => "linear",
            Self::ChainedLinearProbing => "chained-linear",
            Self::SeparateOverflow => "overflow",
            Self::DoubleHashing => "double",
            Self::ExtensibleHashing => "extensible",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "chaining" | "chain" => Ok(Self::Chaining),
            "linear" | "linear-probing" => Ok(Self::LinearProbing),
            "chained-linear" | "chained-linear-probing" => Ok(Self::ChainedLinearProbing),
            "overflow" | "separate-overflow" => Ok(Self::SeparateOverflow),
            "double" | "double-hashing" | "table-assisted" => Ok(Self::DoubleHashing),
            "extensible" | "extensible-hashing" | "extendible" => Ok(Self::ExtensibleHashing),
            _ => Err(Error::InvalidStrategy(s.to_owned())),
        }
    }
}

impl From<Strategy> for u8 {
    fn from(val: Strategy) -> Self {
        match val {
            Strategy::Chaining => 0,
            Strategy::LinearProbing => 1,
            Strategy::ChainedLinearProbing => 2,
            Strategy::SeparateOverflow => 3,
            Strategy::DoubleHashing => 4,
            Strategy::ExtensibleHashing => 5,
        }
    }
}

impl TryFrom<u8> for Strategy {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Chaining),
            1 => Ok(Self::LinearProbing),
            2 => Ok(Self::ChainedLinearProbing),
            3 => Ok(Self::SeparateOverflow),
            4 => Ok(Self::DoubleHashing),
            5 => Ok(Self::ExtensibleHashing),
            _ => Err(Error::InvalidStrategy(value.to_string())),
        }
    }
}
