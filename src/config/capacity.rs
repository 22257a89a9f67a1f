// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Default load factor threshold of dynamic tables
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Capacity policy
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CapacityPolicy {
    /// Storage is fixed for the table's lifetime; inserts fail once there is no room
    Static,

    /// The bucket count doubles once `size / (buckets * capacity)` exceeds the threshold
    Dynamic {
        /// Load factor threshold
        max_load_factor: f64,
    },
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::Static
    }
}

impl CapacityPolicy {
    /// Dynamic policy with the default threshold of 0.75.
    #[must_use]
    pub fn dynamic() -> Self {
        Self::Dynamic {
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    /// Returns `true` if the table may grow.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }

    /// Returns the growth threshold, if any.
    #[must_use]
    pub fn max_load_factor(&self) -> Option<f64> {
        match self {
            Self::Static => None,
            Self::Dynamic { max_load_factor } => Some(*max_load_factor),
        }
    }

    pub(crate) fn should_grow(&self, load_factor: f64) -> bool {
        self.max_load_factor()
            .is_some_and(|threshold| load_factor > threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn capacity_policy_threshold() {
        assert!(!CapacityPolicy::Static.should_grow(10.0));

        let policy = CapacityPolicy::dynamic();
        assert!(policy.is_dynamic());
        assert!(!policy.should_grow(0.75));
        assert!(policy.should_grow(0.8));
    }
}
