// Copyright (c) 2025 - Cowboy AI, Inc.
//! Availability Zone Value Object

use serde::{Deserialize, Serialize};

/// An availability zone with its 1-based position within the run
///
/// The position is stable for the duration of a synthesis run; it suffixes
/// logical identifiers and selects the zone's NAT gateway, so a stable zone
/// ordering reproduces identical identifiers across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque zone name, e.g. `us-east-1a`
    pub name: String,
    /// 1-based position in the configured zone order
    pub position: usize,
}

impl Zone {
    /// Number the given zone names in order, starting at position 1
    pub fn enumerate<I, S>(names: I) -> Vec<Zone>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Zone {
                name: name.into(),
                position: i + 1,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_positions_are_one_based() {
        let zones = Zone::enumerate(["us-east-1a", "us-east-1b"]);
        assert_eq!(zones[0].position, 1);
        assert_eq!(zones[0].name, "us-east-1a");
        assert_eq!(zones[1].position, 2);
    }

    #[test]
    fn test_enumerate_empty() {
        let zones = Zone::enumerate(Vec::<String>::new());
        assert!(zones.is_empty());
    }
}
