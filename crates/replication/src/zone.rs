//! Per-zone replication factors.

use std::collections::BTreeMap;

use corelib::ZoneId;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Number of zones mirrored-zone routing spreads replicas over.
pub const MIRRORED_ZONE_COUNT: usize = 3;

/// Replicas each zone holds under mirrored-zone routing.
pub const REPLICAS_PER_ZONE: usize = 1;

/// Total replication factor mirrored-zone routing supports.
pub const MIRRORED_REPLICATION_FACTOR: usize = MIRRORED_ZONE_COUNT * REPLICAS_PER_ZONE;

/// Required replica count per zone.
///
/// Serialized as a JSON object keyed by zone id: `{"0": 1, "1": 1, "2": 1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneReplicationFactor(BTreeMap<ZoneId, usize>);

impl ZoneReplicationFactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// One replica in each of the given zones.
    pub fn one_per_zone(zones: impl IntoIterator<Item = ZoneId>) -> Self {
        zones.into_iter().map(|zone| (zone, REPLICAS_PER_ZONE)).collect()
    }

    /// Sets the factor of `zone`, returning the previous one.
    pub fn insert(&mut self, zone: ZoneId, factor: usize) -> Option<usize> {
        self.0.insert(zone, factor)
    }

    pub fn get(&self, zone: ZoneId) -> Option<usize> {
        self.0.get(&zone).copied()
    }

    /// Number of zones with a configured factor.
    pub fn zone_count(&self) -> usize {
        self.0.len()
    }

    /// Sum of all zone factors.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, usize)> + '_ {
        self.0.iter().map(|(&zone, &factor)| (zone, factor))
    }

    /// Checks the factors against mirrored-zone routing rules.
    ///
    /// Checks run in a fixed order: per-zone factor, `replication_factor`
    /// itself, zone count, then the sum against `replication_factor`.
    pub fn validate_mirrored(&self, replication_factor: usize) -> Result<(), ConfigurationError> {
        if let Some((zone, factor)) = self.iter().find(|&(_, f)| f != REPLICAS_PER_ZONE) {
            return Err(ConfigurationError::ZoneFactorNotOne { zone, factor });
        }
        if replication_factor != MIRRORED_REPLICATION_FACTOR {
            return Err(ConfigurationError::TotalReplicationFactor {
                expected: MIRRORED_REPLICATION_FACTOR,
                found: replication_factor,
            });
        }
        if self.zone_count() != MIRRORED_ZONE_COUNT {
            return Err(ConfigurationError::ZoneCount {
                expected: MIRRORED_ZONE_COUNT,
                found: self.zone_count(),
            });
        }
        let sum = self.total();
        if sum != replication_factor {
            return Err(ConfigurationError::ReplicaSumMismatch {
                sum,
                total: replication_factor,
            });
        }
        Ok(())
    }

    /// Fresh countdown of the replicas still required, owned by one call.
    pub fn remaining(&self) -> RemainingReplicas {
        RemainingReplicas(self.0.clone())
    }
}

impl FromIterator<(ZoneId, usize)> for ZoneReplicationFactor {
    fn from_iter<I: IntoIterator<Item = (ZoneId, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Call-local countdown of replicas still needed per zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingReplicas(BTreeMap<ZoneId, usize>);

impl RemainingReplicas {
    /// Takes one replica slot in `zone`.
    ///
    /// Returns false if the zone is unknown or already satisfied.
    pub fn claim(&mut self, zone: ZoneId) -> bool {
        match self.0.get_mut(&zone) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }

    /// Zones that still need at least one replica.
    pub fn unsatisfied(&self) -> Vec<ZoneId> {
        self.0
            .iter()
            .filter(|(_, left)| **left > 0)
            .map(|(&zone, _)| zone)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(factors: &[(u32, usize)]) -> ZoneReplicationFactor {
        factors.iter().map(|&(z, f)| (ZoneId(z), f)).collect()
    }

    #[test]
    fn test_valid_mirrored_factors() {
        let factors = ZoneReplicationFactor::one_per_zone([ZoneId(0), ZoneId(1), ZoneId(2)]);
        assert_eq!(factors.total(), 3);
        assert_eq!(factors.validate_mirrored(3), Ok(()));
    }

    #[test]
    fn test_zone_factor_two() {
        let factors = zones(&[(0, 1), (1, 2), (2, 1)]);
        assert_eq!(
            factors.validate_mirrored(4),
            Err(ConfigurationError::ZoneFactorNotOne {
                zone: ZoneId(1),
                factor: 2
            })
        );
    }

    #[test]
    fn test_zone_factor_zero() {
        let factors = zones(&[(0, 0), (1, 1), (2, 1)]);
        assert!(matches!(
            factors.validate_mirrored(2),
            Err(ConfigurationError::ZoneFactorNotOne { factor: 0, .. })
        ));
    }

    #[test]
    fn test_two_zones() {
        let factors = zones(&[(0, 1), (1, 1)]);
        assert_eq!(
            factors.validate_mirrored(3),
            Err(ConfigurationError::ZoneCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_four_zones() {
        let factors = zones(&[(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(
            factors.validate_mirrored(3),
            Err(ConfigurationError::ZoneCount {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_total_factor_four() {
        let factors = zones(&[(0, 1), (1, 1), (2, 1)]);
        assert_eq!(
            factors.validate_mirrored(4),
            Err(ConfigurationError::TotalReplicationFactor {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn test_two_zones_total_two() {
        let factors = zones(&[(0, 1), (1, 1)]);
        assert!(matches!(
            factors.validate_mirrored(2),
            Err(ConfigurationError::TotalReplicationFactor { found: 2, .. })
        ));
    }

    #[test]
    fn test_empty_factors() {
        assert!(matches!(
            ZoneReplicationFactor::new().validate_mirrored(3),
            Err(ConfigurationError::ZoneCount { found: 0, .. })
        ));
    }

    #[test]
    fn test_remaining_is_independent_copy() {
        let factors = zones(&[(0, 1), (1, 1), (2, 1)]);
        let mut remaining = factors.remaining();

        assert!(remaining.claim(ZoneId(1)));
        assert!(!remaining.claim(ZoneId(1)));
        assert!(!remaining.claim(ZoneId(9)));
        assert_eq!(remaining.unsatisfied(), vec![ZoneId(0), ZoneId(2)]);

        // The configuration itself is untouched.
        assert_eq!(factors.get(ZoneId(1)), Some(1));
        assert_eq!(factors.remaining().unsatisfied().len(), 3);
    }

    #[test]
    fn test_json_keyed_by_zone() {
        let factors: ZoneReplicationFactor =
            serde_json::from_str(r#"{"0": 1, "1": 1, "2": 1}"#).unwrap();
        assert_eq!(factors.zone_count(), 3);
        assert_eq!(factors.get(ZoneId(2)), Some(1));
    }
}
