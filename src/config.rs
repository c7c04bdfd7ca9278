//! Allocator and advisor configuration.
//!
//! Every field has a default, so an empty document is a valid config.
//!
//! ```toml
//! [allocator]
//! default_duration_ms = 14400000
//! policy = "weighted"
//! capacity_weight = 100.0
//! distance_weight = 5.0
//! reference_point = { latitude = 27.6887106, longitude = 85.2897808 }
//!
//! [advisor]
//! experienced_threshold = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::{GeoPoint, HOUR_MS};

fn default_duration_ms() -> i64 {
    4 * HOUR_MS
}

fn default_capacity_weight() -> f64 {
    100.0
}

fn default_distance_weight() -> f64 {
    5.0
}

/// Campus the distance score is measured from.
fn default_reference_point() -> GeoPoint {
    GeoPoint {
        latitude: 27.6887106,
        longitude: 85.2897808,
    }
}

fn default_experienced_threshold() -> u32 {
    5
}

/// How the automatic search ranks conflict-free venues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Capacity waste plus distance from the reference point.
    ///
    /// Venues without a known location are skipped.
    #[default]
    Weighted,
    /// Smallest conflict-free venue that fits; location is ignored.
    TightestFit,
}

/// Venue allocator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Duration assumed for events without an end time (ms).
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: i64,
    /// Candidate ranking policy.
    #[serde(default)]
    pub policy: ScoringPolicy,
    /// Score per empty seat.
    #[serde(default = "default_capacity_weight")]
    pub capacity_weight: f64,
    /// Score per kilometre from the reference point.
    #[serde(default = "default_distance_weight")]
    pub distance_weight: f64,
    /// Origin for distance scoring.
    #[serde(default = "default_reference_point")]
    pub reference_point: GeoPoint,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            policy: ScoringPolicy::default(),
            capacity_weight: default_capacity_weight(),
            distance_weight: default_distance_weight(),
            reference_point: default_reference_point(),
        }
    }
}

impl AllocatorConfig {
    /// Sets the ranking policy.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the default event duration (ms).
    pub fn with_default_duration(mut self, duration_ms: i64) -> Self {
        self.default_duration_ms = duration_ms;
        self
    }

    /// Sets the scoring weights.
    pub fn with_weights(mut self, capacity_weight: f64, distance_weight: f64) -> Self {
        self.capacity_weight = capacity_weight;
        self.distance_weight = distance_weight;
        self
    }

    /// Sets the distance origin.
    pub fn with_reference_point(mut self, point: GeoPoint) -> Self {
        self.reference_point = point;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_duration_ms <= 0 {
            return Err(ConfigError::Invalid(format!(
                "allocator.default_duration_ms must be positive, got {}",
                self.default_duration_ms
            )));
        }
        for (name, weight) in [
            ("capacity_weight", self.capacity_weight),
            ("distance_weight", self.distance_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "allocator.{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        let p = self.reference_point;
        if GeoPoint::new(p.latitude, p.longitude).is_none() {
            return Err(ConfigError::Invalid(format!(
                "allocator.reference_point out of range: ({}, {})",
                p.latitude, p.longitude
            )));
        }
        Ok(())
    }
}

/// Task advisor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Past participations above which a volunteer counts as experienced.
    #[serde(default = "default_experienced_threshold")]
    pub experienced_threshold: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            experienced_threshold: default_experienced_threshold(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Venue allocator settings.
    #[serde(default)]
    pub allocator: AllocatorConfig,
    /// Task advisor settings.
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.allocator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.allocator.default_duration_ms, 4 * HOUR_MS);
        assert_eq!(config.allocator.policy, ScoringPolicy::Weighted);
        assert!((config.allocator.capacity_weight - 100.0).abs() < 1e-10);
        assert!((config.allocator.distance_weight - 5.0).abs() < 1e-10);
        assert_eq!(config.advisor.experienced_threshold, 5);
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str(
            r#"
            [allocator]
            policy = "tightest_fit"
            default_duration_ms = 7200000

            [advisor]
            experienced_threshold = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.allocator.policy, ScoringPolicy::TightestFit);
        assert_eq!(config.allocator.default_duration_ms, 2 * HOUR_MS);
        assert!((config.allocator.capacity_weight - 100.0).abs() < 1e-10);
        assert_eq!(config.advisor.experienced_threshold, 3);
    }

    #[test]
    fn test_reference_point_table() {
        let config = Config::from_toml_str(
            r#"
            [allocator]
            reference_point = { latitude = 51.5, longitude = -0.12 }
            "#,
        )
        .unwrap();
        assert!((config.allocator.reference_point.latitude - 51.5).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml_str("[allocator]\ndefault_duration_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml_str("[allocator]\ndistance_weight = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml_str(
            "[allocator]\nreference_point = { latitude = 120.0, longitude = 0.0 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("[allocator]\npolicy = \"random\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_path("/nonexistent/u-venue.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
