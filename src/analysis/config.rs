//! Tunable parameters of the trace analyzer.

#[cfg(feature = "serde_json")]
use crate::{Error, Result};

use super::ScanType;

/// Thresholds and physical constants used by [`super::analyze_with_config`].
///
/// The defaults reproduce the detector that field teams have been running:
/// a 50-sample Gaussian, ±0.005 dB/m slope thresholds, 10 m between fiber
/// issue hits and 75 m merge windows.
///
/// With the `serde` feature the struct can be loaded from partial JSON; any
/// field left out keeps its default value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Speed of light in vacuum, m/s.
    pub speed_of_light: f64,
    /// Raw sample value corresponding to 0 dB.
    pub full_scale: f64,
    /// Standard deviation of the smoothing kernel, in samples.
    /// Values `<= 0` disable smoothing.
    pub smoothing_sigma: f64,
    /// Kernel radius as a multiple of `smoothing_sigma`.
    pub smoothing_truncate: f64,
    /// A slope at or above this value (dB/m) marks a fiber issue.
    pub fiber_issue_slope: f64,
    /// A slope below this value (dB/m) with negative curvature marks a back reflection.
    pub back_reflection_slope: f64,
    /// Minimum distance (m) between two accepted fiber issue hits.
    pub min_issue_spacing: f64,
    /// Hits closer than this (m) to the start of the current range join it.
    pub merge_distance: f64,
    /// Short scans asking for more than this distance (m) are capped.
    pub short_scan_threshold: f64,
    /// Distance (m) a capped short scan is limited to.
    pub short_scan_cap: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            speed_of_light: 299_792_458.0,
            full_scale: 65535.0,
            smoothing_sigma: 50.0,
            smoothing_truncate: 4.0,
            fiber_issue_slope: 0.005,
            back_reflection_slope: -0.005,
            min_issue_spacing: 10.0,
            merge_distance: 75.0,
            short_scan_threshold: 8000.0,
            short_scan_cap: 8500.0,
        }
    }
}

impl AnalysisConfig {
    /// Furthest distance (m) the analysis window may include.
    pub fn distance_cap(&self, max_distance: f64, scan_type: ScanType) -> f64 {
        if scan_type == ScanType::Short && max_distance > self.short_scan_threshold {
            self.short_scan_cap
        } else {
            max_distance
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// Requires the `serde_json` feature.
    #[cfg(feature = "serde_json")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::SerializationError(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Load a configuration from a JSON file.
    ///
    /// Requires the `serde_json` feature.
    #[cfg(feature = "serde_json")]
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(Error::IOError)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_scans_are_capped() {
        let config = AnalysisConfig::default();
        assert_eq!(config.distance_cap(25_000.0, ScanType::Short), 8500.0);
        assert_eq!(config.distance_cap(8000.0, ScanType::Short), 8000.0);
        assert_eq!(config.distance_cap(25_000.0, ScanType::Long), 25_000.0);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config = AnalysisConfig::from_json_str(r#"{ "smoothing_sigma": 20.0 }"#)?;
        assert_eq!(config.smoothing_sigma, 20.0);
        assert_eq!(config.merge_distance, 75.0);
        assert!(AnalysisConfig::from_json_str("{ not json").is_err());
        Ok(())
    }
}
