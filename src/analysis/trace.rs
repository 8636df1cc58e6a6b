//! Conversion of decoded samples into a power-vs-distance curve.

use super::{AnalysisConfig, AnalysisError};
use crate::SorFile;

/// The first scale-factor group of a trace, in physical units.
///
/// `distances[i]` is `i * step` meters from the start of the acquisition and
/// `power[i]` is the backscattered level at that point in dB below full scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    pub distances: Vec<f64>,
    pub power: Vec<f64>,
    /// Distance between consecutive samples, in meters.
    pub step: f64,
    /// Speed of light in the fiber under test, in m/s.
    pub speed_in_fiber: f64,
    /// Distance from the instrument's reference to its front panel.
    pub front_panel_distance: f64,
    /// Distance to the launch connector, if the file has general parameters.
    pub launch_connector_distance: Option<f64>,
}

/// A contiguous slice of a [`Trace`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceWindow<'a> {
    pub distances: &'a [f64],
    pub power: &'a [f64],
}

impl TraceWindow<'_> {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

impl Trace {
    /// Build the curve from a decoded file.
    ///
    /// Uses the group index and first data spacing of the fixed parameters and
    /// the first scale-factor group of the data points.
    pub fn from_sor(sor: &SorFile, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let fixed = sor
            .fixed_parameters
            .as_ref()
            .ok_or(AnalysisError::MissingBlock("FxdParams"))?;
        let data_points = sor
            .data_points
            .as_ref()
            .ok_or(AnalysisError::MissingBlock("DataPts"))?;

        let refractive_index = fixed.refractive_index();
        if refractive_index <= 0.0 {
            return Err(AnalysisError::InvalidGroupIndex(fixed.group_index));
        }
        let speed_in_fiber = config.speed_of_light / refractive_index;

        // Data spacing is the time for 10,000 points in units of 100 ps.
        let spacing = *fixed
            .data_spacing
            .first()
            .ok_or(AnalysisError::MissingDataSpacing)?;
        let step = (f64::from(spacing) / 1e10 / 10_000.0) * speed_in_fiber;
        if !step.is_finite() || step <= 0.0 {
            return Err(AnalysisError::InvalidDataSpacing(spacing));
        }

        let group = data_points
            .scale_factors
            .first()
            .ok_or(AnalysisError::MissingScaleFactors)?;
        if data_points.scale_factors.len() > 1 {
            tracing::warn!(
                groups = data_points.scale_factors.len(),
                "Trace has several scale-factor groups; only the first is analyzed"
            );
        }

        let scale = f64::from(group.scale_factor);
        let power: Vec<f64> = group
            .data
            .iter()
            .map(|&s| -(config.full_scale - f64::from(s)) / scale)
            .collect();
        if power.iter().any(|p| !p.is_finite()) {
            return Err(AnalysisError::NonFinite("power"));
        }
        let distances = (0..power.len()).map(|i| i as f64 * step).collect();

        let front_panel_distance = f64::from(fixed.front_panel_offset) / 1e10 * speed_in_fiber;
        let launch_connector_distance = sor.general_parameters.as_ref().map(|general| {
            f64::from(general.user_offset) / 1e10 * speed_in_fiber + front_panel_distance
        });

        Ok(Self {
            distances,
            power,
            step,
            speed_in_fiber,
            front_panel_distance,
            launch_connector_distance,
        })
    }

    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Samples with `start <= distance <= cap`.
    pub fn window(&self, start: f64, cap: f64) -> TraceWindow<'_> {
        let end = self.distances.partition_point(|&d| d <= cap);
        let begin = self.distances[..end].partition_point(|&d| d < start);
        TraceWindow {
            distances: &self.distances[begin..end],
            power: &self.power[begin..end],
        }
    }
}
