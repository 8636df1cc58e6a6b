//! OTDR trace analysis.
//!
//! Turns the data points of a decoded [`SorFile`] into a power-vs-distance
//! curve and looks for two kinds of anomaly:
//!
//! - **Back reflections**: the smoothed curve falls steeply while bending
//!   downwards, as after a connector or an open fiber end.
//! - **Fiber issues**: the smoothed curve rises steeply, as around a loss
//!   event or break.
//!
//! # Pipeline
//!
//! 1. Convert samples to dB and sample indices to meters ([`Trace`]).
//! 2. Keep samples between the start distance and the distance cap
//!    (short scans asking for more than 8 km are capped at 8.5 km).
//! 3. Smooth with a Gaussian kernel.
//! 4. Take the first (slope) and second (curvature) derivatives.
//! 5. Classify samples ([`classify`]) and merge hits into ranges ([`coalesce`]).
//!
//! Analysis never returns an `Err`: a trace that cannot be analyzed yields an
//! [`AnalysisReport`] with `success == false` and the cause attached, so one
//! bad trace does not stop a batch.
//!
//! # Example
//!
//! ```no_run
//! use sor_rs::{SorFile, Result};
//! use sor_rs::analysis::{analyze, ScanType};
//!
//! fn report(path: &str) -> Result<()> {
//!     let sor = SorFile::from_file(path)?;
//!     let report = analyze(&sor, 50.0, 25_000.0, ScanType::Short);
//!     if report.success {
//!         for range in &report.fiber_issues {
//!             println!("fiber issue between {:.1} m and {:.1} m", range.start, range.end);
//!         }
//!     } else {
//!         eprintln!("{}", report.diagnostic);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod detect;
mod filters;
mod trace;

pub use config::AnalysisConfig;
pub use detect::{EventRange, Hits, classify, coalesce};
pub use filters::{gaussian_smooth, gradient};
pub use trace::{Trace, TraceWindow};

use crate::SorFile;
use core::fmt;
use core::str::FromStr;

/// Start of the analysis window used by the upload service, in meters.
pub const DEFAULT_START_DISTANCE: f64 = 50.0;

/// Fiber length assumed when the caller does not know it, in meters.
pub const DEFAULT_MAX_DISTANCE: f64 = 25_000.0;

/// Acquisition mode of a trace; short scans get a tighter distance cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanType {
    Short,
    Long,
}

impl ScanType {
    /// Classify a scan tag such as the `short` in `olt1_p3_short_001.sor`.
    /// Anything other than `short` (in any case) is a long scan.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("short") {
            ScanType::Short
        } else {
            ScanType::Long
        }
    }
}

impl FromStr for ScanType {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl From<&str> for ScanType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// Why a trace could not be analyzed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AnalysisError {
    /// A block the analysis depends on is absent.
    MissingBlock(&'static str),
    /// The group index is zero or negative.
    InvalidGroupIndex(i32),
    /// The fixed parameters list no data spacing.
    MissingDataSpacing,
    /// The first data spacing does not give a positive, finite step.
    InvalidDataSpacing(i32),
    /// The data points contain no scale-factor group.
    MissingScaleFactors,
    /// An intermediate quantity is NaN or infinite.
    NonFinite(&'static str),
    /// The analysis window holds too few samples to differentiate.
    TooFewSamples {
        available: usize,
        start: f64,
        cap: f64,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingBlock(id) => write!(f, "Trace has no {id} block"),
            AnalysisError::InvalidGroupIndex(gi) => {
                write!(f, "Group index {gi} does not give a valid refractive index")
            }
            AnalysisError::MissingDataSpacing => write!(f, "Fixed parameters list no data spacing"),
            AnalysisError::InvalidDataSpacing(ds) => {
                write!(f, "Data spacing {ds} does not give a positive sample distance")
            }
            AnalysisError::MissingScaleFactors => write!(f, "Data points have no scale factors"),
            AnalysisError::NonFinite(what) => write!(f, "Non-finite {what} values"),
            AnalysisError::TooFewSamples {
                available,
                start,
                cap,
            } => write!(
                f,
                "Only {available} samples between {start} m and {cap} m; at least 2 are needed"
            ),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Merged detections for one trace.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectedEvents {
    pub back_reflections: Vec<EventRange>,
    pub fiber_issues: Vec<EventRange>,
}

/// Outcome of [`analyze`].
///
/// On failure both range lists are empty, `diagnostic` describes the problem
/// and `cause` holds it in typed form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnalysisReport {
    pub success: bool,
    pub diagnostic: String,
    pub back_reflections: Vec<EventRange>,
    pub fiber_issues: Vec<EventRange>,
    pub cause: Option<AnalysisError>,
}

impl From<Result<DetectedEvents, AnalysisError>> for AnalysisReport {
    fn from(result: Result<DetectedEvents, AnalysisError>) -> Self {
        match result {
            Ok(events) => Self {
                success: true,
                diagnostic: format!(
                    "Analyzed trace: {} back reflection range(s), {} fiber issue range(s)",
                    events.back_reflections.len(),
                    events.fiber_issues.len()
                ),
                back_reflections: events.back_reflections,
                fiber_issues: events.fiber_issues,
                cause: None,
            },
            Err(e) => Self {
                success: false,
                diagnostic: format!("Failed to analyze trace: {e}"),
                back_reflections: Vec::new(),
                fiber_issues: Vec::new(),
                cause: Some(e),
            },
        }
    }
}

/// Analyze `sor` with the default [`AnalysisConfig`].
///
/// # Arguments
/// * `start_distance` - Samples before this distance (m) are ignored.
/// * `max_distance` - Expected fiber length (m); samples beyond it are ignored.
/// * `scan_type` - Short scans are capped at 8.5 km when `max_distance` exceeds 8 km.
pub fn analyze(
    sor: &SorFile,
    start_distance: f64,
    max_distance: f64,
    scan_type: impl Into<ScanType>,
) -> AnalysisReport {
    analyze_with_config(
        sor,
        start_distance,
        max_distance,
        scan_type.into(),
        &AnalysisConfig::default(),
    )
}

/// Analyze `sor` with explicit thresholds. See [`analyze`].
pub fn analyze_with_config(
    sor: &SorFile,
    start_distance: f64,
    max_distance: f64,
    scan_type: ScanType,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let report =
        AnalysisReport::from(detect_events(sor, start_distance, max_distance, scan_type, config));
    if report.success {
        tracing::debug!(
            back_reflections = report.back_reflections.len(),
            fiber_issues = report.fiber_issues.len(),
            "Trace analysis complete"
        );
    } else {
        tracing::warn!(diagnostic = %report.diagnostic, "Trace analysis failed");
    }
    report
}

/// The fallible core of [`analyze_with_config`].
pub fn detect_events(
    sor: &SorFile,
    start_distance: f64,
    max_distance: f64,
    scan_type: ScanType,
    config: &AnalysisConfig,
) -> Result<DetectedEvents, AnalysisError> {
    let trace = Trace::from_sor(sor, config)?;
    let cap = config.distance_cap(max_distance, scan_type);
    let window = trace.window(start_distance, cap);
    if window.len() < 2 {
        return Err(AnalysisError::TooFewSamples {
            available: window.len(),
            start: start_distance,
            cap,
        });
    }

    let smoothed = gaussian_smooth(window.power, config.smoothing_sigma, config.smoothing_truncate);
    let slope = gradient(&smoothed, window.distances);
    let curvature = gradient(&slope, window.distances);
    if slope.iter().chain(&curvature).any(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFinite("derivative"));
    }

    let hits = classify(window.distances, &slope, &curvature, config);
    tracing::trace!(
        samples = window.len(),
        back_reflection_hits = hits.back_reflections.len(),
        fiber_issue_hits = hits.fiber_issues.len(),
        "Classified trace samples"
    );

    Ok(DetectedEvents {
        back_reflections: coalesce(&hits.back_reflections, config.merge_distance),
        fiber_issues: coalesce(&hits.fiber_issues, config.merge_distance),
    })
}
