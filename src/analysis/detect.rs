//! Event classification and range merging.

use super::AnalysisConfig;

/// A closed distance interval, in meters, covering one or more detector hits.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventRange {
    pub start: f64,
    pub end: f64,
}

impl EventRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains(&self, distance: f64) -> bool {
        self.start <= distance && distance <= self.end
    }
}

/// Raw detector hits, as distances in meters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hits {
    pub back_reflections: Vec<f64>,
    pub fiber_issues: Vec<f64>,
}

/// Scan the curve left to right and classify each sample.
///
/// The first sample is skipped since its derivatives are one-sided. A fiber
/// issue needs a slope of at least `fiber_issue_slope` and must lie at least
/// `min_issue_spacing` past the previous accepted fiber issue. Otherwise a
/// sample is a back reflection when its slope is below
/// `back_reflection_slope` and its curvature is negative.
pub fn classify(
    distances: &[f64],
    slope: &[f64],
    curvature: &[f64],
    config: &AnalysisConfig,
) -> Hits {
    let n = distances.len().min(slope.len()).min(curvature.len());
    let mut hits = Hits::default();
    let mut last_issue = -config.min_issue_spacing;

    for i in 1..n {
        let distance = distances[i];
        if slope[i] >= config.fiber_issue_slope
            && distance - last_issue >= config.min_issue_spacing
        {
            hits.fiber_issues.push(distance);
            last_issue = distance;
        } else if slope[i] < config.back_reflection_slope && curvature[i] < 0.0 {
            hits.back_reflections.push(distance);
        }
    }

    hits
}

/// Merge sorted hits into ranges.
///
/// A range starts at a hit and absorbs every following hit lying no more than
/// `merge_distance` past the range's *start*; the first hit beyond that
/// starts a new range.
pub fn coalesce(hits: &[f64], merge_distance: f64) -> Vec<EventRange> {
    let Some((&first, rest)) = hits.split_first() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut current = EventRange::new(first, first);
    for &hit in rest {
        if hit - current.start > merge_distance {
            ranges.push(current);
            current = EventRange::new(hit, hit);
        } else {
            current.end = hit;
        }
    }
    ranges.push(current);
    ranges
}
