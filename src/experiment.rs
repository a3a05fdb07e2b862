//! Experiment parameter space and record types.
//!
//! The sweep varies three parameters per object view: the fusion method, the
//! fusion weight, and the user-input point index. One [`ExperimentRecord`] is
//! produced per attempted combination, success or not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Strategy for combining a user-indicated grasp point with model-predicted
/// grasp candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FusionMethod {
    /// Discard candidates outside a region around the user input point
    #[serde(rename = "masking")]
    Masking,
    /// Downweight candidate quality linearly with distance to the user input
    #[serde(rename = "linear_distance_scaling")]
    LinearDistanceScaling,
    /// Downweight candidate quality quadratically with distance to the user input
    #[serde(rename = "quadratic_distance_scaling")]
    QuadraticDistanceScaling,
}

impl FusionMethod {
    /// All methods, in sweep order
    pub const ALL: [FusionMethod; 3] = [
        FusionMethod::Masking,
        FusionMethod::LinearDistanceScaling,
        FusionMethod::QuadraticDistanceScaling,
    ];

    /// Wire name used in result tables and evaluator invocations
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionMethod::Masking => "masking",
            FusionMethod::LinearDistanceScaling => "linear_distance_scaling",
            FusionMethod::QuadraticDistanceScaling => "quadratic_distance_scaling",
        }
    }
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masking" => Ok(FusionMethod::Masking),
            "linear_distance_scaling" => Ok(FusionMethod::LinearDistanceScaling),
            "quadratic_distance_scaling" => Ok(FusionMethod::QuadraticDistanceScaling),
            other => Err(Error::UnknownName {
                kind: "fusion method",
                value: other.to_string(),
            }),
        }
    }
}

/// Relative influence strength of the user input point during fusion.
///
/// The declaration order defines the ordering used everywhere the weights are
/// presented: `Low < Medium < High < VeryHigh`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FusionWeight {
    /// Weak user influence
    #[serde(rename = "low")]
    Low,
    /// Moderate user influence
    #[serde(rename = "medium")]
    Medium,
    /// Strong user influence
    #[serde(rename = "high")]
    High,
    /// Dominant user influence
    #[serde(rename = "very high")]
    VeryHigh,
}

impl FusionWeight {
    /// All weights, ascending
    pub const ALL: [FusionWeight; 4] = [
        FusionWeight::Low,
        FusionWeight::Medium,
        FusionWeight::High,
        FusionWeight::VeryHigh,
    ];

    /// Wire name used in result tables and evaluator invocations.
    ///
    /// Historical result files spell the top weight with a space
    /// (`very high`), so that is the canonical form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionWeight::Low => "low",
            FusionWeight::Medium => "medium",
            FusionWeight::High => "high",
            FusionWeight::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for FusionWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionWeight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(FusionWeight::Low),
            "medium" => Ok(FusionWeight::Medium),
            "high" => Ok(FusionWeight::High),
            "very high" | "very_high" => Ok(FusionWeight::VeryHigh),
            other => Err(Error::UnknownName {
                kind: "fusion weight",
                value: other.to_string(),
            }),
        }
    }
}

/// Metrics returned by the evaluator for a successful grasp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspMetrics {
    /// Composite score combining grasp quality and proximity to the user input
    pub mean_evaluation_metric: f64,
    /// Model-assigned grasp success likelihood
    pub grasp_quality: f64,
    /// Normalized distance from the chosen grasp to the user input point.
    ///
    /// NaN in fallback records, where no grasp exists to measure.
    pub distance_norm: f64,
}

/// One row of the result table: a single attempted combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    /// Object directory path, as a string identifier
    pub object_path: String,
    /// Index of the user-input point file
    pub point_index: usize,
    /// Fusion method under test
    pub method: FusionMethod,
    /// Fusion weight under test
    pub weight: FusionWeight,
    /// Evaluator metrics (fallback sentinel values on failure)
    pub metrics: GraspMetrics,
}

impl ExperimentRecord {
    /// Record for a successful evaluation.
    pub fn new(
        object_path: impl Into<String>,
        point_index: usize,
        method: FusionMethod,
        weight: FusionWeight,
        metrics: GraspMetrics,
    ) -> Self {
        Self {
            object_path: object_path.into(),
            point_index,
            method,
            weight,
            metrics,
        }
    }

    /// Fallback record for a combination where no valid grasp was obtained:
    /// quality 0, metric 0, undefined distance.
    pub fn fallback(
        object_path: impl Into<String>,
        point_index: usize,
        method: FusionMethod,
        weight: FusionWeight,
    ) -> Self {
        Self::new(
            object_path,
            point_index,
            method,
            weight,
            GraspMetrics {
                mean_evaluation_metric: 0.0,
                grasp_quality: 0.0,
                distance_norm: f64::NAN,
            },
        )
    }

    /// True for records carrying the fallback sentinel.
    pub fn is_fallback(&self) -> bool {
        self.metrics.grasp_quality == 0.0
            && self.metrics.mean_evaluation_metric == 0.0
            && self.metrics.distance_norm.is_nan()
    }
}
