//! Post-hoc aggregation of persisted result tables.
//!
//! Groups records by fusion weight within each fusion method and computes
//! arithmetic means of the three metrics. The summary is derived fresh on
//! each invocation and never persisted.

use serde::Serialize;

use crate::experiment::{FusionMethod, FusionWeight};
use crate::table::ResultTable;

/// Mean metrics for one (method, weight) group.
#[derive(Debug, Clone, Serialize)]
pub struct WeightMeans {
    /// Fusion weight this row summarizes
    pub weight: FusionWeight,
    /// Mean normalized grasp-to-input distance.
    ///
    /// Undefined (NaN) distances from fallback records are excluded; a group
    /// with no defined distance has a NaN mean.
    pub mean_distance: f64,
    /// Mean grasp quality
    pub mean_quality: f64,
    /// Mean composite evaluation metric
    pub mean_metric: f64,
    /// Number of records in the group
    pub samples: usize,
}

/// Summary for one fusion method, rows in ascending weight order.
#[derive(Debug, Clone, Serialize)]
pub struct MethodSummary {
    /// Fusion method this summary covers
    pub method: FusionMethod,
    /// One row per fusion weight, always low, medium, high, very high
    pub rows: Vec<WeightMeans>,
}

/// Group the table by fusion method and weight and compute per-group means.
///
/// Methods and weights appear in their fixed enum order regardless of row
/// order in the table, so downstream axes are stable. The user-input point
/// index is an identifier, not a measurement, and is never aggregated.
/// Aggregation is pure: recomputing on an unchanged table yields identical
/// results.
pub fn aggregate(table: &ResultTable) -> Vec<MethodSummary> {
    FusionMethod::ALL
        .iter()
        .map(|&method| MethodSummary {
            method,
            rows: FusionWeight::ALL
                .iter()
                .map(|&weight| group_means(table, method, weight))
                .collect(),
        })
        .collect()
}

fn group_means(table: &ResultTable, method: FusionMethod, weight: FusionWeight) -> WeightMeans {
    let mut samples = 0usize;
    let mut quality_sum = 0.0;
    let mut metric_sum = 0.0;
    let mut distance_sum = 0.0;
    let mut distance_count = 0usize;

    for record in table.records() {
        if record.method != method || record.weight != weight {
            continue;
        }
        samples += 1;
        quality_sum += record.metrics.grasp_quality;
        metric_sum += record.metrics.mean_evaluation_metric;
        if !record.metrics.distance_norm.is_nan() {
            distance_sum += record.metrics.distance_norm;
            distance_count += 1;
        }
    }

    WeightMeans {
        weight,
        mean_distance: if distance_count > 0 {
            distance_sum / distance_count as f64
        } else {
            f64::NAN
        },
        mean_quality: if samples > 0 {
            quality_sum / samples as f64
        } else {
            f64::NAN
        },
        mean_metric: if samples > 0 {
            metric_sum / samples as f64
        } else {
            f64::NAN
        },
        samples,
    }
}

#[cfg(test)]
mod tests {
    use crate::experiment::{ExperimentRecord, GraspMetrics};

    use super::*;

    fn record(
        method: FusionMethod,
        weight: FusionWeight,
        metric: f64,
        quality: f64,
        distance: f64,
    ) -> ExperimentRecord {
        ExperimentRecord::new(
            "renderings/banana",
            0,
            method,
            weight,
            GraspMetrics {
                mean_evaluation_metric: metric,
                grasp_quality: quality,
                distance_norm: distance,
            },
        )
    }

    #[test]
    fn weight_rows_are_ordered_regardless_of_table_order() {
        let mut table = ResultTable::new();
        // Push in descending weight order
        for &weight in FusionWeight::ALL.iter().rev() {
            table.push(record(FusionMethod::Masking, weight, 0.5, 0.5, 0.5));
        }

        let summary = aggregate(&table);
        let weights: Vec<_> = summary[0].rows.iter().map(|row| row.weight).collect();
        assert_eq!(weights, FusionWeight::ALL.to_vec());
    }

    #[test]
    fn means_are_arithmetic_per_group() {
        let mut table = ResultTable::new();
        table.push(record(FusionMethod::Masking, FusionWeight::Low, 0.2, 0.4, 0.1));
        table.push(record(FusionMethod::Masking, FusionWeight::Low, 0.4, 0.8, 0.3));
        // Different group, must not leak in
        table.push(record(FusionMethod::Masking, FusionWeight::High, 1.0, 1.0, 1.0));

        let summary = aggregate(&table);
        let low = &summary[0].rows[0];
        assert_eq!(low.samples, 2);
        assert!((low.mean_metric - 0.3).abs() < 1e-12);
        assert!((low.mean_quality - 0.6).abs() < 1e-12);
        assert!((low.mean_distance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn nan_distances_are_excluded_from_the_distance_mean() {
        let mut table = ResultTable::new();
        table.push(record(FusionMethod::Masking, FusionWeight::Low, 0.2, 0.4, 0.5));
        table.push(ExperimentRecord::fallback(
            "renderings/banana",
            1,
            FusionMethod::Masking,
            FusionWeight::Low,
        ));

        let summary = aggregate(&table);
        let low = &summary[0].rows[0];
        assert_eq!(low.samples, 2);
        // Fallback quality/metric zeros pull the means down
        assert!((low.mean_quality - 0.2).abs() < 1e-12);
        assert!((low.mean_metric - 0.1).abs() < 1e-12);
        // But the undefined distance is excluded
        assert!((low.mean_distance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn all_fallback_group_has_nan_distance_and_zero_means() {
        let mut table = ResultTable::new();
        for point in 0..3 {
            table.push(ExperimentRecord::fallback(
                "renderings/mug",
                point,
                FusionMethod::LinearDistanceScaling,
                FusionWeight::Medium,
            ));
        }

        let summary = aggregate(&table);
        let row = &summary[1].rows[1];
        assert_eq!(row.samples, 3);
        assert_eq!(row.mean_quality, 0.0);
        assert_eq!(row.mean_metric, 0.0);
        assert!(row.mean_distance.is_nan());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let mut table = ResultTable::new();
        for (i, &weight) in FusionWeight::ALL.iter().enumerate() {
            table.push(record(
                FusionMethod::QuadraticDistanceScaling,
                weight,
                0.1 * i as f64,
                0.2 * i as f64,
                0.05 * i as f64,
            ));
        }

        let first = aggregate(&table);
        let second = aggregate(&table);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.method, b.method);
            for (ra, rb) in a.rows.iter().zip(&b.rows) {
                assert_eq!(ra.samples, rb.samples);
                assert!(ra.mean_metric == rb.mean_metric || (ra.mean_metric.is_nan() && rb.mean_metric.is_nan()));
                assert!(ra.mean_quality == rb.mean_quality || (ra.mean_quality.is_nan() && rb.mean_quality.is_nan()));
                assert!(ra.mean_distance == rb.mean_distance || (ra.mean_distance.is_nan() && rb.mean_distance.is_nan()));
            }
        }
    }

    #[test]
    fn empty_group_has_zero_samples() {
        let table = ResultTable::new();
        let summary = aggregate(&table);
        assert_eq!(summary.len(), 3);
        for method_summary in &summary {
            assert_eq!(method_summary.rows.len(), 4);
            for row in &method_summary.rows {
                assert_eq!(row.samples, 0);
                assert!(row.mean_metric.is_nan());
            }
        }
    }
}
