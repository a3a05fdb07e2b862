//! Simulated grasp evaluator.
//!
//! Produces plausible metrics without the external model so that sweeps,
//! plotting, and tests can run hardware- and model-free. Metrics are a
//! deterministic function of the request parameters plus small seeded jitter;
//! a configurable failure rate injects no-valid-grasp outcomes.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::experiment::{FusionMethod, FusionWeight, GraspMetrics};

use super::{EvalOutcome, EvalRequest, GraspEvaluator};

/// Uniform jitter amplitude applied to each simulated metric.
const JITTER: f64 = 0.02;

/// In-process simulated evaluator.
pub struct MockEvaluator {
    rng: SmallRng,
    failure_rate: f64,
}

impl MockEvaluator {
    /// Create a simulator.
    ///
    /// A `seed` of 0 draws fresh entropy each run; any other value makes the
    /// produced metrics reproducible. `failure_rate` is the probability that
    /// a combination reports no valid grasp.
    pub fn new(seed: u64, failure_rate: f64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_os_rng()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng, failure_rate }
    }

    fn jitter(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * 2.0 * JITTER
    }
}

impl GraspEvaluator for MockEvaluator {
    fn evaluate(&mut self, request: &EvalRequest<'_>) -> Result<EvalOutcome> {
        if self.rng.random::<f64>() < self.failure_rate {
            return Ok(EvalOutcome::NoValidGrasp);
        }

        let base = base_metrics(request.method, request.weight, request.point_index);
        let metrics = GraspMetrics {
            mean_evaluation_metric: clamp01(base.mean_evaluation_metric + self.jitter()),
            grasp_quality: clamp01(base.grasp_quality + self.jitter()),
            distance_norm: clamp01(base.distance_norm + self.jitter()),
        };
        Ok(EvalOutcome::Grasp(metrics))
    }
}

/// Deterministic metric model: stronger user weight pulls the grasp closer to
/// the input point at a small cost in model-assigned quality; masking trades
/// more quality for proximity than the scaling methods.
fn base_metrics(method: FusionMethod, weight: FusionWeight, point_index: usize) -> GraspMetrics {
    let weight_distance = match weight {
        FusionWeight::Low => 0.45,
        FusionWeight::Medium => 0.30,
        FusionWeight::High => 0.18,
        FusionWeight::VeryHigh => 0.12,
    };
    let method_distance_factor = match method {
        FusionMethod::Masking => 0.80,
        FusionMethod::LinearDistanceScaling => 1.00,
        FusionMethod::QuadraticDistanceScaling => 0.90,
    };

    let weight_quality = match weight {
        FusionWeight::Low => 0.85,
        FusionWeight::Medium => 0.82,
        FusionWeight::High => 0.78,
        FusionWeight::VeryHigh => 0.72,
    };
    let method_quality_bias = match method {
        FusionMethod::Masking => -0.05,
        FusionMethod::LinearDistanceScaling => 0.0,
        FusionMethod::QuadraticDistanceScaling => 0.02,
    };

    // Small per-point variation so points are distinguishable in the output
    let point_term = ((point_index * 7) % 10) as f64 * 0.005;

    let distance_norm = clamp01(weight_distance * method_distance_factor + point_term);
    let grasp_quality = clamp01(weight_quality + method_quality_bias - point_term);
    let mean_evaluation_metric = clamp01(0.5 * grasp_quality + 0.5 * (1.0 - distance_norm));

    GraspMetrics {
        mean_evaluation_metric,
        grasp_quality,
        distance_norm,
    }
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
