//! Grasp evaluator seam.
//!
//! The actual grasp-quality computation, 3-D reasoning, and model inference
//! live in an external policy (a dex-net style grasp planner). This module
//! defines the calling convention and the available backends:
//!
//! - [`ProcessEvaluator`]: spawns an external bridge command per combination
//! - [`MockEvaluator`]: in-process simulation for tests and offline runs
//!
//! A "no valid grasp" outcome is part of the evaluator's vocabulary
//! ([`EvalOutcome::NoValidGrasp`]), not an error. `Err` from
//! [`GraspEvaluator::evaluate`] always means an infrastructure fault.

mod mock;
mod process;

pub use mock::MockEvaluator;
pub use process::ProcessEvaluator;

use std::path::Path;

use crate::config::EvaluatorConfig;
use crate::error::Result;
use crate::experiment::{FusionMethod, FusionWeight, GraspMetrics};

/// One evaluation request: the fixed per-view inputs plus the sweep triple.
#[derive(Debug, Clone)]
pub struct EvalRequest<'a> {
    /// Grasp model identifier
    pub model_name: &'a str,
    /// Depth image for the evaluated view
    pub depth_image: &'a Path,
    /// Segmentation mask; present only for suction-gripper configs
    pub segmask: Option<&'a Path>,
    /// Camera intrinsics file
    pub camera_intr: &'a Path,
    /// Evaluator configuration file
    pub evaluator_config: &'a Path,
    /// Camera pose file for the evaluated view
    pub camera_pose: &'a Path,
    /// Directory holding the object's user-input point files
    pub user_input_dir: &'a Path,
    /// Fusion method under test
    pub method: FusionMethod,
    /// Fusion weight under test
    pub weight: FusionWeight,
    /// Index of the user-input point file
    pub point_index: usize,
}

/// Outcome of a single evaluator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// The model produced a grasp with the given metrics
    Grasp(GraspMetrics),
    /// The model found no valid grasp for this combination
    NoValidGrasp,
}

/// External grasp-evaluation model seam.
///
/// Implementations are synchronous and may be slow; the sweep runner treats
/// each call as a blocking operation.
pub trait GraspEvaluator {
    /// Evaluate one (view, fusion method, weight, point) combination.
    fn evaluate(&mut self, request: &EvalRequest<'_>) -> Result<EvalOutcome>;
}

/// Build the evaluator backend selected by the configuration.
pub fn create_evaluator(config: &EvaluatorConfig) -> Box<dyn GraspEvaluator> {
    match config {
        EvaluatorConfig::Process { command, args } => {
            Box::new(ProcessEvaluator::new(command.clone(), args.clone()))
        }
        EvaluatorConfig::Mock { seed, failure_rate } => {
            Box::new(MockEvaluator::new(*seed, *failure_rate))
        }
    }
}
