//! Subprocess bridge to the external grasp-evaluation model.
//!
//! The bridge command is invoked once per combination with a fixed argument
//! convention and must print the three result metrics
//! (`mean_evaluation_metric grasp_quality distance_norm`) as the last
//! non-empty line of stdout. A run that finds no valid grasp exits nonzero
//! and prints `no valid grasp` (any case) on stdout or stderr; every other
//! failure is an infrastructure fault.

use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::experiment::GraspMetrics;

use super::{EvalOutcome, EvalRequest, GraspEvaluator};

/// Marker the bridge emits when the model legitimately finds no grasp.
const NO_GRASP_MARKER: &str = "no valid grasp";

/// Evaluator backed by an external bridge command.
pub struct ProcessEvaluator {
    command: String,
    base_args: Vec<String>,
}

impl ProcessEvaluator {
    /// Create an evaluator spawning `command` with `base_args` prepended to
    /// the generated per-request arguments.
    pub fn new(command: String, base_args: Vec<String>) -> Self {
        Self { command, base_args }
    }

    fn build_command(&self, request: &EvalRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.base_args)
            .arg("--model")
            .arg(request.model_name)
            .arg("--depth-image")
            .arg(request.depth_image)
            .arg("--camera-intr")
            .arg(request.camera_intr)
            .arg("--config")
            .arg(request.evaluator_config)
            .arg("--camera-pose")
            .arg(request.camera_pose)
            .arg("--user-input-dir")
            .arg(request.user_input_dir)
            .arg("--fusion-method")
            .arg(request.method.as_str())
            .arg("--fusion-weight")
            .arg(request.weight.as_str())
            .arg("--point-index")
            .arg(request.point_index.to_string());
        if let Some(segmask) = request.segmask {
            cmd.arg("--segmask").arg(segmask);
        }
        cmd
    }
}

impl GraspEvaluator for ProcessEvaluator {
    fn evaluate(&mut self, request: &EvalRequest<'_>) -> Result<EvalOutcome> {
        let mut cmd = self.build_command(request);
        debug!("Spawning evaluator bridge: {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            Error::Evaluator(format!("failed to spawn {:?}: {}", self.command, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let combined = format!("{stdout}\n{stderr}").to_lowercase();
            if combined.contains(NO_GRASP_MARKER) {
                return Ok(EvalOutcome::NoValidGrasp);
            }
            return Err(Error::Evaluator(format!(
                "bridge exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_metrics_line(&stdout).map(EvalOutcome::Grasp)
    }
}

/// Parse the last non-empty stdout line as the three result metrics.
fn parse_metrics_line(stdout: &str) -> Result<GraspMetrics> {
    let line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| Error::Evaluator("bridge produced no output".into()))?;

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(Error::Evaluator(format!(
            "expected 3 metrics on the last output line, got {}: {:?}",
            fields.len(),
            line
        )));
    }

    let mut values = [0.0f64; 3];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = field.parse().map_err(|_| {
            Error::Evaluator(format!("non-numeric metric {:?} in line {:?}", field, line))
        })?;
    }

    Ok(GraspMetrics {
        mean_evaluation_metric: values[0],
        grasp_quality: values[1],
        distance_norm: values[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_last_nonempty_line() {
        let stdout = "loading model\nplanning grasp\n0.42 0.87 0.061\n\n";
        let metrics = parse_metrics_line(stdout).unwrap();
        assert_eq!(metrics.mean_evaluation_metric, 0.42);
        assert_eq!(metrics.grasp_quality, 0.87);
        assert_eq!(metrics.distance_norm, 0.061);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_metrics_line("0.42 0.87").is_err());
        assert!(parse_metrics_line("0.1 0.2 0.3 0.4").is_err());
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(parse_metrics_line("0.42 quality 0.061").is_err());
    }

    #[test]
    fn rejects_empty_output() {
        assert!(parse_metrics_line("\n  \n").is_err());
    }
}
