//! Sweep configuration.
//!
//! Loaded from a YAML file with `#[serde(default)]` sections; binaries may
//! override individual fields from the command line. All parameters that the
//! historical experiment scripts hard-coded in source are explicit, validated
//! fields here, including the grid truncation limits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default result table file name, matching the historical experiment output.
pub const DEFAULT_OUTPUT_FILENAME: &str = "virtual_experiments_results.csv";

fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}

/// Full sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Grasp model identifier passed to the evaluator (e.g. `GQCNN-4.0-SUCTION`)
    pub model_name: String,

    /// Camera intrinsics file handed through to the evaluator
    pub camera_intr_path: PathBuf,

    /// Evaluator configuration file; its name selects the gripper model
    /// variant (and thereby whether segmentation masks are used)
    pub evaluator_config_path: PathBuf,

    /// Root evaluation directory containing one subdirectory per object
    pub evaluation_dir: PathBuf,

    /// Result table file name, created inside `evaluation_dir`
    #[serde(default = "default_output_filename")]
    pub output_filename: String,

    /// Grid truncation limits
    #[serde(default)]
    pub limits: SweepLimits,

    /// Evaluator backend selection
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

/// Truncation limits bounding sweep runtime.
///
/// The historical experiments evaluated only the first camera view and at
/// most 10 user-input points per object. Both caps are preserved as the
/// defaults but can be raised per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepLimits {
    /// Camera views evaluated per object
    #[serde(default = "default_max_views")]
    pub max_views_per_object: usize,

    /// User-input point files evaluated per object
    #[serde(default = "default_max_points")]
    pub max_user_points: usize,
}

fn default_max_views() -> usize {
    1
}

fn default_max_points() -> usize {
    10
}

impl Default for SweepLimits {
    fn default() -> Self {
        Self {
            max_views_per_object: default_max_views(),
            max_user_points: default_max_points(),
        }
    }
}

/// Which evaluator backend to run the sweep against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluatorConfig {
    /// Spawn an external bridge command once per combination
    Process {
        /// Bridge executable
        command: String,
        /// Extra arguments inserted before the generated ones
        #[serde(default)]
        args: Vec<String>,
    },
    /// In-process simulated evaluator (no external model required)
    Mock {
        /// RNG seed; 0 draws fresh entropy each run
        #[serde(default)]
        seed: u64,
        /// Probability in [0, 1] that a combination yields no valid grasp
        #[serde(default)]
        failure_rate: f64,
    },
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig::Mock {
            seed: 0,
            failure_rate: 0.0,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            camera_intr_path: PathBuf::new(),
            evaluator_config_path: PathBuf::new(),
            evaluation_dir: PathBuf::new(),
            output_filename: default_output_filename(),
            limits: SweepLimits::default(),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl SweepConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check that the configuration can drive a sweep.
    pub fn validate(&self) -> Result<()> {
        if self.model_name.is_empty() {
            return Err(Error::Config("model_name must not be empty".into()));
        }
        if self.output_filename.is_empty() {
            return Err(Error::Config("output_filename must not be empty".into()));
        }
        if self.limits.max_views_per_object == 0 {
            return Err(Error::Config("limits.max_views_per_object must be at least 1".into()));
        }
        if self.limits.max_user_points == 0 {
            return Err(Error::Config("limits.max_user_points must be at least 1".into()));
        }
        if !self.evaluation_dir.is_dir() {
            return Err(Error::Config(format!(
                "evaluation_dir is not a directory: {}",
                self.evaluation_dir.display()
            )));
        }
        if let EvaluatorConfig::Mock { failure_rate, .. } = &self.evaluator {
            if !(0.0..=1.0).contains(failure_rate) {
                return Err(Error::Config(format!(
                    "evaluator.failure_rate must be in [0, 1], got {failure_rate}"
                )));
            }
        }
        Ok(())
    }

    /// Result table location: `evaluation_dir/output_filename`
    pub fn output_path(&self) -> PathBuf {
        self.evaluation_dir.join(&self.output_filename)
    }
}
