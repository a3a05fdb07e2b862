//! Virtual experiment sweep runner.
//!
//! Iterates the full parameter grid (object × retained views × fusion method
//! × fusion weight × user-input point) and accumulates one record per
//! attempted combination. Evaluator failures never abort the sweep: a
//! no-valid-grasp outcome and an infrastructure fault both degrade to a
//! fallback record, the latter logged with its cause. Layout faults (missing
//! directories) are fatal.
//!
//! The accumulated table is rewritten to the output file after each object so
//! that interrupting a long run loses at most the in-progress object.

use log::{info, warn};

use crate::config::SweepConfig;
use crate::dataset::{self, ObjectDataset};
use crate::error::Result;
use crate::evaluator::{EvalOutcome, EvalRequest, GraspEvaluator};
use crate::experiment::{ExperimentRecord, FusionMethod, FusionWeight};
use crate::table::ResultTable;

/// Run the full parameter sweep described by `config`.
///
/// Returns the complete table; the same table has been checkpointed to
/// [`SweepConfig::output_path`] after every object.
pub fn run_sweep(config: &SweepConfig, evaluator: &mut dyn GraspEvaluator) -> Result<ResultTable> {
    config.validate()?;

    let output_path = config.output_path();
    let objects = dataset::object_dirs(&config.evaluation_dir)?;
    let use_mask = dataset::uses_suction_gripper(&config.evaluator_config_path);

    info!(
        "Sweeping {} objects under {} (masks: {})",
        objects.len(),
        config.evaluation_dir.display(),
        if use_mask { "suction" } else { "none" }
    );

    let mut table = ResultTable::new();
    for object_dir in &objects {
        let data = ObjectDataset::scan(object_dir, &config.limits)?;
        info!(
            "Load object: {} ({} views, {} points)",
            data.object_dir.display(),
            data.views.len(),
            data.point_files.len()
        );

        sweep_object(
            config,
            &data,
            use_mask,
            &FusionMethod::ALL,
            &FusionWeight::ALL,
            evaluator,
            &mut table,
        )?;

        table.save(&output_path)?;
        info!("Checkpoint: {} rows -> {}", table.len(), output_path.display());
    }

    Ok(table)
}

/// Evaluate one object against explicit method and weight sets, appending one
/// record per combination to `table`.
///
/// [`run_sweep`] passes the full grids; callers may isolate single
/// combinations.
pub fn sweep_object(
    config: &SweepConfig,
    data: &ObjectDataset,
    use_mask: bool,
    methods: &[FusionMethod],
    weights: &[FusionWeight],
    evaluator: &mut dyn GraspEvaluator,
    table: &mut ResultTable,
) -> Result<()> {
    let object_path = data.object_dir.display().to_string();

    for view in &data.views {
        let mask =
            use_mask.then(|| dataset::mask_path(&config.evaluation_dir, &data.name, view.index));

        for &method in methods {
            for &weight in weights {
                for point_index in 0..data.point_files.len() {
                    let request = EvalRequest {
                        model_name: &config.model_name,
                        depth_image: &view.depth_image,
                        segmask: mask.as_deref(),
                        camera_intr: &config.camera_intr_path,
                        evaluator_config: &config.evaluator_config_path,
                        camera_pose: &view.pose_path,
                        user_input_dir: &data.user_input_dir,
                        method,
                        weight,
                        point_index,
                    };

                    let record = match evaluator.evaluate(&request) {
                        Ok(EvalOutcome::Grasp(metrics)) => {
                            info!(
                                "{} point {} {} / {}: metric {:.3}, quality {:.3}, distance {:.3}",
                                data.name,
                                point_index,
                                method,
                                weight,
                                metrics.mean_evaluation_metric,
                                metrics.grasp_quality,
                                metrics.distance_norm
                            );
                            ExperimentRecord::new(
                                object_path.as_str(),
                                point_index,
                                method,
                                weight,
                                metrics,
                            )
                        }
                        Ok(EvalOutcome::NoValidGrasp) => {
                            info!(
                                "{} point {} {} / {}: no valid grasp",
                                data.name, point_index, method, weight
                            );
                            ExperimentRecord::fallback(object_path.as_str(), point_index, method, weight)
                        }
                        Err(err) => {
                            warn!(
                                "{} point {} {} / {}: evaluator failure ({err}); recording fallback",
                                data.name, point_index, method, weight
                            );
                            ExperimentRecord::fallback(object_path.as_str(), point_index, method, weight)
                        }
                    };

                    table.push(record);
                }
            }
        }
    }

    Ok(())
}
