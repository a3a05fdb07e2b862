//! End-to-end sweep tests against on-disk evaluation layouts.
//!
//! Layouts are built in temporary directories following the consumed
//! convention (depth views, pose files, user-input points) and evaluated with
//! the in-process mock evaluator, so no external model is needed.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fusion_eval::config::{EvaluatorConfig, SweepConfig, SweepLimits};
use fusion_eval::dataset::ObjectDataset;
use fusion_eval::evaluator::{EvalOutcome, EvalRequest, GraspEvaluator, MockEvaluator};
use fusion_eval::sweep::{run_sweep, sweep_object};
use fusion_eval::table::ResultTable;
use fusion_eval::{Error, FusionMethod, FusionWeight};

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(path).unwrap();
}

fn make_object(evaluation_dir: &Path, name: &str, points: usize) -> PathBuf {
    let dir = evaluation_dir.join(name);
    touch(&dir.join("0_depth_raw.png"));
    touch(&dir.join("poses").join("0_pose.txt"));
    fs::create_dir_all(dir.join("user_input_points")).unwrap();
    for point in 0..points {
        touch(&dir.join("user_input_points").join(format!("{point}_point.txt")));
    }
    dir
}

fn make_config(root: &Path, seed: u64, failure_rate: f64) -> SweepConfig {
    let evaluation_dir = root.join("renderings");
    fs::create_dir_all(&evaluation_dir).unwrap();
    SweepConfig {
        model_name: "GQCNN-4.0-PJ".into(),
        camera_intr_path: root.join("basler.intr"),
        evaluator_config_path: root.join("dex-net_4.0_pj.yaml"),
        evaluation_dir,
        evaluator: EvaluatorConfig::Mock { seed, failure_rate },
        ..SweepConfig::default()
    }
}

/// Evaluator that always reports an infrastructure fault.
struct BrokenEvaluator;

impl GraspEvaluator for BrokenEvaluator {
    fn evaluate(&mut self, _request: &EvalRequest<'_>) -> fusion_eval::Result<EvalOutcome> {
        Err(Error::Evaluator("bridge exited with signal 9".into()))
    }
}

#[test]
fn full_grid_produces_one_row_per_combination() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 42, 0.0);
    make_object(&config.evaluation_dir, "banana", 3);
    make_object(&config.evaluation_dir, "mug", 12);

    let mut evaluator = MockEvaluator::new(42, 0.0);
    let table = run_sweep(&config, &mut evaluator).unwrap();

    // banana: 3 methods x 4 weights x 3 points; mug capped at 10 points
    assert_eq!(table.len(), 3 * 4 * 3 + 3 * 4 * 10);
    assert_eq!(table.fallback_count(), 0);
}

#[test]
fn checkpoint_file_matches_returned_table() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 7, 0.0);
    make_object(&config.evaluation_dir, "banana", 2);

    let mut evaluator = MockEvaluator::new(7, 0.0);
    let table = run_sweep(&config, &mut evaluator).unwrap();

    let loaded = ResultTable::load(&config.output_path()).unwrap();
    assert_eq!(loaded.len(), table.len());
    assert_eq!(loaded.records(), table.records());
}

#[test]
fn objects_are_swept_in_sorted_order() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 11, 0.0);
    make_object(&config.evaluation_dir, "pear", 1);
    make_object(&config.evaluation_dir, "banana", 1);

    let mut evaluator = MockEvaluator::new(11, 0.0);
    let table = run_sweep(&config, &mut evaluator).unwrap();

    assert!(table.records()[0].object_path.ends_with("banana"));
    assert!(table.records()[table.len() - 1].object_path.ends_with("pear"));
}

#[test]
fn always_failing_model_yields_all_fallback_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 5, 1.0);
    make_object(&config.evaluation_dir, "banana", 4);

    let mut evaluator = MockEvaluator::new(5, 1.0);
    let table = run_sweep(&config, &mut evaluator).unwrap();

    assert_eq!(table.len(), 3 * 4 * 4);
    assert_eq!(table.fallback_count(), table.len());
    for record in table.records() {
        assert_eq!(record.metrics.mean_evaluation_metric, 0.0);
        assert_eq!(record.metrics.grasp_quality, 0.0);
        assert!(record.metrics.distance_norm.is_nan());
    }
}

#[test]
fn infrastructure_faults_also_degrade_to_fallback_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 0, 0.0);
    make_object(&config.evaluation_dir, "mug", 2);

    let mut evaluator = BrokenEvaluator;
    let table = run_sweep(&config, &mut evaluator).unwrap();

    assert_eq!(table.len(), 3 * 4 * 2);
    assert_eq!(table.fallback_count(), table.len());
}

#[test]
fn single_combination_in_isolation_covers_each_point_once() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 13, 0.0);
    let object_dir = make_object(&config.evaluation_dir, "banana", 3);

    let data = ObjectDataset::scan(&object_dir, &SweepLimits::default()).unwrap();
    let mut evaluator = MockEvaluator::new(13, 0.0);
    let mut table = ResultTable::new();
    sweep_object(
        &config,
        &data,
        false,
        &[FusionMethod::Masking],
        &[FusionWeight::Low],
        &mut evaluator,
        &mut table,
    )
    .unwrap();

    assert_eq!(table.len(), 3);
    let indices: Vec<_> = table.records().iter().map(|r| r.point_index).collect();
    assert_eq!(indices, [0, 1, 2]);
    for record in table.records() {
        assert_eq!(record.method, FusionMethod::Masking);
        assert_eq!(record.weight, FusionWeight::Low);
    }
}

#[test]
fn same_seed_reproduces_the_whole_table() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 99, 0.0);
    make_object(&config.evaluation_dir, "banana", 5);

    let mut first = MockEvaluator::new(99, 0.0);
    let table_a = run_sweep(&config, &mut first).unwrap();
    let mut second = MockEvaluator::new(99, 0.0);
    let table_b = run_sweep(&config, &mut second).unwrap();

    assert_eq!(table_a.records(), table_b.records());
}

#[test]
fn object_without_points_dir_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(tmp.path(), 1, 0.0);
    let dir = config.evaluation_dir.join("broken");
    touch(&dir.join("0_depth_raw.png"));

    let mut evaluator = MockEvaluator::new(1, 0.0);
    assert!(matches!(
        run_sweep(&config, &mut evaluator),
        Err(Error::Layout(_))
    ));
}

#[test]
fn missing_evaluation_dir_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(tmp.path(), 1, 0.0);
    config.evaluation_dir = tmp.path().join("nonexistent");

    let mut evaluator = MockEvaluator::new(1, 0.0);
    assert!(run_sweep(&config, &mut evaluator).is_err());
}
