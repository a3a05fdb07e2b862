//! Evaluation-directory layout scanning.
//!
//! The sweep consumes (never produces) this on-disk convention:
//!
//! ```text
//! <evaluation_dir>/<object>/<...>depth_raw.png          one per camera view
//! <evaluation_dir>/<object>/poses/<view_idx>_pose.txt   pose per view
//! <evaluation_dir>/<object>/user_input_points/*point.txt
//! <evaluation_dir>/../masks/<object>_mask/<view_idx>.png
//! ```
//!
//! Enumeration is always sorted so runs are deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SweepLimits;
use crate::error::{Error, Result};

/// File-name suffix identifying a rendered depth view
pub const DEPTH_VIEW_SUFFIX: &str = "depth_raw.png";

/// File-name suffix identifying a user-input point file
pub const POINT_FILE_SUFFIX: &str = "point.txt";

/// One camera view of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectView {
    /// View index (position in the sorted view list)
    pub index: usize,
    /// Depth image for this view
    pub depth_image: PathBuf,
    /// Camera pose file, `poses/<index>_pose.txt`
    pub pose_path: PathBuf,
}

/// Everything the sweep needs to know about one object directory.
#[derive(Debug, Clone)]
pub struct ObjectDataset {
    /// The object directory itself
    pub object_dir: PathBuf,
    /// Object name (final path component)
    pub name: String,
    /// Retained camera views, truncated per the sweep limits
    pub views: Vec<ObjectView>,
    /// The `user_input_points` directory
    pub user_input_dir: PathBuf,
    /// Retained point files, sorted and truncated per the sweep limits
    pub point_files: Vec<PathBuf>,
}

impl ObjectDataset {
    /// Scan one object directory.
    ///
    /// A missing `user_input_points` directory is a layout error. An object
    /// without depth views yields an empty view list (and therefore no sweep
    /// rows), matching the historical behavior.
    pub fn scan(object_dir: &Path, limits: &SweepLimits) -> Result<Self> {
        let name = object_name(object_dir)?;

        let mut depth_images = files_with_suffix(object_dir, DEPTH_VIEW_SUFFIX)?;
        depth_images.truncate(limits.max_views_per_object);
        let views = depth_images
            .into_iter()
            .enumerate()
            .map(|(index, depth_image)| ObjectView {
                index,
                depth_image,
                pose_path: object_dir.join("poses").join(format!("{index}_pose.txt")),
            })
            .collect();

        let user_input_dir = object_dir.join("user_input_points");
        if !user_input_dir.is_dir() {
            return Err(Error::Layout(format!(
                "object {:?} has no user_input_points directory ({})",
                name,
                user_input_dir.display()
            )));
        }
        let mut point_files = files_with_suffix(&user_input_dir, POINT_FILE_SUFFIX)?;
        point_files.truncate(limits.max_user_points);

        Ok(Self {
            object_dir: object_dir.to_path_buf(),
            name,
            views,
            user_input_dir,
            point_files,
        })
    }
}

/// List object subdirectories of the evaluation root, sorted by name.
pub fn object_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::Layout(format!(
            "evaluation directory not found: {}",
            root.display()
        )));
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Recursively collect files under `dir` whose names end with `suffix`,
/// sorted by path.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    collect_with_suffix(dir, suffix, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_with_suffix(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_with_suffix(&path, suffix, out)?;
        } else if path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Segmentation mask location for one object view:
/// `<evaluation_dir>/../masks/<object>_mask/<view_idx>.png`
pub fn mask_path(evaluation_dir: &Path, object_name: &str, view_index: usize) -> PathBuf {
    evaluation_dir
        .join("..")
        .join("masks")
        .join(format!("{object_name}_mask"))
        .join(format!("{view_index}.png"))
}

/// Whether the evaluator configuration implies a suction-cup gripper model,
/// which requires segmentation masks.
pub fn uses_suction_gripper(evaluator_config: &Path) -> bool {
    let name = evaluator_config
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.contains("suction") || name.contains("dex-net_3.0")
}

fn object_name(object_dir: &Path) -> Result<String> {
    object_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Layout(format!(
                "object directory has no final path component: {}",
                object_dir.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap();
    }

    fn make_object(root: &Path, name: &str, views: usize, points: usize) -> PathBuf {
        let dir = root.join(name);
        for view in 0..views {
            touch(&dir.join(format!("{view}_depth_raw.png")));
            touch(&dir.join("poses").join(format!("{view}_pose.txt")));
        }
        fs::create_dir_all(dir.join("user_input_points")).unwrap();
        for point in 0..points {
            touch(&dir.join("user_input_points").join(format!("{point}_point.txt")));
        }
        dir
    }

    #[test]
    fn object_dirs_are_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["pear", "banana", "mug"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        // Loose files are not objects
        touch(&tmp.path().join("notes.txt"));

        let dirs = object_dirs(tmp.path()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["banana", "mug", "pear"]);
    }

    #[test]
    fn missing_root_is_a_layout_error() {
        assert!(object_dirs(Path::new("/nonexistent/renderings")).is_err());
    }

    #[test]
    fn scan_truncates_views_and_points() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = make_object(tmp.path(), "banana", 4, 12);

        let limits = SweepLimits::default();
        let data = ObjectDataset::scan(&dir, &limits).unwrap();

        assert_eq!(data.name, "banana");
        assert_eq!(data.views.len(), 1);
        assert_eq!(data.views[0].index, 0);
        assert!(data.views[0]
            .depth_image
            .to_string_lossy()
            .ends_with("0_depth_raw.png"));
        assert!(data.views[0]
            .pose_path
            .to_string_lossy()
            .ends_with("poses/0_pose.txt"));
        assert_eq!(data.point_files.len(), 10);
    }

    #[test]
    fn scan_keeps_all_points_under_the_cap() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = make_object(tmp.path(), "mug", 1, 3);

        let data = ObjectDataset::scan(&dir, &SweepLimits::default()).unwrap();
        assert_eq!(data.point_files.len(), 3);
    }

    #[test]
    fn scan_requires_user_input_points_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("pear");
        touch(&dir.join("0_depth_raw.png"));

        assert!(ObjectDataset::scan(&dir, &SweepLimits::default()).is_err());
    }

    #[test]
    fn mask_path_follows_convention() {
        let path = mask_path(Path::new("data/renderings"), "banana", 0);
        assert_eq!(
            path,
            Path::new("data/renderings/../masks/banana_mask/0.png")
        );
    }

    #[test]
    fn suction_detection_uses_config_file_name() {
        assert!(uses_suction_gripper(Path::new(
            "cfg/examples/replication/dex-net_4.0_suction.yaml"
        )));
        assert!(uses_suction_gripper(Path::new("cfg/dex-net_3.0.yaml")));
        assert!(!uses_suction_gripper(Path::new("cfg/dex-net_4.0_pj.yaml")));
        // "suction" elsewhere in the path does not count
        assert!(!uses_suction_gripper(Path::new(
            "suction_study/dex-net_4.0_pj.yaml"
        )));
    }
}
