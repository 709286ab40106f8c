//! Export module for writing synthesis results to disk.
//!
//! Covers the point-cloud table, the boundary index table, the labeled
//! scalar report, and a diagnostic plan-view map.

mod planview;
mod point_cloud;
mod report;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use planview::{write_planview, PlanViewError, PlanViewOptions};
pub use point_cloud::{write_index_table, write_point_cloud, PointCloudError};
pub use report::{write_report, ReportError};

/// Error raised by the pre-computation output check.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("output file already exists (pass --overwrite to replace): {0}")]
    AlreadyExists(PathBuf),
}

/// Verifies that none of the requested output paths exist yet.
///
/// Runs before any computation so a long run never fails at write time
/// and partial outputs are never left behind.
pub fn ensure_fresh(paths: &[&Path], overwrite: bool) -> Result<(), OutputError> {
    if overwrite {
        return Ok(());
    }
    for path in paths {
        if path.exists() {
            return Err(OutputError::AlreadyExists(path.to_path_buf()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_fresh() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("points.csv");
        std::fs::write(&existing, "x").unwrap();
        let missing = dir.path().join("new.csv");

        assert!(ensure_fresh(&[&missing], false).is_ok());
        assert!(matches!(
            ensure_fresh(&[&missing, &existing], false),
            Err(OutputError::AlreadyExists(_))
        ));
        assert!(ensure_fresh(&[&existing], true).is_ok());
    }
}
