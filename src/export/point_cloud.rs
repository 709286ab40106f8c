//! Point-cloud and boundary-index table writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use thiserror::Error;

use crate::boundary::BoundaryIndexTable;

/// Errors that can occur while writing point-cloud output.
#[derive(Error, Debug)]
pub enum PointCloudError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty point cloud")]
    Empty,
}

/// Writes the assembled point cloud as an `X,Y,Z` table.
///
/// One header row, then every point in assembly order: the cross-section
/// block (lateral index outer, station inner, so the first point lands on
/// row 2), followed by the six floodplain/boundary row blocks.
pub fn write_point_cloud(points: &[DVec3], path: &Path) -> Result<(), PointCloudError> {
    if points.is_empty() {
        return Err(PointCloudError::Empty);
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "X,Y,Z")?;
    for p in points {
        writeln!(writer, "{:.6},{:.6},{:.6}", p.x, p.y, p.z)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the 17-entry boundary index table as `entry,row` lines.
pub fn write_index_table(table: &BoundaryIndexTable, path: &Path) -> Result<(), PointCloudError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "entry,row")?;
    for (label, value) in table.rows() {
        writeln!(writer, "{},{}", label, value)?;
    }

    writer.flush()?;
    Ok(())
}
