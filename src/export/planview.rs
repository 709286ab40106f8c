//! Diagnostic plan-view map export.
//!
//! Rasterizes the assembled point cloud into a grayscale image, elevation
//! mapped to intensity. Meant for quick visual inspection of the channel
//! and floodplain footprint, not for downstream processing.

use std::path::Path;

use glam::DVec3;
use image::{ImageBuffer, Luma};
use thiserror::Error;

/// Errors that can occur during plan-view export.
#[derive(Error, Debug)]
pub enum PlanViewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("empty point cloud")]
    Empty,
}

/// Options for plan-view export.
#[derive(Debug, Clone)]
pub struct PlanViewOptions {
    /// Image width in pixels; height follows the footprint aspect ratio.
    pub width: u32,
    /// Dot radius in pixels.
    pub radius: u32,
}

impl Default for PlanViewOptions {
    fn default() -> Self {
        Self { width: 1024, radius: 1 }
    }
}

/// Renders the point cloud footprint to an 8-bit grayscale PNG.
pub fn write_planview(
    points: &[DVec3],
    path: &Path,
    options: &PlanViewOptions,
) -> Result<(), PlanViewError> {
    if points.is_empty() {
        return Err(PlanViewError::Empty);
    }

    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    let span_x = (max.x - min.x).max(1e-9);
    let span_y = (max.y - min.y).max(1e-9);
    let span_z = (max.z - min.z).max(1e-9);

    let width = options.width.max(2);
    let height = ((width as f64 * span_y / span_x).ceil() as u32).clamp(2, 8192);

    let mut img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    let r = options.radius as i64;
    for p in points {
        let px = ((p.x - min.x) / span_x * (width - 1) as f64).round() as i64;
        // Image rows grow downward; valley y grows left-to-right looking
        // downstream.
        let py = ((max.y - p.y) / span_y * (height - 1) as f64).round() as i64;
        let value = 55 + (((p.z - min.z) / span_z) * 200.0) as u8;

        for dy in -r..=r {
            for dx in -r..=r {
                let (x, y) = (px + dx, py + dy);
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    img.put_pixel(x as u32, y as u32, Luma([value]));
                }
            }
        }
    }

    img.save(path)?;
    Ok(())
}
