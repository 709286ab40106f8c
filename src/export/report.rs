//! Labeled scalar report writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::stats::ValleyStats;

/// Errors that can occur while writing the scalar report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the report body.
pub fn format_report(stats: &ValleyStats) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line("Synthetic valley summary".to_string());
    line("========================".to_string());
    line(format!(
        "Bankfull width:  mean = {:.4}  sd = {:.4}  cv = {:.4}",
        stats.width.mean, stats.width.sd, stats.width.cv
    ));
    line(format!(
        "Bankfull depth:  mean = {:.4}  sd = {:.4}  cv = {:.4}",
        stats.depth.mean, stats.depth.sd, stats.depth.cv
    ));
    line(format!("wr   = {:.4}", stats.reach_width));
    line(format!("wp   = {:.4}", stats.wetted_perimeter));
    line(format!("hres = {:.4}", stats.hydraulic_radius));
    line(format!("hr   = {:.4}", stats.bankfull_depth));
    line(format!(
        "Width x depth covariance:     negative = {:.1}%  positive = {:.1}%",
        stats.width_depth.negative_pct, stats.width_depth.positive_pct
    ));
    line(format!(
        "Alignment x depth covariance: negative = {:.1}%  positive = {:.1}%",
        stats.alignment_depth.negative_pct, stats.alignment_depth.positive_pct
    ));
    line(format!("Sinuosity     = {:.6}", stats.sinuosity));
    line(format!("Channel slope = {:.6}", stats.channel_slope));
    line(format!(
        "Channel elevation intercept = {:.4}",
        stats.channel_intercept
    ));

    out
}

/// Writes the labeled scalar report.
pub fn write_report(stats: &ValleyStats, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(format_report(stats).as_bytes())?;
    writer.flush()?;
    Ok(())
}
