//! SVG charts for junction flows.
//!
//! Every renderer returns the SVG document as a `String`; [`save_svg`]
//! writes one to disk.

pub mod availability;
pub mod dependable;
pub mod palette;

use anyhow::Context;
use std::path::Path;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 1400,
            height: 700,
        }
    }
}

pub fn save_svg(path: &Path, svg: &str) -> anyhow::Result<()> {
    std::fs::write(path, svg).with_context(|| format!("writing chart {}", path.display()))?;
    log::info!("Wrote chart {}", path.display());
    Ok(())
}
