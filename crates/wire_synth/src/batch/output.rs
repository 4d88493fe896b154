//! Persistence of finished levels.
//!
//! Every level is written as a PNG raster plus a tab-separated wire log. File
//! names are derived from the wire count and the integer parts of the attribute
//! bounds, so re-running a configuration overwrites its previous outputs.
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::debug;

use crate::batch::LevelResult;
use crate::error::Result;

/// Columns of the wire log, tab-separated.
pub const WIRE_LOG_COLUMNS: [&str; 11] = [
    "Length", "Width", "x1", "y1", "x2", "y2", "mx", "my", "r", "alpha", "phi",
];

/// Header row of the wire log.
pub fn wire_log_header() -> String {
    WIRE_LOG_COLUMNS.join("\t")
}

/// Deterministic output names for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileNaming {
    pub min_length: i64,
    pub max_length: i64,
    pub min_width: i64,
    pub max_width: i64,
    pub size: u32,
}

impl FileNaming {
    /// Bounds are truncated to integers.
    pub fn new(
        (min_length, max_length): (f64, f64),
        (min_width, max_width): (f64, f64),
        size: u32,
    ) -> Self {
        Self {
            min_length: min_length as i64,
            max_length: max_length as i64,
            min_width: min_width as i64,
            max_width: max_width as i64,
            size,
        }
    }

    /// `wires_n-{n}_length-{minL}-{maxL}_width-{minW}-{maxW}_size-{S}`
    pub fn stem(&self, wire_count: usize) -> String {
        format!(
            "wires_n-{}_length-{}-{}_width-{}-{}_size-{}",
            wire_count, self.min_length, self.max_length, self.min_width, self.max_width, self.size
        )
    }

    pub fn image_name(&self, wire_count: usize) -> String {
        format!("{}.png", self.stem(wire_count))
    }

    pub fn log_name(&self, wire_count: usize) -> String {
        format!("{}_wire-information.txt", self.stem(wire_count))
    }
}

/// Destination for finished levels. Called concurrently from worker threads.
pub trait LevelSink: Sync {
    fn write_level(&self, result: &LevelResult) -> Result<()>;
}

/// Discards every level; useful for in-memory runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LevelSink for NullSink {
    #[inline]
    fn write_level(&self, _result: &LevelResult) -> Result<()> {
        Ok(())
    }
}

/// Writes levels as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
    naming: FileNaming,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, naming: FileNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn naming(&self) -> &FileNaming {
        &self.naming
    }

    pub fn image_path(&self, wire_count: usize) -> PathBuf {
        self.root.join(self.naming.image_name(wire_count))
    }

    pub fn log_path(&self, wire_count: usize) -> PathBuf {
        self.root.join(self.naming.log_name(wire_count))
    }
}

impl LevelSink for DirectorySink {
    fn write_level(&self, result: &LevelResult) -> Result<()> {
        let n = result.level.wire_count;
        fs::create_dir_all(&self.root)?;

        let image_path = self.image_path(n);
        result
            .canvas
            .to_gray_image()?
            .save_with_format(&image_path, ImageFormat::Png)?;

        let log_path = self.log_path(n);
        fs::write(&log_path, result.wire_log())?;

        debug!(
            "Wrote level {} to {} and {}.",
            result.level.index,
            image_path.display(),
            log_path.display()
        );
        Ok(())
    }
}
