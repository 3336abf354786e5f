//! Presentation seam: where a finished canvas leaves the core.
//!
//! The interpreter never opens windows or files itself; it hands the final
//! canvas to a [`Present`] implementation chosen by the caller.

use crate::canvas::Canvas;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Receives the finished canvas of a successful run.
pub trait Present {
    fn present(&mut self, canvas: &Canvas) -> Result<(), PresentError>;
}

/// Writes the canvas to a PNG file.
#[derive(Debug, Clone)]
pub struct PngExport {
    path: PathBuf,
}

impl PngExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Present for PngExport {
    fn present(&mut self, canvas: &Canvas) -> Result<(), PresentError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        canvas
            .read_pixels()
            .save_with_format(&self.path, ImageFormat::Png)?;
        let (w, h) = canvas.size();
        log::info!("wrote {w}x{h} canvas to {}", self.path.display());
        Ok(())
    }
}
