//! Raster canvas for rendered wires.
//!
//! A [`Canvas`] is a square 8-bit single-channel bitmap. Wires are drawn onto it
//! additively with [`draw_wire`]: pixels are only ever set to [`FOREGROUND`],
//! never cleared.
use glam::IVec2;
use image::GrayImage;

use crate::error::{Error, Result};

mod draw;

pub use draw::{draw_line, draw_wire, stroke_width};

/// Background intensity.
pub const BACKGROUND: u8 = 0;
/// Foreground intensity used for every wire.
pub const FOREGROUND: u8 = u8::MAX;

/// Square bitmap, row-major, `size * size` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a blank canvas of `size x size` pixels.
    pub fn new(size: u32) -> Self {
        let len = (size as usize) * (size as usize);
        Self {
            size,
            data: vec![BACKGROUND; len],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn index(&self, p: IVec2) -> Option<usize> {
        let s = self.size as i64;
        let (x, y) = (p.x as i64, p.y as i64);
        if x < 0 || y < 0 || x >= s || y >= s {
            return None;
        }
        Some((y as usize) * (self.size as usize) + (x as usize))
    }

    /// Get the intensity at `(x, y)`, returning the background outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        self.index(IVec2::new(x, y))
            .map_or(BACKGROUND, |i| self.data[i])
    }

    pub fn is_foreground(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == FOREGROUND
    }

    /// Set a pixel to the foreground. Points outside the canvas are clipped.
    #[inline]
    pub(crate) fn plot(&mut self, p: IVec2) {
        if let Some(i) = self.index(p) {
            self.data[i] = FOREGROUND;
        }
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|v| **v == FOREGROUND).count()
    }

    /// Fraction of foreground pixels.
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.foreground_count() as f64 / self.data.len() as f64
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Convert into an [`image::GrayImage`] for encoding.
    pub fn into_gray_image(self) -> Result<GrayImage> {
        let size = self.size;
        GrayImage::from_raw(size, size, self.data)
            .ok_or_else(|| Error::Other(format!("canvas buffer does not match {size}x{size}")))
    }

    pub fn to_gray_image(&self) -> Result<GrayImage> {
        self.clone().into_gray_image()
    }
}
