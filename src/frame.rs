//! Camera frame container handed to collaborators.

use ndarray::{Array3, ArrayView3, s};

use crate::tracker::Rect;

/// One captured frame as an `H x W x C` pixel array.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: Array3<u8>,
}

impl Frame {
    /// Wrap an `H x W x C` pixel array.
    pub fn new(pixels: Array3<u8>) -> Self {
        Self { pixels }
    }

    /// All-black three channel frame, mostly useful in tests.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: Array3::zeros((height as usize, width as usize, 3)),
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    /// Read-only view of the pixels.
    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Region under `rect`, clamped to the frame. `None` if the box lies
    /// outside the frame or is empty.
    pub fn crop(&self, rect: &Rect) -> Option<ArrayView3<'_, u8>> {
        let (x1, y1, x2, y2) = rect.clamp_to(self.width(), self.height())?;
        Some(self.pixels.slice(s![y1..y2, x1..x2, ..]))
    }

    /// Fraction of the frame covered by `rect`.
    pub fn area_fraction(&self, rect: &Rect) -> f32 {
        let total = self.width() as f32 * self.height() as f32;
        if total > 0.0 { rect.area() / total } else { 0.0 }
    }
}
