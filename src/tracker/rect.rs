use ndarray::Array2;

/// Box in frame pixels: top-left corner plus size.
///
/// Detectors report corners (x1, y1, x2, y2); [`Rect::from_tlbr`] converts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// From top-left corner and size.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// From corner coordinates.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Corners as `[x1, y1, x2, y2]`.
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// Centroid, used for zone lookup.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Pixel area; boxes with a negative side count as empty.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Area shared with `other`.
    pub fn intersection(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        w.max(0.0) * h.max(0.0)
    }

    /// Intersection over union, 0 when both boxes are empty.
    pub fn iou(&self, other: &Rect) -> f32 {
        let shared = self.intersection(other);
        let union = self.area() + other.area() - shared;
        if union > 0.0 { shared / union } else { 0.0 }
    }

    /// Integer pixel bounds `(x1, y1, x2, y2)` inside a `width` x `height`
    /// frame, or `None` when no pixel of the box is on screen.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
        let x1 = self.x.max(0.0).floor() as usize;
        let y1 = self.y.max(0.0).floor() as usize;
        let x2 = self.right().min(width as f32).ceil().max(0.0) as usize;
        let y2 = self.bottom().min(height as f32).ceil().max(0.0) as usize;
        (x2 > x1 && y2 > y1).then_some((x1, y1, x2, y2))
    }
}

/// Pairwise IoU, shaped `(a.len(), b.len())`.
pub fn iou_batch(a: &[Rect], b: &[Rect]) -> Array2<f32> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i].iou(&b[j]))
}
