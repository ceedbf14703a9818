use std::fmt;

use crate::tracker::Rect;

/// Column of the 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

impl Horizontal {
    fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Row of the 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Middle,
    Bottom,
}

impl Vertical {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

/// One cell of the 3x3 grid over the frame, picked by the box centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionZone {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

impl PositionZone {
    /// Zone of `rect` in a `width` x `height` frame.
    ///
    /// With `mirror` set, left and right are swapped for selfie-style cameras.
    pub fn of(rect: &Rect, width: u32, height: u32, mirror: bool) -> Self {
        let (cx, cy) = rect.center();
        let (w, h) = (width as f32, height as f32);

        let horizontal = if cx < w / 3.0 {
            Horizontal::Left
        } else if cx < 2.0 * w / 3.0 {
            Horizontal::Center
        } else {
            Horizontal::Right
        };
        let vertical = if cy < h / 3.0 {
            Vertical::Top
        } else if cy < 2.0 * h / 3.0 {
            Vertical::Middle
        } else {
            Vertical::Bottom
        };

        Self {
            horizontal: if mirror { horizontal.mirrored() } else { horizontal },
            vertical,
        }
    }
}

/// Spoken name: "center", "left", "top", "bottom-right", ...
impl fmt::Display for PositionZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.vertical, self.horizontal) {
            (Vertical::Middle, Horizontal::Center) => f.write_str("center"),
            (Vertical::Middle, h) => f.write_str(h.as_str()),
            (v, Horizontal::Center) => f.write_str(v.as_str()),
            (v, h) => write!(f, "{}-{}", v.as_str(), h.as_str()),
        }
    }
}
