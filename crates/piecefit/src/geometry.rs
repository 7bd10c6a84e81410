//! Axis-aligned pixel rectangles.
//!
//! `x + width` and `y + height` are exclusive endpoints everywhere in the
//! crate: a rectangle `(0, 0, 2, 2)` covers pixels `0..2` on both axes.

/// Integer bounding box in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Area shared with `other`; zero when the rectangles only touch.
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return 0;
        }
        (right - left) as u64 * (bottom - top) as u64
    }

    /// Smallest rectangle containing both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Euclidean distance between the nearest edges.
    ///
    /// The per-axis gap is zero when the projections overlap or touch.
    pub fn edge_distance(&self, other: &Rect) -> f64 {
        let dx = axis_gap(self.x, self.right(), other.x, other.right());
        let dy = axis_gap(self.y, self.bottom(), other.y, other.bottom());
        (dx as f64).hypot(dy as f64)
    }

    /// Geometric centre `[x + w/2, y + h/2]`.
    pub fn center(&self) -> [f64; 2] {
        [
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        ]
    }

    /// Every component divided by `factor` and floored.
    pub fn scaled_down(&self, factor: f64) -> Rect {
        let scale = |v: u32| (v as f64 / factor).floor().max(0.0) as u32;
        Rect::new(
            scale(self.x),
            scale(self.y),
            scale(self.width),
            scale(self.height),
        )
    }
}

fn axis_gap(a0: u32, a1: u32, b0: u32, b1: u32) -> u32 {
    if a1 < b0 {
        b0 - a1
    } else if b1 < a0 {
        a0 - b1
    } else {
        0
    }
}
