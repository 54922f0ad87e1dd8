#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed: a trigger element scrolled above or left of the
//! viewport has a negative origin, and placement math must see that rather
//! than a saturated zero.

use serde::{Deserialize, Serialize};

/// A rectangle in viewport coordinates (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width. Never negative.
    pub width: i32,
    /// Height. Never negative.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Move the rectangle by the given offsets.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Whether the rectangle lies entirely inside a viewport of `size`.
    #[inline]
    pub const fn fits_within(&self, size: Size) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= size.width && self.bottom() <= size.height
    }
}

/// A width/height pair (viewport dimensions, overlay extents).
///
/// Deserialization goes through [`Size::new`], so negative input clamps to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawSize")]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Deserialize)]
struct RawSize {
    width: i32,
    height: i32,
}

impl From<RawSize> for Size {
    fn from(raw: RawSize) -> Self {
        Self::new(raw.width, raw.height)
    }
}

impl Size {
    /// Create a new size. Negative components are clamped to zero.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}
