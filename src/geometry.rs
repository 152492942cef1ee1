//! Geometry primitives: rectangles, angles, and the rectangular plan shapes.
//!
//! Walls, windows, doors and freeform shapes all share a [`Footprint`]: an
//! axis-aligned rectangle in document space (top-left origin) plus the page it
//! sits on and a clockwise rotation about its center. The kind-specific parts
//! are the wall type and the shape fill.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{INNER_WALL_THICKNESS, MIN_ELEMENT_SIZE, OUTER_WALL_THICKNESS};

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Non-finite input maps to `0`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.
    if r >= 360.0 { 0.0 } else { r }
}

/// Rotate `p` clockwise (screen coordinates, y down) by `deg` around `center`.
#[must_use]
pub fn rotate_point(p: Point, center: Point, deg: f64) -> Point {
    let (sin, cos) = deg.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle stored by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { left: a.x.min(b.x), top: a.y.min(b.y), right: a.x.max(b.x), bottom: a.y.max(b.y) }
    }

    #[must_use]
    pub fn from_center(center: Point, size: Size) -> Self {
        let hw = size.width / 2.0;
        let hh = size.height / 2.0;
        Self { left: center.x - hw, top: center.y - hh, right: center.x + hw, bottom: center.y + hh }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Grow every edge outward by `pad`.
    #[must_use]
    pub fn expand(&self, pad: f64) -> Rect {
        Rect::new(self.left - pad, self.top - pad, self.right + pad, self.bottom + pad)
    }

    /// Overlap of two rectangles, or `None` if it has no area.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (r.width() > 0.0 && r.height() > 0.0).then_some(r)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Axis-aligned bounds of this rectangle after rotating it by `deg` around its center.
    #[must_use]
    pub fn rotated_bounds(&self, deg: f64) -> Rect {
        let (sin, cos) = deg.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let w = self.width() * cos + self.height() * sin;
        let h = self.width() * sin + self.height() * cos;
        Rect::from_center(self.center(), Size::new(w, h))
    }
}

/// Shared placement of every rectangular plan shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Left edge in document space.
    pub x: f64,
    /// Top edge in document space.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 1-based page number.
    pub page: u32,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub rotate: f64,
}

impl Footprint {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, page: u32) -> Self {
        Self { x, y, width, height, page, rotate: 0.0 }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Move so the rectangle's center lands on `center`, keeping its size.
    pub fn set_center(&mut self, center: Point) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    /// Raise width and height to the minimum size, keeping the origin.
    pub fn floor_size(&mut self) {
        self.width = self.width.max(MIN_ELEMENT_SIZE);
        self.height = self.height.max(MIN_ELEMENT_SIZE);
    }
}

/// Wall construction; determines stroke thickness and fill pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Inner,
    Outer,
}

impl WallType {
    #[must_use]
    pub fn thickness(self) -> f64 {
        match self {
            Self::Inner => INNER_WALL_THICKNESS,
            Self::Outer => OUTER_WALL_THICKNESS,
        }
    }

    /// Name of the fill pattern the render surface should use.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Inner => "hatch-light",
            Self::Outer => "hatch-dense",
        }
    }
}

/// Fill of a freeform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    White,
    Black,
    Gray,
    Darkgray,
}

impl ShapeType {
    /// CSS fill color for this shape type.
    #[must_use]
    pub fn fill(self) -> &'static str {
        match self {
            Self::White => "#FFFFFF",
            Self::Black => "#000000",
            Self::Gray => "#BFBFBF",
            Self::Darkgray => "#7F7F7F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub footprint: Footprint,
    pub wall_type: WallType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub footprint: Footprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub footprint: Footprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeformShape {
    pub footprint: Footprint,
    pub shape_type: ShapeType,
}
