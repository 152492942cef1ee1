//! Transform engine: view space ↔ document space under zoom and scroll.
//!
//! View space is the scrollable, zoomable viewport in CSS pixels. Document
//! space is the fixed page coordinate system. The document is drawn `padding`
//! pixels in from the top-left of the scroll area, so:
//!
//! ```text
//! doc  = (view + scroll - padding) / zoom
//! view = doc * zoom - scroll + padding
//! ```
//!
//! The free functions are pure; [`Camera`] bundles the current parameters.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

use crate::geometry::Rect;

/// A point in either view or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Convert a view-space coordinate pair into document space.
#[must_use]
pub fn to_document_space(view: Point, zoom: f64, scroll: Point, padding: f64) -> Point {
    Point {
        x: (view.x + scroll.x - padding) / zoom,
        y: (view.y + scroll.y - padding) / zoom,
    }
}

/// Convert a document-space coordinate pair into view space.
#[must_use]
pub fn to_view_space(doc: Point, zoom: f64, scroll: Point, padding: f64) -> Point {
    Point {
        x: doc.x * zoom - scroll.x + padding,
        y: doc.y * zoom - scroll.y + padding,
    }
}

/// Scroll offset that renders `doc` at `view` under `zoom`.
///
/// Used for zoom-under-cursor: after changing zoom, scrolling to this offset
/// keeps the document point under the pointer stationary.
#[must_use]
pub fn scroll_to_keep_point(view: Point, doc: Point, zoom: f64, padding: f64) -> Point {
    Point {
        x: doc.x * zoom + padding - view.x,
        y: doc.y * zoom + padding - view.y,
    }
}

/// Viewport state for the scrollable, zoomable plan view.
///
/// `scroll_x` / `scroll_y` and the viewport size are in CSS pixels.
/// `zoom` is a scale factor (1.0 = one document unit per pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub zoom: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub padding: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { zoom: 1.0, scroll_x: 0.0, scroll_y: 0.0, padding: 0.0, viewport_width: 0.0, viewport_height: 0.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn scroll(&self) -> Point {
        Point::new(self.scroll_x, self.scroll_y)
    }

    /// Convert a view-space point to document coordinates.
    #[must_use]
    pub fn view_to_doc(&self, view: Point) -> Point {
        to_document_space(view, self.zoom, self.scroll(), self.padding)
    }

    /// Convert a document-space point to view coordinates.
    #[must_use]
    pub fn doc_to_view(&self, doc: Point) -> Point {
        to_view_space(doc, self.zoom, self.scroll(), self.padding)
    }

    /// Convert a view-space distance (pixels) to document units.
    #[must_use]
    pub fn view_dist_to_doc(&self, view_dist: f64) -> f64 {
        view_dist / self.zoom
    }

    /// Change zoom while keeping the document point under `anchor_view` fixed.
    ///
    /// `zoom` must already be clamped by the caller. Scroll offsets are not
    /// clamped to be non-negative; the host's scroll container does that.
    pub fn zoom_at(&mut self, anchor_view: Point, zoom: f64) {
        let anchor_doc = self.view_to_doc(anchor_view);
        self.zoom = zoom;
        let scroll = scroll_to_keep_point(anchor_view, anchor_doc, zoom, self.padding);
        self.scroll_x = scroll.x;
        self.scroll_y = scroll.y;
    }

    /// The document-space rectangle currently visible in the viewport.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        let tl = self.view_to_doc(Point::new(0.0, 0.0));
        let br = self.view_to_doc(Point::new(self.viewport_width, self.viewport_height));
        Rect::from_corners(tl, br)
    }

    /// The region a drag may occupy: the visible rectangle intersected with
    /// the page extent. Falls back to the page when nothing overlaps (e.g.
    /// before the host reports a viewport size).
    #[must_use]
    pub fn view_box(&self, document: Rect) -> Rect {
        self.visible_rect().intersect(&document).unwrap_or(document)
    }
}
