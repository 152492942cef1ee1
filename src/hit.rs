//! Hit-testing: which element, and which part of it, lies under a point.
//!
//! Handles of the element that currently shows them win over bodies; bodies
//! are tested top-most first on the active page. All geometry here is in
//! document space, with handle radii kept screen-constant by dividing by zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{Element, ElementId, PlanStore};
use crate::geometry::rotate_point;

/// Which part of an element was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Handle order used by [`resize_handle_positions`].
    pub const ALL: [ResizeAnchor; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// CSS cursor name for this handle, ignoring rotation.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub element_id: ElementId,
    pub part: HitPart,
}

/// Document-space positions of the eight resize handles, in [`ResizeAnchor::ALL`] order.
#[must_use]
pub fn resize_handle_positions(el: &Element) -> [Point; 8] {
    let c = el.center();
    let size = el.display_size();
    let hw = size.width / 2.0;
    let hh = size.height / 2.0;
    let local = [
        Point::new(c.x, c.y - hh),
        Point::new(c.x + hw, c.y - hh),
        Point::new(c.x + hw, c.y),
        Point::new(c.x + hw, c.y + hh),
        Point::new(c.x, c.y + hh),
        Point::new(c.x - hw, c.y + hh),
        Point::new(c.x - hw, c.y),
        Point::new(c.x - hw, c.y - hh),
    ];
    local.map(|p| rotate_point(p, c, el.rotate))
}

/// Document-space position of the rotate handle, a fixed screen distance above the N edge.
#[must_use]
pub fn rotate_handle_position(el: &Element, zoom: f64) -> Point {
    let c = el.center();
    let top = c.y - el.display_size().height / 2.0 - ROTATE_HANDLE_OFFSET_PX / zoom;
    rotate_point(Point::new(c.x, top), c, el.rotate)
}

/// Whether `p` lies inside the element's rotated rectangle.
#[must_use]
pub fn contains_point(el: &Element, p: Point) -> bool {
    let local = rotate_point(p, el.center(), -el.rotate);
    el.bounds().contains(local)
}

fn near(a: Point, b: Point, radius: f64) -> bool {
    (a.x - b.x).hypot(a.y - b.y) <= radius
}

/// Test which element (if any) is under `doc_pt` on `page`.
///
/// `handles_for` names the element currently showing handles; its handles
/// are only considered if it is a movable footprint owner on `page`.
#[must_use]
pub fn hit_test(
    doc_pt: Point,
    store: &PlanStore,
    page: u32,
    zoom: f64,
    handles_for: Option<ElementId>,
) -> Option<Hit> {
    let radius = HANDLE_RADIUS_PX / zoom;

    if let Some(owner) = handles_for
        .and_then(|id| store.get(&id))
        .filter(|el| el.page == page && el.movable && el.has_footprint())
    {
        if near(doc_pt, rotate_handle_position(owner, zoom), radius) {
            return Some(Hit { element_id: owner.id, part: HitPart::RotateHandle });
        }
        for (anchor, pos) in ResizeAnchor::ALL.iter().zip(resize_handle_positions(owner)) {
            if near(doc_pt, pos, radius) {
                return Some(Hit { element_id: owner.id, part: HitPart::ResizeHandle(*anchor) });
            }
        }
    }

    store
        .on_page(page)
        .rev()
        .find(|el| contains_point(el, doc_pt))
        .map(|el| Hit { element_id: el.id, part: HitPart::Body })
}
