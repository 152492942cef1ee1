//! Resize and rotate sessions for footprint owners.
//!
//! Both sessions recompute from the state captured at press time plus the
//! total pointer travel, so intermediate pointer events never accumulate
//! rounding drift. They apply only to movable walls, windows, doors and
//! shapes; symbols and images have no handles.

#[cfg(test)]
#[path = "handles_test.rs"]
mod handles_test;

use crate::camera::Point;
use crate::consts::MIN_ELEMENT_SIZE;
use crate::doc::{ElementId, PlanStore};
use crate::geometry::{Footprint, normalize_degrees};
use crate::hit::ResizeAnchor;

/// New footprint after dragging `anchor` by `(dx, dy)` document units.
///
/// Width and height are floored to the minimum size; when an axis hits the
/// floor its origin stays where it was.
#[must_use]
pub fn resize_footprint(anchor: ResizeAnchor, orig: &Footprint, dx: f64, dy: f64) -> Footprint {
    use ResizeAnchor::{E, N, Ne, Nw, S, Se, Sw, W};

    let mut out = *orig;

    match anchor {
        E | Ne | Se => out.width = orig.width + dx,
        W | Nw | Sw => {
            out.width = orig.width - dx;
            out.x = orig.x + dx;
        }
        N | S => {}
    }
    match anchor {
        S | Se | Sw => out.height = orig.height + dy,
        N | Ne | Nw => {
            out.height = orig.height - dy;
            out.y = orig.y + dy;
        }
        E | W => {}
    }

    if out.width.is_nan() || out.width < MIN_ELEMENT_SIZE {
        out.width = MIN_ELEMENT_SIZE;
        out.x = orig.x;
    }
    if out.height.is_nan() || out.height < MIN_ELEMENT_SIZE {
        out.height = MIN_ELEMENT_SIZE;
        out.y = orig.y;
    }
    out
}

/// Angle of `p` around `center` in degrees: 0° along +x, clockwise on
/// screen since y points down.
#[must_use]
pub fn pointer_angle(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}

/// One resize gesture on a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub id: ElementId,
    pub anchor: ResizeAnchor,
    /// Document-space pointer position at press time.
    pub start: Point,
    /// Footprint at press time.
    pub orig: Footprint,
}

impl ResizeSession {
    /// Start resizing `id`. `None` for missing, immovable, or footprint-less elements.
    #[must_use]
    pub fn begin(store: &PlanStore, id: ElementId, anchor: ResizeAnchor, pointer: Point) -> Option<Self> {
        let el = store.get(&id).filter(|el| el.movable)?;
        let orig = *el.footprint()?;
        Some(Self { id, anchor, start: pointer, orig })
    }

    /// Apply the pointer's total travel. Returns false if the element is gone.
    pub fn update(&self, store: &mut PlanStore, pointer: Point) -> bool {
        let Some(el) = store.get_mut(&self.id) else {
            return false;
        };
        let delta = pointer - self.start;
        el.set_footprint(resize_footprint(self.anchor, &self.orig, delta.x, delta.y));
        true
    }

    /// Whether the element's footprint differs from the one at press time.
    #[must_use]
    pub fn changed(&self, store: &PlanStore) -> bool {
        store.get(&self.id).and_then(|el| el.footprint()).is_some_and(|f| *f != self.orig)
    }
}

/// One rotate gesture on a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateSession {
    pub id: ElementId,
    /// Rotation pivot: the element center at press time.
    pub center: Point,
    /// Pointer angle around the pivot at press time, in degrees.
    pub start_angle: f64,
    /// Element rotation at press time.
    pub start_rotation: f64,
}

impl RotateSession {
    /// Start rotating `id`. `None` for missing, immovable, or footprint-less elements.
    #[must_use]
    pub fn begin(store: &PlanStore, id: ElementId, pointer: Point) -> Option<Self> {
        let el = store.get(&id).filter(|el| el.movable && el.has_footprint())?;
        let center = el.center();
        Some(Self { id, center, start_angle: pointer_angle(center, pointer), start_rotation: el.rotate })
    }

    /// Rotation the element should have with the pointer at `pointer`.
    #[must_use]
    pub fn rotation_at(&self, pointer: Point) -> f64 {
        normalize_degrees(self.start_rotation + pointer_angle(self.center, pointer) - self.start_angle)
    }

    /// Rotate to follow the pointer. Returns false if the element is gone.
    pub fn update(&self, store: &mut PlanStore, pointer: Point) -> bool {
        let rotation = self.rotation_at(pointer);
        let Some(el) = store.get_mut(&self.id) else {
            return false;
        };
        el.set_rotation(rotation);
        true
    }

    #[must_use]
    pub fn changed(&self, store: &PlanStore) -> bool {
        store.get(&self.id).is_some_and(|el| el.rotate != self.start_rotation)
    }
}
