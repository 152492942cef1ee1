//! Selection set and the group-drag controller.
//!
//! A group drag is driven through one reference element, the one under the
//! pointer at press time. The halo records how far the other selected
//! movable elements' centers reach beyond the reference center on each side;
//! clamping the reference target by the halo keeps the whole group inside
//! the visible document area without disturbing relative layout.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::camera::Point;
use crate::doc::{ElementId, PlanStore};
use crate::geometry::Rect;

/// Ordered set of selected element ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `id`.
    pub fn select(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add `id` if absent.
    pub fn add(&mut self, id: ElementId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Flip membership of `id`. The last remaining selected id is never removed.
    pub fn toggle(&mut self, id: ElementId) {
        if !self.contains(&id) {
            self.ids.push(id);
        } else if self.ids.len() > 1 {
            self.ids.retain(|other| *other != id);
        }
    }

    pub fn remove(&mut self, id: &ElementId) {
        self.ids.retain(|other| other != id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer satisfy `keep`.
    pub fn retain<F: FnMut(&ElementId) -> bool>(&mut self, keep: F) {
        self.ids.retain(keep);
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// The selected id when exactly one element is selected.
    #[must_use]
    pub fn sole(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Reach of a selection's centers beyond the reference center, per side.
/// All distances are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Halo {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Halo {
    /// Halo of `centers` around `reference`. The reference itself contributes zero.
    pub fn around<I: IntoIterator<Item = Point>>(reference: Point, centers: I) -> Halo {
        let mut halo = Halo::default();
        for c in centers {
            halo.left = halo.left.max(reference.x - c.x);
            halo.right = halo.right.max(c.x - reference.x);
            halo.top = halo.top.max(reference.y - c.y);
            halo.bottom = halo.bottom.max(c.y - reference.y);
        }
        halo
    }

    /// Clamp a reference-center target so the halo stays inside `bounds`.
    ///
    /// When the halo is wider or taller than `bounds`, the left/top edge wins.
    #[must_use]
    pub fn clamp(&self, target: Point, bounds: Rect) -> Point {
        let x = target.x.min(bounds.right - self.right).max(bounds.left + self.left);
        let y = target.y.min(bounds.bottom - self.bottom).max(bounds.top + self.top);
        Point::new(x, y)
    }
}

/// State of one group drag, from press to release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    reference: ElementId,
    /// Reference center minus pointer at press time.
    grab_offset: Point,
    press: Point,
    halo: Halo,
    /// Selected movable elements at press time, reference included.
    members: Vec<ElementId>,
    total: Point,
}

impl DragSession {
    /// Start a drag through `reference`.
    ///
    /// Returns `None` if the reference is missing, immovable, or not selected.
    #[must_use]
    pub fn begin(store: &PlanStore, selection: &Selection, reference: ElementId, pointer: Point) -> Option<Self> {
        if !selection.contains(&reference) {
            return None;
        }
        let anchor = store.get(&reference).filter(|el| el.movable)?;
        let anchor_center = anchor.center();

        let members: Vec<ElementId> = selection
            .ids()
            .iter()
            .filter(|id| store.get(id).is_some_and(|el| el.movable))
            .copied()
            .collect();
        let halo = Halo::around(anchor_center, members.iter().filter_map(|id| store.get(id)).map(|el| el.center()));

        Some(Self {
            reference,
            grab_offset: anchor_center - pointer,
            press: pointer,
            halo,
            members,
            total: Point::default(),
        })
    }

    #[must_use]
    pub fn reference(&self) -> ElementId {
        self.reference
    }

    #[must_use]
    pub fn halo(&self) -> Halo {
        self.halo
    }

    #[must_use]
    pub fn members(&self) -> &[ElementId] {
        &self.members
    }

    /// Net shift since the session began.
    #[must_use]
    pub fn total_shift(&self) -> Point {
        self.total
    }

    /// Whether the group ended up somewhere other than where it started.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.total.x != 0.0 || self.total.y != 0.0
    }

    /// Follow the pointer, clamped to `view_box`, and shift every member by
    /// the same amount. Returns the shift applied by this step.
    ///
    /// Back at the press point the group returns to where it started, even
    /// outside `view_box`. Members that vanished mid-session are skipped; if
    /// the reference itself is gone the step is a no-op.
    pub fn update(&mut self, store: &mut PlanStore, pointer: Point, view_box: Rect) -> Point {
        let Some(current) = store.get(&self.reference).map(crate::doc::Element::center) else {
            return Point::default();
        };
        let unclamped = pointer + self.grab_offset;
        let target = if pointer == self.press { unclamped } else { self.halo.clamp(unclamped, view_box) };
        let shift = target - current;
        if shift.x == 0.0 && shift.y == 0.0 {
            return shift;
        }
        for id in &self.members {
            if let Some(el) = store.get_mut(id) {
                el.translate(shift);
            }
        }
        self.total = self.total + shift;
        shift
    }
}
