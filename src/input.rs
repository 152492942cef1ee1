//! Input model: drawing modes, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `DrawingMode` and `Modifiers` capture the user's intent at the time of a
//! pointer event. `InputState` is the active gesture between pointer-down and
//! pointer-up; each active variant owns its session, so ending a gesture is
//! just a transition back to `Idle` and nothing outlives it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{MIN_DRAW_SIZE, MIN_ELEMENT_SIZE};
use crate::doc::Element;
use crate::geometry::{Footprint, Rect, ShapeType, WallType};
use crate::handles::{ResizeSession, RotateSession};
use crate::selection::DragSession;

/// Which kind of element a press-drag-release on empty canvas creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingMode {
    Wall(WallType),
    Window,
    Door,
    Shape(ShapeType),
}

impl DrawingMode {
    /// Build the element this mode draws for the gesture from `anchor` to `current`.
    ///
    /// Returns `None` when the gesture is smaller than the drawing threshold on
    /// either axis. Otherwise the rectangle is floored to the minimum size.
    #[must_use]
    pub fn build(self, anchor: Point, current: Point, page: u32) -> Option<Element> {
        let rect = Rect::from_corners(anchor, current);
        if !(rect.width() >= MIN_DRAW_SIZE && rect.height() >= MIN_DRAW_SIZE) {
            return None;
        }
        let mut footprint = Footprint::new(rect.left, rect.top, rect.width(), rect.height(), page);
        footprint.width = footprint.width.max(MIN_ELEMENT_SIZE);
        footprint.height = footprint.height.max(MIN_ELEMENT_SIZE);
        Some(match self {
            Self::Wall(t) => Element::wall(footprint, t),
            Self::Window => Element::window(footprint),
            Self::Door => Element::door(footprint),
            Self::Shape(t) => Element::shape(footprint, t),
        })
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl or meta: zoom on wheel, toggle on click.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Active drawing mode; `None` means pointer/selection behavior.
    pub drawing: Option<DrawingMode>,
    /// Rubber-band rectangle of an in-progress drawing gesture, in document space.
    pub preview: Option<Rect>,
}

/// The gesture state machine.
///
/// `Idle → Dragging | Resizing | Rotating | Drawing → Idle`. Only one gesture
/// can be active; a new press while one is active is ignored.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving the selection through a reference element.
    Dragging(DragSession),
    /// Dragging one of the eight resize handles.
    Resizing(ResizeSession),
    /// Dragging the rotate handle.
    Rotating(RotateSession),
    /// Rubber-banding a new element in the active drawing mode.
    Drawing {
        mode: DrawingMode,
        /// Document-space press position.
        anchor: Point,
        /// Latest document-space pointer position.
        current: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "dragging",
            Self::Resizing(_) => "resizing",
            Self::Rotating(_) => "rotating",
            Self::Drawing { .. } => "drawing",
        }
    }
}
