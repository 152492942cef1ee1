//! Shared numeric constants for the layout engine.

// ── Geometry ────────────────────────────────────────────────────

/// Minimum width/height, in document units, of any rectangular geometry.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// A drawing gesture smaller than this on either axis is discarded.
pub const MIN_DRAW_SIZE: f64 = 5.0;

/// Angles closer than this (degrees) to a multiple of 90° count as cardinal.
pub const CARDINAL_EPSILON_DEG: f64 = 1e-6;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

// ── Labels ──────────────────────────────────────────────────────

/// Padding added around an owner's rotated bounds to form its forbidden zone.
pub const SELECTION_PADDING: f64 = 6.0;

/// Fraction of a top label's height that sits outside the forbidden zone.
pub const LABEL_TOP_OUTER_WEIGHT: f64 = 0.8;

/// Bottom labels: share of the half-height pulled back into the forbidden zone.
pub const LABEL_BOTTOM_INNER_WEIGHT: f64 = 0.7;

/// Bottom labels: half-height factor the inner weight is applied to.
pub const LABEL_BOTTOM_HALF: f64 = 0.5;

/// Average glyph advance as a fraction of the font size, for label size estimates.
pub const LABEL_CHAR_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LABEL_LINE_HEIGHT_RATIO: f64 = 1.2;

// ── Walls ───────────────────────────────────────────────────────

/// Rendered stroke thickness of an inner wall, in document units.
pub const INNER_WALL_THICKNESS: f64 = 10.0;

/// Rendered stroke thickness of an outer wall, in document units.
pub const OUTER_WALL_THICKNESS: f64 = 20.0;
