//! Address labels and their placement around an owner element.
//!
//! A label is placed outside its owner's "forbidden zone": the owner's
//! rotated bounding box grown by [`SELECTION_PADDING`]. Left/right labels are
//! centered beside the zone; top/bottom labels overlap the zone edge by a
//! weighted fraction of their height, bottom labels sitting closer to the
//! owner than top labels to mirror the print layout.
//!
//! When the owner turns by a multiple of 90° the location can follow it
//! around the cycle `top → right → bottom → left`.

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{
    CARDINAL_EPSILON_DEG, LABEL_BOTTOM_HALF, LABEL_BOTTOM_INNER_WEIGHT, LABEL_CHAR_WIDTH_RATIO,
    LABEL_LINE_HEIGHT_RATIO, LABEL_TOP_OUTER_WEIGHT, SELECTION_PADDING,
};
use crate::doc::Element;
use crate::geometry::{Rect, Size};

/// Where the label text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Text mirrors the referenced schema symbol's address.
    #[default]
    Auto,
    /// Text is user-entered.
    Manual,
}

/// Side of the owner the label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocation {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl LabelLocation {
    /// Clockwise order used when a label follows its owner's rotation.
    pub const CYCLE: [LabelLocation; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    fn cycle_index(self) -> i64 {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// Location after the owner turns by `degrees`: `round(degrees / 90)` steps
    /// along [`LabelLocation::CYCLE`], modulo 4. Negative turns step backwards.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rotated_by(self, degrees: f64) -> LabelLocation {
        if !degrees.is_finite() {
            return self;
        }
        let steps = (degrees / 90.0).round() as i64;
        let idx = (self.cycle_index() + steps).rem_euclid(4);
        Self::CYCLE[usize::try_from(idx).unwrap_or(0)]
    }
}

/// Whether `degrees` is (numerically) a multiple of 90°.
#[must_use]
pub fn is_cardinal(degrees: f64) -> bool {
    let quarters = degrees / 90.0;
    ((quarters - quarters.round()) * 90.0).abs() < CARDINAL_EPSILON_DEG
}

/// Address label attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub address_text: String,
    pub address_type: AddressType,
    pub address_location: LabelLocation,
    pub font_size: f64,
}

impl Label {
    /// A label whose text is filled from the schema on each redraw.
    #[must_use]
    pub fn auto(font_size: f64) -> Self {
        Self {
            address_text: String::new(),
            address_type: AddressType::Auto,
            address_location: LabelLocation::default(),
            font_size,
        }
    }

    /// A label with fixed, user-supplied text.
    #[must_use]
    pub fn manual(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            address_text: text.into(),
            address_type: AddressType::Manual,
            address_location: LabelLocation::default(),
            font_size,
        }
    }

    #[must_use]
    pub fn at(mut self, location: LabelLocation) -> Self {
        self.address_location = location;
        self
    }
}

/// The owner's rotated bounds grown by the selection padding.
#[must_use]
pub fn forbidden_zone(owner: &Element) -> Rect {
    owner.rotated_bounds().expand(SELECTION_PADDING)
}

/// Rough text extent: widest line × average glyph advance, lines × line height.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_size(text: &str, font_size: f64) -> Size {
    let lines = text.lines().count().max(1);
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    Size::new(
        widest as f64 * font_size * LABEL_CHAR_WIDTH_RATIO,
        lines as f64 * font_size * LABEL_LINE_HEIGHT_RATIO,
    )
}

/// Label box for `location` around a forbidden zone centered on `owner_center`.
#[must_use]
pub fn place(zone: Rect, owner_center: Point, location: LabelLocation, label: Size) -> Rect {
    let center = match location {
        LabelLocation::Left => Point::new(owner_center.x - zone.width() / 2.0 - label.width / 2.0, owner_center.y),
        LabelLocation::Right => Point::new(owner_center.x + zone.width() / 2.0 + label.width / 2.0, owner_center.y),
        LabelLocation::Top => {
            let top = zone.top - LABEL_TOP_OUTER_WEIGHT * label.height;
            Point::new(owner_center.x, top + label.height / 2.0)
        }
        LabelLocation::Bottom => {
            let top = zone.bottom - LABEL_BOTTOM_INNER_WEIGHT * LABEL_BOTTOM_HALF * label.height;
            Point::new(owner_center.x, top + label.height / 2.0)
        }
    };
    Rect::from_center(center, label)
}

/// Label box for an element's own label, given its measured size.
///
/// Returns `None` when the element has no label.
#[must_use]
pub fn label_rect(owner: &Element, measured: Size) -> Option<Rect> {
    let label = owner.label.as_ref()?;
    Some(place(forbidden_zone(owner), owner.center(), label.address_location, measured))
}
