//! Document model: plan elements, their payloads, and the in-memory store.
//!
//! This module defines what sits on a situation plan (`Element`,
//! `ElementKind`), a sparse-update type for host edits (`ElementPatch`), the
//! store that owns every live element in canonical stacking order
//! (`PlanStore`), and the `Document` context that bundles the store with the
//! page state and the undo collaborator.
//!
//! The geometric model here is canonical. Render surfaces only ever receive
//! projections of it (see [`crate::render`]) and never write back.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::camera::Point;
use crate::error::EngineError;
use crate::geometry::{
    Door, Footprint, FreeformShape, Rect, ShapeType, Size, Wall, WallType, Window, normalize_degrees,
};
use crate::host::UndoStore;
use crate::label::Label;
use crate::pages::PageState;

/// Unique identifier for a plan element.
pub type ElementId = Uuid;

/// The payload of an element. Exactly one is active per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Wall(Wall),
    Window(Window),
    Door(Door),
    FreeformShape(FreeformShape),
    /// Reference to a symbol in the external electrical schema.
    SchemaSymbol {
        #[serde(rename = "symbolId")]
        symbol_id: String,
    },
    /// Imported raster or vector image; `source` is opaque to the engine.
    Image { source: String },
}

impl ElementKind {
    #[must_use]
    pub fn footprint(&self) -> Option<&Footprint> {
        match self {
            Self::Wall(w) => Some(&w.footprint),
            Self::Window(w) => Some(&w.footprint),
            Self::Door(d) => Some(&d.footprint),
            Self::FreeformShape(s) => Some(&s.footprint),
            Self::SchemaSymbol { .. } | Self::Image { .. } => None,
        }
    }

    fn footprint_mut(&mut self) -> Option<&mut Footprint> {
        match self {
            Self::Wall(w) => Some(&mut w.footprint),
            Self::Window(w) => Some(&mut w.footprint),
            Self::Door(d) => Some(&mut d.footprint),
            Self::FreeformShape(s) => Some(&mut s.footprint),
            Self::SchemaSymbol { .. } | Self::Image { .. } => None,
        }
    }

    /// Referenced schema symbol id, for symbol elements.
    #[must_use]
    pub fn symbol_id(&self) -> Option<&str> {
        match self {
            Self::SchemaSymbol { symbol_id } => Some(symbol_id),
            _ => None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wall(_) => "wall",
            Self::Window(_) => "window",
            Self::Door(_) => "door",
            Self::FreeformShape(_) => "freeformShape",
            Self::SchemaSymbol { .. } => "schemaSymbol",
            Self::Image { .. } => "image",
        }
    }
}

/// A situation-plan element as stored in the document and persisted.
///
/// `posx`/`posy` is always the geometric center of the element. For
/// footprint owners (walls, windows, doors, shapes) the footprint is the
/// source of truth and the center/size/page/rotation fields mirror it; every
/// mutator here keeps the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// 1-based page number.
    pub page: u32,
    /// Center x in document space.
    pub posx: f64,
    /// Center y in document space.
    pub posy: f64,
    /// Unscaled content width.
    pub sizex: f64,
    /// Unscaled content height.
    pub sizey: f64,
    pub scale: f64,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub rotate: f64,
    /// Immovable elements ignore drag, resize, rotate, duplicate, delete and z-order.
    pub movable: bool,
    /// Stacking order; lower values render beneath higher values.
    pub z_order: i64,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Content changed since the last projection. Consumed by the render step.
    #[serde(skip, default = "dirty")]
    pub needs_view_update: bool,
}

fn dirty() -> bool {
    true
}

impl Element {
    fn with_kind(kind: ElementKind, page: u32, center: Point, size: Size) -> Self {
        let mut el = Self {
            id: Uuid::new_v4(),
            page,
            posx: center.x,
            posy: center.y,
            sizex: size.width,
            sizey: size.height,
            scale: 1.0,
            rotate: 0.0,
            movable: true,
            z_order: 0,
            kind,
            label: None,
            needs_view_update: true,
        };
        el.sync_from_footprint();
        el
    }

    fn from_footprint(kind: ElementKind) -> Self {
        let (page, center, size) = match kind.footprint() {
            Some(f) => (f.page, f.center(), Size::new(f.width, f.height)),
            None => (1, Point::default(), Size::default()),
        };
        Self::with_kind(kind, page, center, size)
    }

    #[must_use]
    pub fn wall(footprint: Footprint, wall_type: WallType) -> Self {
        Self::from_footprint(ElementKind::Wall(Wall { footprint, wall_type }))
    }

    #[must_use]
    pub fn window(footprint: Footprint) -> Self {
        Self::from_footprint(ElementKind::Window(Window { footprint }))
    }

    #[must_use]
    pub fn door(footprint: Footprint) -> Self {
        Self::from_footprint(ElementKind::Door(Door { footprint }))
    }

    #[must_use]
    pub fn shape(footprint: Footprint, shape_type: ShapeType) -> Self {
        Self::from_footprint(ElementKind::FreeformShape(FreeformShape { footprint, shape_type }))
    }

    #[must_use]
    pub fn symbol(symbol_id: impl Into<String>, page: u32, center: Point, size: Size) -> Self {
        Self::with_kind(ElementKind::SchemaSymbol { symbol_id: symbol_id.into() }, page, center, size)
    }

    #[must_use]
    pub fn image(source: impl Into<String>, page: u32, center: Point, size: Size) -> Self {
        Self::with_kind(ElementKind::Image { source: source.into() }, page, center, size)
    }

    /// Mark as immovable (reference anchors and the like).
    #[must_use]
    pub fn immovable(mut self) -> Self {
        self.movable = false;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.set_scale(scale);
        self
    }

    // --- Queries ---

    #[must_use]
    pub fn footprint(&self) -> Option<&Footprint> {
        self.kind.footprint()
    }

    /// Whether resize handles apply to this element.
    #[must_use]
    pub fn has_footprint(&self) -> bool {
        self.kind.footprint().is_some()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.posx, self.posy)
    }

    /// Rendered size: the footprint for rectangular shapes, `size * scale` otherwise.
    #[must_use]
    pub fn display_size(&self) -> Size {
        match self.kind.footprint() {
            Some(f) => Size::new(f.width, f.height),
            None => Size::new(self.sizex * self.scale, self.sizey * self.scale),
        }
    }

    /// Unrotated bounds around the center.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.center(), self.display_size())
    }

    /// Axis-aligned bounds of the rotated element.
    #[must_use]
    pub fn rotated_bounds(&self) -> Rect {
        self.bounds().rotated_bounds(self.rotate)
    }

    // --- Mutators ---

    /// Copy center, size, page and rotation from the footprint, if any.
    fn sync_from_footprint(&mut self) {
        if let Some(f) = self.kind.footprint() {
            let c = f.center();
            self.posx = c.x;
            self.posy = c.y;
            self.sizex = f.width;
            self.sizey = f.height;
            self.scale = 1.0;
            self.page = f.page;
            self.rotate = f.rotate;
        }
    }

    /// Shift by `delta` in document units. Position only; content is unchanged.
    pub fn translate(&mut self, delta: Point) {
        self.set_center(self.center() + delta);
    }

    pub fn set_center(&mut self, center: Point) {
        self.posx = center.x;
        self.posy = center.y;
        if let Some(f) = self.kind.footprint_mut() {
            f.set_center(center);
        }
    }

    /// Set rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, deg: f64) {
        let deg = normalize_degrees(deg);
        self.rotate = deg;
        if let Some(f) = self.kind.footprint_mut() {
            f.rotate = deg;
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
        if let Some(f) = self.kind.footprint_mut() {
            f.page = page;
        }
    }

    /// Replace the footprint and re-derive center and size from it.
    ///
    /// No-op for symbols and images.
    pub fn set_footprint(&mut self, footprint: Footprint) {
        if let Some(f) = self.kind.footprint_mut() {
            *f = footprint;
            f.rotate = normalize_degrees(f.rotate);
            self.sync_from_footprint();
            self.needs_view_update = true;
        }
    }

    /// Resize around the current center.
    ///
    /// Footprint owners are floored to the minimum size; symbols and images
    /// change their unscaled content size.
    pub fn set_size(&mut self, width: f64, height: f64) {
        let center = self.center();
        if let Some(mut f) = self.kind.footprint().copied() {
            f.width = width;
            f.height = height;
            f.floor_size();
            f.set_center(center);
            self.set_footprint(f);
        } else {
            self.sizex = width.max(f64::EPSILON);
            self.sizey = height.max(f64::EPSILON);
            self.needs_view_update = true;
        }
    }

    /// Set the content scale. Footprint owners always keep scale 1.
    pub fn set_scale(&mut self, scale: f64) {
        if self.has_footprint() || !(scale > 0.0 && scale.is_finite()) {
            return;
        }
        self.scale = scale;
        self.needs_view_update = true;
    }

    /// A copy with a fresh id, shifted by `offset`.
    #[must_use]
    pub fn duplicate(&self, offset: Point) -> Element {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.translate(offset);
        copy.needs_view_update = true;
        copy
    }

    // --- Serialization ---

    /// Serialize into the persisted record (`kind.type` discriminates the payload).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] if serde fails (non-finite floats).
    pub fn to_json(&self) -> Result<serde_json::Value, EngineError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild an element from a persisted record.
    ///
    /// Rotation is normalized and footprint owners re-derive their center.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] for malformed records.
    pub fn from_json(value: serde_json::Value) -> Result<Element, EngineError> {
        let mut el: Element = serde_json::from_value(value)?;
        el.rotate = normalize_degrees(el.rotate);
        if let Some(f) = el.kind.footprint_mut() {
            f.rotate = normalize_degrees(f.rotate);
        }
        el.sync_from_footprint();
        el.needs_view_update = true;
        Ok(el)
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// New center x.
    pub posx: Option<f64>,
    /// New center y.
    pub posy: Option<f64>,
    /// New width (footprint width or unscaled content width).
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    pub scale: Option<f64>,
    /// New rotation in degrees; normalized on apply.
    pub rotate: Option<f64>,
    pub page: Option<u32>,
    pub movable: Option<bool>,
    /// `Some(None)` removes the label.
    pub label: Option<Option<Label>>,
    /// Applies to walls only.
    pub wall_type: Option<WallType>,
    /// Applies to freeform shapes only.
    pub shape_type: Option<ShapeType>,
}

impl ElementPatch {
    /// Whether applying this patch changes rendered content (not just placement).
    #[must_use]
    pub fn touches_content(&self) -> bool {
        self.width.is_some()
            || self.height.is_some()
            || self.scale.is_some()
            || self.label.is_some()
            || self.wall_type.is_some()
            || self.shape_type.is_some()
    }
}

/// In-memory store of plan elements with a canonical stacking order.
///
/// `order` lists every id ascending by `z_order`, ties broken by previous
/// position. It is what export and print consume, so it must be refreshed
/// with [`PlanStore::resort`] after any z-order mutation.
#[derive(Debug, Default)]
pub struct PlanStore {
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
}

impl PlanStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element, then resort.
    pub fn insert(&mut self, el: Element) {
        if !self.elements.contains_key(&el.id) {
            self.order.push(el.id);
        }
        self.elements.insert(el.id, el);
        self.resort();
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        self.order.retain(|other| other != id);
        Some(removed)
    }

    /// Remove every id in `ids`; returns how many were present.
    pub fn remove_all(&mut self, ids: &[ElementId]) -> usize {
        ids.iter().filter(|id| self.remove(id).is_some()).count()
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Mutable access. Callers changing `z_order` must call [`PlanStore::resort`].
    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Apply a patch to an existing element. Returns false if it doesn't exist.
    ///
    /// Page validity is the caller's responsibility.
    pub fn apply_patch(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(el) = self.elements.get_mut(id) else {
            return false;
        };
        if let Some(page) = patch.page {
            el.set_page(page);
        }
        if patch.width.is_some() || patch.height.is_some() {
            let current = if el.has_footprint() { el.display_size() } else { Size::new(el.sizex, el.sizey) };
            el.set_size(patch.width.unwrap_or(current.width), patch.height.unwrap_or(current.height));
        }
        if let Some(scale) = patch.scale {
            el.set_scale(scale);
        }
        if patch.posx.is_some() || patch.posy.is_some() {
            let c = el.center();
            el.set_center(Point::new(patch.posx.unwrap_or(c.x), patch.posy.unwrap_or(c.y)));
        }
        if let Some(rotate) = patch.rotate {
            el.set_rotation(rotate);
        }
        if let Some(movable) = patch.movable {
            el.movable = movable;
        }
        if let Some(label) = &patch.label {
            el.label.clone_from(label);
        }
        match (&mut el.kind, patch.wall_type, patch.shape_type) {
            (ElementKind::Wall(w), Some(t), _) => w.wall_type = t,
            (ElementKind::FreeformShape(s), _, Some(t)) => s.shape_type = t,
            _ => {}
        }
        if patch.touches_content() {
            el.needs_view_update = true;
        }
        true
    }

    /// Replace all elements; input order breaks z-order ties.
    pub fn load(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        self.order.clear();
        for el in elements {
            if !self.elements.contains_key(&el.id) {
                self.order.push(el.id);
            }
            self.elements.insert(el.id, el);
        }
        self.resort();
    }

    /// Re-sort the canonical order ascending by z-order (stable).
    pub fn resort(&mut self) {
        let elements = &self.elements;
        self.order
            .sort_by_key(|id| elements.get(id).map_or(i64::MIN, |el| el.z_order));
    }

    /// Elements in canonical order, bottom first.
    pub fn sorted(&self) -> impl DoubleEndedIterator<Item = &Element> + '_ {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Ids in canonical order, bottom first.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.order.clone()
    }

    /// Elements on `page` in canonical order.
    pub fn on_page(&self, page: u32) -> impl DoubleEndedIterator<Item = &Element> + '_ {
        self.sorted().filter(move |el| el.page == page)
    }

    /// Highest z-order in the store, if any.
    #[must_use]
    pub fn max_z(&self) -> Option<i64> {
        self.elements.values().map(|el| el.z_order).max()
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Persisted form of a whole plan: pages plus elements in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationPlan {
    pub num_pages: u32,
    pub active_page: u32,
    pub elements: Vec<Element>,
}

impl SituationPlan {
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] if serde fails.
    pub fn to_json(&self) -> Result<serde_json::Value, EngineError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a persisted plan, normalizing each element.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Serialization`] for malformed input and
    /// [`EngineError::InvalidPage`] when an element lies outside the page range.
    pub fn from_json(value: serde_json::Value) -> Result<SituationPlan, EngineError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            num_pages: u32,
            active_page: u32,
            elements: Vec<serde_json::Value>,
        }
        let raw: Raw = serde_json::from_value(value)?;
        let pages = PageState::with_pages(raw.num_pages, raw.active_page)?;
        let elements = raw
            .elements
            .into_iter()
            .map(Element::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        for el in &elements {
            pages.validate(el.page)?;
        }
        Ok(SituationPlan { num_pages: pages.num_pages(), active_page: pages.active_page(), elements })
    }
}

/// Document context: element collection, pages, and the undo collaborator.
///
/// Passed explicitly into [`crate::engine::EngineCore::new`] so several
/// independent plans can coexist.
pub struct Document {
    pub elements: PlanStore,
    pub pages: PageState,
    undo: Box<dyn UndoStore>,
}

impl Document {
    #[must_use]
    pub fn new(undo: Box<dyn UndoStore>) -> Self {
        Self { elements: PlanStore::new(), pages: PageState::default(), undo }
    }

    /// Record one undo checkpoint.
    pub fn commit(&mut self, reason: &str) {
        debug!(reason, elements = self.elements.len(), "undo commit");
        self.undo.commit(reason);
    }

    /// Snapshot the document for persistence.
    #[must_use]
    pub fn snapshot(&self) -> SituationPlan {
        SituationPlan {
            num_pages: self.pages.num_pages(),
            active_page: self.pages.active_page(),
            elements: self.elements.sorted().cloned().collect(),
        }
    }

    /// Replace the document contents with a persisted plan. Does not commit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] if the plan's page fields are inconsistent.
    pub fn restore(&mut self, plan: SituationPlan) -> Result<(), EngineError> {
        let pages = PageState::with_pages(plan.num_pages, plan.active_page)?;
        for el in &plan.elements {
            pages.validate(el.page)?;
        }
        self.pages = pages;
        self.elements.load(plan.elements);
        Ok(())
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}
