//! Engine: the host-facing API and the pointer/keyboard/wheel dispatcher.
//!
//! [`EngineCore`] owns the selection, camera, UI and gesture state, and
//! borrows nothing global: the document context and dialog service are
//! passed in at construction, the schema and render surface per redraw.
//!
//! Undo checkpoints are coarse. Continuous gestures commit once on release
//! (and only if something changed); structural calls commit once per call.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::config::EngineConfig;
use crate::doc::{Document, Element, ElementId, ElementPatch, SituationPlan};
use crate::error::EngineError;
use crate::geometry::{Rect, ShapeType, Size, WallType};
use crate::handles::{ResizeSession, RotateSession};
use crate::hit::{self, Hit, HitPart, ResizeAnchor};
use crate::host::{Dialog, Notice, SchemaSource};
use crate::input::{Button, DrawingMode, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::label::{Label, is_cardinal};
use crate::pages;
use crate::render::{Projector, RenderSurface};
use crate::schema;
use crate::selection::{DragSession, Selection};
use crate::zorder::{self, LayerEntry, Placement};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId },
    ElementDeleted { id: ElementId },
    SetCursor(String),
    RenderNeeded,
}

/// What closing a gesture produced.
enum GestureOutcome {
    Unchanged,
    Changed(Vec<ElementId>),
    Created(Element),
}

/// Core engine state.
pub struct EngineCore {
    pub doc: Document,
    pub selection: Selection,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub config: EngineConfig,
    dialog: Box<dyn Dialog>,
    projector: Projector,
}

impl EngineCore {
    #[must_use]
    pub fn new(doc: Document, config: EngineConfig, dialog: Box<dyn Dialog>) -> Self {
        let camera = Camera { padding: config.padding, ..Camera::default() };
        Self {
            doc,
            selection: Selection::new(),
            camera,
            ui: UiState::default(),
            input: InputState::Idle,
            config,
            dialog,
            projector: Projector::new(),
        }
    }

    // --- Queries ---

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.elements.get(id)
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// The page extent in document space.
    #[must_use]
    pub fn document_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.document_width, self.config.document_height)
    }

    /// The region drags are clamped to: visible part of the page.
    #[must_use]
    pub fn view_box(&self) -> Rect {
        self.camera.view_box(self.document_rect())
    }

    // --- Persistence ---

    #[must_use]
    pub fn snapshot(&self) -> SituationPlan {
        self.doc.snapshot()
    }

    /// Replace the document with a persisted plan. Ends any gesture and
    /// clears the selection; does not commit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] for inconsistent page data.
    pub fn load(&mut self, plan: SituationPlan) -> Result<(), EngineError> {
        self.doc.restore(plan)?;
        self.input = InputState::Idle;
        self.ui.preview = None;
        self.selection.clear();
        for id in self.doc.elements.ids() {
            if let Some(el) = self.doc.elements.get_mut(&id) {
                el.needs_view_update = true;
            }
        }
        Ok(())
    }

    // --- Viewport ---

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.viewport_width = width;
        self.camera.viewport_height = height;
    }

    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.camera.scroll_x = scroll_x;
        self.camera.scroll_y = scroll_y;
    }

    /// Zoom to `zoom` (clamped) keeping the document point under `anchor_view` fixed.
    pub fn zoom_at(&mut self, anchor_view: Point, zoom: f64) {
        let zoom = self.config.clamp_zoom(zoom);
        self.camera.zoom_at(anchor_view, zoom);
    }

    // --- Page API ---

    #[must_use]
    pub fn get_current_page(&self) -> u32 {
        self.doc.pages.active_page()
    }

    #[must_use]
    pub fn get_num_pages(&self) -> u32 {
        self.doc.pages.num_pages()
    }

    /// Switch the active page. Clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] when `page` is out of range.
    pub fn change_page(&mut self, page: u32) -> Result<(), EngineError> {
        self.doc.pages.validate(page)?;
        self.close_gesture(None);
        self.doc.pages.change_page(page)?;
        self.selection.clear();
        info!(page, "page changed");
        Ok(())
    }

    /// Append a page and switch to it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AddPageNotAtEnd`] unless the last page is active.
    pub fn add_page(&mut self) -> Result<u32, EngineError> {
        let mut pages = self.doc.pages;
        let page = pages.add_page()?;
        self.close_gesture(None);
        self.doc.pages = pages;
        self.selection.clear();
        info!(page, "page added");
        self.doc.commit("add page");
        Ok(page)
    }

    /// Delete `page` and every element on it. Returns the removed ids.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LastPage`] or [`EngineError::InvalidPage`].
    pub fn delete_page(&mut self, page: u32) -> Result<Vec<ElementId>, EngineError> {
        if self.doc.pages.num_pages() <= 1 {
            return Err(EngineError::LastPage);
        }
        self.doc.pages.validate(page)?;
        self.close_gesture(None);
        let removed = self.doc.pages.delete_page(page, &mut self.doc.elements)?;
        self.selection.clear();
        info!(page, removed = removed.len(), "page deleted");
        self.doc.commit("delete page");
        Ok(removed)
    }

    /// Move the selected movable elements to `page` and bring them to front.
    /// The selection is kept. Returns the ids that changed page.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] when `page` is out of range.
    pub fn move_page_of_selection(&mut self, page: u32) -> Result<Vec<ElementId>, EngineError> {
        self.doc.pages.validate(page)?;
        self.close_gesture(None);
        let ids = self.movable_selection();
        let moved = pages::move_to_page(&mut self.doc.elements, &ids, page);
        if !moved.is_empty() {
            zorder::bring_to_front(&mut self.doc.elements, &moved);
            info!(page, moved = moved.len(), "selection moved to page");
            self.doc.commit("move to page");
        }
        Ok(moved)
    }

    // --- Element API ---

    /// Add an element: validates page and geometry, floors footprints,
    /// and stacks it on top.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPage`] or [`EngineError::InvalidGeometry`].
    pub fn add_element(&mut self, mut el: Element) -> Result<ElementId, EngineError> {
        self.doc.pages.validate(el.page)?;
        check_geometry(&el)?;
        if let Some(mut f) = el.footprint().copied() {
            f.floor_size();
            el.set_footprint(f);
        }
        el.set_rotation(el.rotate);
        el.z_order = self.next_z();
        el.needs_view_update = true;
        let id = el.id;
        debug!(%id, kind = el.kind.name(), page = el.page, "element added");
        self.doc.elements.insert(el);
        self.doc.commit("add element");
        Ok(id)
    }

    /// Apply a sparse update.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ElementNotFound`], [`EngineError::InvalidPage`]
    /// for an out-of-range page, or [`EngineError::InvalidGeometry`] for
    /// non-finite or non-positive sizes and non-finite positions.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> Result<(), EngineError> {
        if !self.doc.elements.contains(&id) {
            return Err(EngineError::ElementNotFound(id));
        }
        if let Some(page) = patch.page {
            self.doc.pages.validate(page)?;
        }
        let bad_size = [patch.width, patch.height].into_iter().flatten().any(|v| !(v.is_finite() && v > 0.0));
        let bad_pos = [patch.posx, patch.posy].into_iter().flatten().any(|v| !v.is_finite());
        if bad_size || bad_pos {
            return Err(EngineError::InvalidGeometry {
                width: patch.width.unwrap_or(f64::NAN),
                height: patch.height.unwrap_or(f64::NAN),
            });
        }
        self.doc.elements.apply_patch(&id, patch);
        let active = self.doc.pages.active_page();
        if self.doc.elements.get(&id).is_some_and(|el| el.page != active) {
            self.selection.remove(&id);
        }
        self.doc.commit("update element");
        Ok(())
    }

    /// Delete one element.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ElementNotFound`] or [`EngineError::Immovable`].
    pub fn delete_element(&mut self, id: ElementId) -> Result<(), EngineError> {
        match self.doc.elements.get(&id) {
            None => return Err(EngineError::ElementNotFound(id)),
            Some(el) if !el.movable => return Err(EngineError::Immovable(id)),
            Some(_) => {}
        }
        self.doc.elements.remove(&id);
        self.selection.remove(&id);
        self.doc.commit("delete element");
        Ok(())
    }

    /// Delete the selected movable elements. Returns the removed ids.
    pub fn delete_selection(&mut self) -> Vec<ElementId> {
        let ids = self.movable_selection();
        if ids.is_empty() {
            return ids;
        }
        self.doc.elements.remove_all(&ids);
        for id in &ids {
            self.selection.remove(id);
        }
        self.doc.commit("delete selection");
        ids
    }

    /// Copy the selected movable elements, offset by the configured distance,
    /// on top of everything. The copies become the selection.
    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let offset = Point::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let copies: Vec<Element> = self
            .doc
            .elements
            .sorted()
            .filter(|el| el.movable && self.selection.contains(&el.id))
            .map(|el| el.duplicate(offset))
            .collect();
        if copies.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ElementId> = copies.iter().map(|el| el.id).collect();
        for el in copies {
            self.doc.elements.insert(el);
        }
        zorder::bring_to_front(&mut self.doc.elements, &ids);
        self.selection.clear();
        for id in &ids {
            self.selection.add(*id);
        }
        self.doc.commit("duplicate selection");
        ids
    }

    /// Rotate every selected movable element by `degrees`. With
    /// `rotate_labels`, a cardinal turn also cycles label locations.
    pub fn rotate_selection(&mut self, degrees: f64, rotate_labels: bool) -> Vec<ElementId> {
        if !degrees.is_finite() {
            return Vec::new();
        }
        let cycle = rotate_labels && is_cardinal(degrees);
        let ids = self.movable_selection();
        for id in &ids {
            let Some(el) = self.doc.elements.get_mut(id) else {
                continue;
            };
            el.set_rotation(el.rotate + degrees);
            if cycle {
                if let Some(label) = el.label.as_mut() {
                    label.address_location = label.address_location.rotated_by(degrees);
                    el.needs_view_update = true;
                }
            }
        }
        if !ids.is_empty() {
            self.doc.commit("rotate selection");
        }
        ids
    }

    /// Place a schema symbol centered on `center`, with an auto label.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSymbol`] when the schema does not know
    /// `symbol_id`, [`EngineError::InvalidGeometry`] when its artwork has no
    /// size (a notice is raised), or [`EngineError::InvalidPage`].
    pub fn add_symbol(
        &mut self,
        schema: &dyn SchemaSource,
        symbol_id: &str,
        page: u32,
        center: Point,
    ) -> Result<ElementId, EngineError> {
        self.doc.pages.validate(page)?;
        let handle = schema
            .resolve_symbol(symbol_id)
            .ok_or_else(|| EngineError::UnknownSymbol(symbol_id.to_owned()))?;
        let graphic = schema.render_symbol(&handle);
        self.check_import(Size::new(graphic.width, graphic.height), symbol_id)?;
        let mut label = Label::auto(self.config.label_font_size);
        label.address_text = handle.address;
        self.add_element(Element::symbol(handle.id, page, center, Size::new(graphic.width, graphic.height)).with_label(label))
    }

    /// Place an imported image centered on `center`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGeometry`] when `size` is empty (a notice
    /// is raised), or [`EngineError::InvalidPage`].
    pub fn add_image(&mut self, source: &str, page: u32, center: Point, size: Size) -> Result<ElementId, EngineError> {
        self.doc.pages.validate(page)?;
        self.check_import(size, source)?;
        self.add_element(Element::image(source, page, center, size))
    }

    /// Reject empty imports with an error notice; warn about oversized ones.
    fn check_import(&mut self, size: Size, what: &str) -> Result<(), EngineError> {
        if !(size.width > 0.0 && size.height > 0.0 && size.width.is_finite() && size.height.is_finite()) {
            warn!(what, width = size.width, height = size.height, "import has no usable size");
            self.dialog.notify(Notice::error(format!("{what}: invalid file (no usable size)")));
            return Err(EngineError::InvalidGeometry { width: size.width, height: size.height });
        }
        let max = self.config.max_import_size;
        if size.width > max || size.height > max {
            warn!(what, width = size.width, height = size.height, max, "oversized import");
            self.dialog.notify(Notice::warning(format!(
                "{what}: {} x {} exceeds the recommended maximum of {max}",
                size.width, size.height
            )));
        }
        Ok(())
    }

    // --- Selection API ---

    /// Replace the selection with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ElementNotFound`] if `id` is not on the active page.
    pub fn select(&mut self, id: ElementId) -> Result<(), EngineError> {
        self.require_on_active_page(id)?;
        self.selection.select(id);
        Ok(())
    }

    /// Toggle `id` in the selection; the last selected element stays selected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ElementNotFound`] if `id` is not on the active page.
    pub fn toggle_selection(&mut self, id: ElementId) -> Result<(), EngineError> {
        self.require_on_active_page(id)?;
        self.selection.toggle(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn get_selection(&self) -> Vec<ElementId> {
        self.selection.ids().to_vec()
    }

    fn require_on_active_page(&self, id: ElementId) -> Result<(), EngineError> {
        let active = self.doc.pages.active_page();
        if self.doc.elements.get(&id).is_some_and(|el| el.page == active) {
            Ok(())
        } else {
            Err(EngineError::ElementNotFound(id))
        }
    }

    fn movable_selection(&self) -> Vec<ElementId> {
        self.selection
            .ids()
            .iter()
            .filter(|id| self.doc.elements.get(id).is_some_and(|el| el.movable))
            .copied()
            .collect()
    }

    fn next_z(&self) -> i64 {
        self.doc.elements.max_z().map_or(0, |z| z + 1)
    }

    // --- Drawing modes ---

    pub fn enable_wall_drawing(&mut self, wall_type: WallType) {
        self.set_drawing_mode(Some(DrawingMode::Wall(wall_type)));
    }

    pub fn enable_window_drawing(&mut self) {
        self.set_drawing_mode(Some(DrawingMode::Window));
    }

    pub fn enable_door_drawing(&mut self) {
        self.set_drawing_mode(Some(DrawingMode::Door));
    }

    pub fn enable_shape_drawing(&mut self, shape_type: ShapeType) {
        self.set_drawing_mode(Some(DrawingMode::Shape(shape_type)));
    }

    pub fn disable_drawing_mode(&mut self) {
        self.set_drawing_mode(None);
    }

    fn set_drawing_mode(&mut self, mode: Option<DrawingMode>) {
        debug!(?mode, "drawing mode");
        self.ui.drawing = mode;
    }

    // --- Explicit gesture API (document space) ---

    /// Start a group drag through `reference`. No-op (returns false) when a
    /// gesture is active or the reference is immovable or unselected.
    pub fn begin_drag(&mut self, reference: ElementId, pointer: Point) -> bool {
        if !self.input.is_idle() {
            return false;
        }
        match DragSession::begin(&self.doc.elements, &self.selection, reference, pointer) {
            Some(session) => {
                self.start_gesture(InputState::Dragging(session));
                true
            }
            None => false,
        }
    }

    /// Follow the pointer during a drag. Returns the shift applied.
    pub fn update_drag(&mut self, pointer: Point) -> Point {
        let view_box = self.view_box();
        match &mut self.input {
            InputState::Dragging(session) => session.update(&mut self.doc.elements, pointer, view_box),
            _ => Point::default(),
        }
    }

    /// End a drag. Returns true if it moved anything (one undo checkpoint).
    pub fn end_drag(&mut self) -> bool {
        matches!(self.input, InputState::Dragging(_))
            && matches!(self.close_gesture(None), GestureOutcome::Changed(_))
    }

    /// Start resizing `id` from `anchor`.
    pub fn begin_resize(&mut self, id: ElementId, anchor: ResizeAnchor, pointer: Point) -> bool {
        if !self.input.is_idle() {
            return false;
        }
        match ResizeSession::begin(&self.doc.elements, id, anchor, pointer) {
            Some(session) => {
                self.start_gesture(InputState::Resizing(session));
                true
            }
            None => false,
        }
    }

    /// Start rotating `id` around its center.
    pub fn begin_rotate(&mut self, id: ElementId, pointer: Point) -> bool {
        if !self.input.is_idle() {
            return false;
        }
        match RotateSession::begin(&self.doc.elements, id, pointer) {
            Some(session) => {
                self.start_gesture(InputState::Rotating(session));
                true
            }
            None => false,
        }
    }

    /// Feed a document-space pointer position to the active gesture.
    /// Returns true when anything changed.
    pub fn update_gesture(&mut self, pointer: Point) -> bool {
        let view_box = self.view_box();
        let store = &mut self.doc.elements;
        match &mut self.input {
            InputState::Idle => false,
            InputState::Dragging(session) => {
                let shift = session.update(store, pointer, view_box);
                shift != Point::default()
            }
            InputState::Resizing(session) => session.update(store, pointer),
            InputState::Rotating(session) => session.update(store, pointer),
            InputState::Drawing { anchor, current, .. } => {
                *current = pointer;
                self.ui.preview = Some(Rect::from_corners(*anchor, pointer));
                true
            }
        }
    }

    /// End whatever gesture is active at `pointer`. Returns true when it
    /// changed or created something.
    pub fn end_gesture(&mut self, pointer: Point) -> bool {
        !matches!(self.close_gesture(Some(pointer)), GestureOutcome::Unchanged)
    }

    fn start_gesture(&mut self, state: InputState) {
        debug!(gesture = state.name(), "gesture started");
        self.input = state;
    }

    /// Leave the active gesture. With a pointer the gesture takes one last
    /// update and drawings are built; without one (page changes, escape) the
    /// state reached so far is kept and drawings are discarded.
    fn close_gesture(&mut self, pointer: Option<Point>) -> GestureOutcome {
        if let Some(p) = pointer {
            self.update_gesture(p);
        }
        let state = std::mem::take(&mut self.input);
        self.ui.preview = None;
        if state.is_idle() {
            return GestureOutcome::Unchanged;
        }
        let gesture = state.name();
        let store = &mut self.doc.elements;

        let (outcome, reason) = match state {
            InputState::Idle => (GestureOutcome::Unchanged, ""),
            InputState::Dragging(session) => {
                let outcome = if session.moved() {
                    GestureOutcome::Changed(session.members().iter().filter(|id| store.contains(id)).copied().collect())
                } else {
                    GestureOutcome::Unchanged
                };
                (outcome, "move")
            }
            InputState::Resizing(session) => {
                let outcome = if session.changed(store) {
                    GestureOutcome::Changed(vec![session.id])
                } else {
                    GestureOutcome::Unchanged
                };
                (outcome, "resize")
            }
            InputState::Rotating(session) => {
                let outcome = if session.changed(store) {
                    GestureOutcome::Changed(vec![session.id])
                } else {
                    GestureOutcome::Unchanged
                };
                (outcome, "rotate")
            }
            InputState::Drawing { mode, anchor, .. } => {
                let page = self.doc.pages.active_page();
                match pointer.and_then(|p| mode.build(anchor, p, page)) {
                    Some(mut el) => {
                        el.z_order = store.max_z().map_or(0, |z| z + 1);
                        store.insert(el.clone());
                        self.selection.select(el.id);
                        (GestureOutcome::Created(el), "draw")
                    }
                    None => (GestureOutcome::Unchanged, "draw"),
                }
            }
        };

        let committed = !matches!(outcome, GestureOutcome::Unchanged);
        debug!(gesture, committed, "gesture ended");
        if committed {
            self.doc.commit(reason);
        }
        outcome
    }

    // --- Z-order API ---

    /// Send the selected movable elements to the back.
    pub fn send_to_back(&mut self) -> Vec<ElementId> {
        let ids = self.selection.ids().to_vec();
        let sent = zorder::send_to_back(&mut self.doc.elements, &ids);
        if !sent.is_empty() {
            self.doc.commit("send to back");
        }
        sent
    }

    /// Bring the selected movable elements to the front.
    pub fn bring_to_front(&mut self) -> Vec<ElementId> {
        let ids = self.selection.ids().to_vec();
        let raised = zorder::bring_to_front(&mut self.doc.elements, &ids);
        if !raised.is_empty() {
            self.doc.commit("bring to front");
        }
        raised
    }

    /// Layer-panel reorder: put `moving` directly above or below `neighbor`.
    pub fn move_layer(&mut self, moving: ElementId, neighbor: ElementId, placement: Placement) -> bool {
        let moved = zorder::move_layer(&mut self.doc.elements, moving, neighbor, placement);
        if moved {
            self.doc.commit("move layer");
        }
        moved
    }

    /// Layer-panel rows for `page`, top-most first.
    #[must_use]
    pub fn layer_list(&self, page: u32) -> Vec<LayerEntry> {
        zorder::layer_list(&self.doc.elements, page)
    }

    // --- Schema and rendering ---

    /// Sync with the schema, then project the plan onto `surface`.
    /// Returns the ids pruned for unresolved symbols.
    pub fn redraw(&mut self, schema: &dyn SchemaSource, surface: &mut dyn RenderSurface) -> Vec<ElementId> {
        let pruned = schema::sync(&mut self.doc.elements, schema);
        self.forget(&pruned);
        self.projector
            .project(&mut self.doc.elements, &self.camera, self.doc.pages.active_page(), schema, surface);
        pruned
    }

    /// The schema deleted `symbol_id`: drop every element referencing it now.
    pub fn symbol_removed(&mut self, symbol_id: &str) -> Vec<ElementId> {
        let pruned = schema::prune_symbol(&mut self.doc.elements, symbol_id);
        self.forget(&pruned);
        pruned
    }

    fn forget(&mut self, ids: &[ElementId]) {
        for id in ids {
            self.selection.remove(id);
        }
    }

    // --- Input events (view space) ---

    pub fn on_pointer_down(&mut self, view_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }
        let doc_pt = self.camera.view_to_doc(view_pt);
        let hit = hit::hit_test(
            doc_pt,
            &self.doc.elements,
            self.doc.pages.active_page(),
            self.camera.zoom,
            self.selection.sole(),
        );

        match hit {
            Some(Hit { element_id, part: HitPart::RotateHandle }) => {
                if self.begin_rotate(element_id, doc_pt) {
                    return vec![Action::SetCursor("grabbing".into())];
                }
                Vec::new()
            }
            Some(Hit { element_id, part: HitPart::ResizeHandle(anchor) }) => {
                if self.begin_resize(element_id, anchor, doc_pt) {
                    return vec![Action::SetCursor(anchor.cursor().into())];
                }
                Vec::new()
            }
            Some(Hit { element_id, part: HitPart::Body }) => {
                if modifiers.command() || modifiers.shift {
                    self.selection.toggle(element_id);
                    if !self.selection.contains(&element_id) {
                        return vec![Action::RenderNeeded];
                    }
                } else if !self.selection.contains(&element_id) {
                    self.selection.select(element_id);
                }
                self.begin_drag(element_id, doc_pt);
                vec![Action::RenderNeeded]
            }
            None => {
                if let Some(mode) = self.ui.drawing {
                    self.ui.preview = Some(Rect::from_corners(doc_pt, doc_pt));
                    self.start_gesture(InputState::Drawing { mode, anchor: doc_pt, current: doc_pt });
                } else {
                    self.selection.clear();
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, view_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let doc_pt = self.camera.view_to_doc(view_pt);
        if self.input.is_idle() {
            return vec![Action::SetCursor(self.hover_cursor(doc_pt).into())];
        }
        if self.update_gesture(doc_pt) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Any button release ends the active gesture.
    pub fn on_pointer_up(&mut self, view_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.input.is_idle() {
            return Vec::new();
        }
        let doc_pt = self.camera.view_to_doc(view_pt);
        let mut actions = match self.close_gesture(Some(doc_pt)) {
            GestureOutcome::Unchanged => Vec::new(),
            GestureOutcome::Changed(ids) => ids.into_iter().map(|id| Action::ElementUpdated { id }).collect(),
            GestureOutcome::Created(el) => vec![Action::ElementCreated(el)],
        };
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Ctrl/meta + wheel zooms under the cursor; a plain wheel scrolls.
    pub fn on_wheel(&mut self, view_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            if delta.dy == 0.0 || !delta.dy.is_finite() {
                return Vec::new();
            }
            let factor = if delta.dy < 0.0 { self.config.zoom_step } else { 1.0 / self.config.zoom_step };
            let zoom = self.config.clamp_zoom(self.camera.zoom * factor);
            if (zoom - self.camera.zoom).abs() < f64::EPSILON {
                return Vec::new();
            }
            self.camera.zoom_at(view_pt, zoom);
        } else {
            if !(delta.dx.is_finite() && delta.dy.is_finite()) {
                return Vec::new();
            }
            self.camera.scroll_x += delta.dx;
            self.camera.scroll_y += delta.dy;
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => {
                if !self.input.is_idle() {
                    return Vec::new();
                }
                let deleted = self.delete_selection();
                if deleted.is_empty() {
                    return Vec::new();
                }
                let mut actions: Vec<Action> = deleted.into_iter().map(|id| Action::ElementDeleted { id }).collect();
                actions.push(Action::RenderNeeded);
                actions
            }
            "Escape" => {
                if matches!(self.input, InputState::Drawing { .. }) {
                    self.close_gesture(None);
                }
                self.selection.clear();
                self.disable_drawing_mode();
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    fn hover_cursor(&self, doc_pt: Point) -> &'static str {
        let hit = hit::hit_test(
            doc_pt,
            &self.doc.elements,
            self.doc.pages.active_page(),
            self.camera.zoom,
            self.selection.sole(),
        );
        match hit {
            Some(Hit { part: HitPart::RotateHandle, .. }) => "grab",
            Some(Hit { part: HitPart::ResizeHandle(anchor), .. }) => anchor.cursor(),
            Some(Hit { element_id, part: HitPart::Body }) => {
                if self.doc.elements.get(&element_id).is_some_and(|el| el.movable) { "move" } else { "default" }
            }
            None if self.ui.drawing.is_some() => "crosshair",
            None => "default",
        }
    }
}

fn check_geometry(el: &Element) -> Result<(), EngineError> {
    let size = el.display_size();
    let ok = size.width.is_finite()
        && size.height.is_finite()
        && size.width > 0.0
        && size.height > 0.0
        && el.posx.is_finite()
        && el.posy.is_finite();
    if ok { Ok(()) } else { Err(EngineError::InvalidGeometry { width: size.width, height: size.height }) }
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("camera", &self.camera)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}
