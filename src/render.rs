//! Rendering: one-way projection of the plan onto a host render surface.
//!
//! The surface hosts positioned, rotatable rectangular proxies keyed by
//! element id. It receives read-only projections of document and camera
//! state and never writes back. Content payloads (patterns, symbol artwork,
//! label text) are only sent when an element is new to the surface or its
//! `needs_view_update` flag is set; geometry is sent on every pass.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashSet;

use crate::camera::{Camera, Point};
use crate::doc::{Element, ElementId, ElementKind, PlanStore};
use crate::geometry::{Rect, Size};
use crate::host::SchemaSource;
use crate::label::{estimate_size, label_rect};

/// Identity of a proxy on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyKey {
    Element(ElementId),
    Label(ElementId),
}

/// What a proxy shows. Opaque payloads pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyContent {
    Wall { pattern: &'static str, thickness: f64 },
    Window,
    Door,
    Shape { fill: &'static str },
    Symbol { payload: String },
    Image { source: String },
    Label { text: String, font_size: f64 },
}

/// One positioned, rotatable rectangle on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Proxy {
    pub key: ProxyKey,
    /// Unrotated box in view space.
    pub rect: Rect,
    /// Clockwise rotation about the box center, degrees.
    pub rotation: f64,
    pub z_order: i64,
    /// False for elements and labels on non-active pages.
    pub visible: bool,
    /// Present only when the content changed since the last pass.
    pub content: Option<ProxyContent>,
}

/// The host's drawing layer.
pub trait RenderSurface {
    /// Create or update a proxy.
    fn upsert(&mut self, proxy: &Proxy);
    /// Remove a proxy. Unknown keys are ignored.
    fn remove(&mut self, key: ProxyKey);
    /// Measured extent of label text in document units.
    fn measure_label(&self, text: &str, font_size: f64) -> Size {
        estimate_size(text, font_size)
    }
}

fn to_view(rect: Rect, camera: &Camera) -> Rect {
    let tl = camera.doc_to_view(Point::new(rect.left, rect.top));
    let br = camera.doc_to_view(Point::new(rect.right, rect.bottom));
    Rect::from_corners(tl, br)
}

fn element_content(el: &Element, schema: &dyn SchemaSource) -> Option<ProxyContent> {
    Some(match &el.kind {
        ElementKind::Wall(w) => ProxyContent::Wall { pattern: w.wall_type.pattern(), thickness: w.wall_type.thickness() },
        ElementKind::Window(_) => ProxyContent::Window,
        ElementKind::Door(_) => ProxyContent::Door,
        ElementKind::FreeformShape(s) => ProxyContent::Shape { fill: s.shape_type.fill() },
        ElementKind::SchemaSymbol { symbol_id } => {
            let handle = schema.resolve_symbol(symbol_id)?;
            ProxyContent::Symbol { payload: schema.render_symbol(&handle).payload }
        }
        ElementKind::Image { source } => ProxyContent::Image { source: source.clone() },
    })
}

/// Tracks which proxies exist on the surface between passes.
#[derive(Debug, Default)]
pub struct Projector {
    rendered: HashSet<ProxyKey>,
}

impl Projector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently on the surface.
    #[must_use]
    pub fn rendered(&self) -> &HashSet<ProxyKey> {
        &self.rendered
    }

    /// Forget every proxy, so the next pass resends all content.
    pub fn reset(&mut self) {
        self.rendered.clear();
    }

    /// Project every element and label onto `surface`, consuming dirty flags,
    /// and remove proxies whose element is gone.
    pub fn project(
        &mut self,
        store: &mut PlanStore,
        camera: &Camera,
        active_page: u32,
        schema: &dyn SchemaSource,
        surface: &mut dyn RenderSurface,
    ) {
        let mut live = HashSet::with_capacity(self.rendered.len());

        for id in store.ids() {
            let Some(el) = store.get_mut(&id) else {
                continue;
            };
            let visible = el.page == active_page;
            let key = ProxyKey::Element(id);
            let fresh = el.needs_view_update || !self.rendered.contains(&key);

            surface.upsert(&Proxy {
                key,
                rect: to_view(el.bounds(), camera),
                rotation: el.rotate,
                z_order: el.z_order,
                visible,
                content: if fresh { element_content(el, schema) } else { None },
            });
            live.insert(key);

            if let Some(label) = &el.label {
                let label_key = ProxyKey::Label(id);
                let measured = surface.measure_label(&label.address_text, label.font_size);
                if let Some(rect) = label_rect(el, measured) {
                    let fresh_label = el.needs_view_update || !self.rendered.contains(&label_key);
                    surface.upsert(&Proxy {
                        key: label_key,
                        rect: to_view(rect, camera),
                        rotation: 0.0,
                        z_order: el.z_order,
                        visible,
                        content: fresh_label.then(|| ProxyContent::Label {
                            text: label.address_text.clone(),
                            font_size: label.font_size,
                        }),
                    });
                    live.insert(label_key);
                }
            }

            el.needs_view_update = false;
        }

        for key in self.rendered.difference(&live) {
            surface.remove(*key);
        }
        self.rendered = live;
    }
}
