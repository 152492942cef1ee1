//! Collaborators supplied by the host application.
//!
//! The engine never owns undo history, user-facing dialogs, or the electrical
//! schema tree. It talks to them through these traits, which the host passes
//! in explicitly (the undo store inside [`crate::doc::Document`], the dialog
//! into [`crate::engine::EngineCore::new`], the schema per redraw call).

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use serde::{Deserialize, Serialize};

/// External undo/redo stack. The engine only ever asks for checkpoints.
pub trait UndoStore {
    /// Record one checkpoint of the current document state.
    fn commit(&mut self, reason: &str);
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the host should show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// External dialog service.
pub trait Dialog {
    fn notify(&mut self, notice: Notice);
}

/// Resolved reference to a schema symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolHandle {
    pub id: String,
    /// Electrical address text; feeds auto labels.
    pub address: String,
}

/// Rendered symbol artwork. The payload is opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGraphic {
    pub payload: String,
    pub width: f64,
    pub height: f64,
}

impl SymbolGraphic {
    /// A graphic without usable dimensions came from an invalid file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// The external electrical schema that symbol elements reference.
pub trait SchemaSource {
    fn resolve_symbol(&self, id: &str) -> Option<SymbolHandle>;
    fn render_symbol(&self, handle: &SymbolHandle) -> SymbolGraphic;
}

/// Undo store that discards every checkpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUndo;

impl UndoStore for NoopUndo {
    fn commit(&mut self, _reason: &str) {}
}

/// Dialog that drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDialog;

impl Dialog for NoopDialog {
    fn notify(&mut self, _notice: Notice) {}
}
