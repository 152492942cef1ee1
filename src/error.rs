//! Error type for structural engine operations.
//!
//! Continuous pointer input never produces these: drag, resize and rotate
//! updates clamp or no-op instead. Only explicit API calls (pages, element
//! CRUD, imports, serialization, configuration) are fallible.

use crate::doc::ElementId;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("invalid page {page}: document has {num_pages} page(s)")]
    InvalidPage { page: u32, num_pages: u32 },
    #[error("pages can only be added from the last page (active {active} of {num_pages})")]
    AddPageNotAtEnd { active: u32, num_pages: u32 },
    #[error("cannot delete the only page")]
    LastPage,
    #[error("element is not movable: {0}")]
    Immovable(ElementId),
    #[error("invalid geometry: {width} x {height}")]
    InvalidGeometry { width: f64, height: f64 },
    #[error("schema symbol not found: {0}")]
    UnknownSymbol(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}
