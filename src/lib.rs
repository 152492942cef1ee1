//! Layout engine for electrical situation plans.
//!
//! A situation plan places schema symbols, imported images and architectural
//! shapes (walls, windows, doors, freeform fills) on one or more pages. This
//! crate owns the canonical geometric model and the interaction logic on top
//! of it: view/document transforms under zoom and scroll, selection and group
//! drag, resize and rotate handles, z-ordering, page management, label
//! placement and drawing modes. The host is responsible only for wiring
//! pointer/keyboard/wheel events into the engine, supplying the schema, undo
//! and dialog collaborators, and drawing the proxies the engine projects.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing API and input dispatch ([`engine::EngineCore`]) |
//! | [`doc`] | Plan elements, the element store and the document context |
//! | [`camera`] | View ↔ document transforms and zoom-at-cursor |
//! | [`geometry`] | Rectangles, footprints, rotation helpers, wall/shape types |
//! | [`selection`] | Selection set and group drag with halo clamping |
//! | [`handles`] | Resize and rotate gestures |
//! | [`hit`] | Hit-testing against elements and handles |
//! | [`input`] | Input event types, drawing modes and the gesture state machine |
//! | [`zorder`] | Send-to-back, bring-to-front and layer-panel reordering |
//! | [`pages`] | Page count, active page, page deletion cascade |
//! | [`label`] | Address labels: placement and rotation cycling |
//! | [`schema`] | Consistency of symbol references with the external schema |
//! | [`render`] | One-way projection onto a host render surface |
//! | [`host`] | Collaborator traits: undo, dialogs, schema source |
//! | [`config`] | Engine tunables from JSON or `SITPLAN_*` environment variables |
//! | [`error`] | The crate error type |
//! | [`consts`] | Shared numeric constants (minimum sizes, handle radii, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod hit;
pub mod host;
pub mod input;
pub mod label;
pub mod pages;
pub mod render;
pub mod schema;
pub mod selection;
pub mod zorder;
