//! Canvas geometry engine for the rich-menu editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! interactive part of the editor: translating raw pointer events over the
//! scaled menu preview into region mutations, mapping between screen pixels
//! and logical canvas units, recognising click/draw/move/resize gestures, and
//! projecting the result into a screen-space overlay. The host JavaScript (or
//! Rust UI) layer wires DOM events to the engine and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Regions, actions, and the ordered [`doc::RegionStore`] |
//! | [`mapper`] | Screen/logical coordinate conversions |
//! | [`input`] | Pointer types and the gesture state machine states |
//! | [`resize`] | Anchor-based resize math |
//! | [`hit`] | Resize-handle geometry and hit-testing |
//! | [`overlay`] | Pure projection of regions and gestures to screen space |
//! | [`render`] | Paints an overlay onto a 2D canvas context |
//! | [`menu`] | Menu document export/import and structural validation |
//! | [`template`] | Preset region layouts |
//! | [`preview`] | Preview-mode action simulation and summaries |
//! | [`error`] | Error types for fallible operations |
//! | [`consts`] | Shared numeric constants (thresholds, limits, handle sizes) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod mapper;
pub mod menu;
pub mod overlay;
pub mod preview;
pub mod render;
pub mod resize;
pub mod template;
