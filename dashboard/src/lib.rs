//! Widget lifecycle and layout engine for the wallpaper dashboard shell.
//!
//! This crate performs no I/O. It owns the in-memory model of the dashboard:
//! which widgets exist, what each mounted container looks like, where it sits
//! on the canvas, whether it is shown, and which interaction gesture is in
//! flight. The host layer (the `wallboard` binary) fetches documents, loads
//! widget modules, and carries out the [`engine::Action`]s returned here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::DashboardState`] and the typed input dispatcher |
//! | [`input`] | Input events and the interaction state machine states |
//! | [`dom`] | Document surface: containers, head assets, body classes |
//! | [`render`] | Mount / unmount of content descriptors into containers |
//! | [`widget`] | Content descriptor contract and provider registration |
//! | [`registry`] | Registry entries and the container alias table |
//! | [`layout`] | Position documents, merge rule, default geometry |
//! | [`visibility`] | Visibility documents and the clock-only default |
//! | [`styles`] | Per-widget style settings documents |
//! | [`menu`] | Context menu items and viewport-aware placement |
//! | [`settings`] | Settings editor form model and value coercion |
//! | [`geometry`] | Points, rectangles, CSS pixel lengths |
//! | [`format`] | Human-readable bit and byte formatting |
//! | [`consts`] | Shared ids, class names and default sizes |
//! | [`error`] | Engine error type |

pub mod consts;
pub mod dom;
pub mod engine;
pub mod error;
pub mod format;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod menu;
pub mod registry;
pub mod render;
pub mod settings;
pub mod styles;
pub mod visibility;
pub mod widget;

pub use engine::{Action, DashboardState};
pub use error::EngineError;
