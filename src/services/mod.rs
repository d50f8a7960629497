//! Shell services: each one owns a single boundary with the backend or the
//! push feed and degrades to a documented fallback on failure.

pub mod bridge;
pub mod flags;
pub mod modules;
pub mod panels;
pub mod persistence;
pub mod registry;
