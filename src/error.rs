//! Shell error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! None of these are fatal. Every boundary operation catches its error,
//! logs it, and degrades to a documented fallback: an empty registry, the
//! default layout, a dropped widget, or a status change on the connection
//! indicator.

use dashboard::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Network failure or non-success HTTP status.
    #[error("fetch {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    /// A response body was not the expected JSON shape.
    #[error("parse {what} failed: {reason}")]
    Parse { what: String, reason: String },

    /// A widget's assets could not be loaded or it has no content provider.
    #[error("module {widget} failed to load: {reason}")]
    ModuleLoad { widget: String, reason: String },

    /// The document rejected a render.
    #[error(transparent)]
    Render(#[from] EngineError),

    /// The push feed could not connect or broke mid-stream.
    #[error("feed error: {0}")]
    Feed(String),
}

impl ShellError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch { url: url.to_owned(), reason: reason.to_string() }
    }

    pub fn parse(what: &str, reason: impl ToString) -> Self {
        Self::Parse { what: what.to_owned(), reason: reason.to_string() }
    }
}
