//! Engine error type.

/// Failures surfaced by engine operations that touch the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The expected mount point is not present in the document.
    #[error("render target missing: {0}")]
    RenderTargetMissing(String),
    /// No container with this id has been mounted.
    #[error("unknown container: {0}")]
    UnknownContainer(String),
}
