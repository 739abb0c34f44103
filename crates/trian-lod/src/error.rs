//! LOD fix error types.

/// Errors that abort a LOD fix pass before any group is modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LodFixError {
    /// No root node was supplied.
    #[error("no root node to fix")]
    MissingRoot,

    /// The hierarchy nests deeper than the configured limit.
    #[error("hierarchy depth {depth} exceeds limit of {limit}")]
    DepthLimitExceeded {
        /// Measured depth of the hierarchy (a lone root has depth 1).
        depth: usize,
        /// Configured maximum depth.
        limit: usize,
    },
}
