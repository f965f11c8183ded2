/// Result type alias using NetError
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors surfaced by layer wiring, evaluation and cost computation.
///
/// All variants are programmer-usage errors; there is no retry semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    /// Vector length does not match the expected arity
    #[error("shape mismatch: expected length {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Neuron index or weight-slot index outside valid bounds
    #[error("index out of range: {index} (valid range 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation requires a parent layer that was never wired
    #[error("no parent layer wired - call set_parent_layer() first")]
    NoParentWired,

    /// The non-owning parent link no longer upgrades; the caller dropped
    /// the parent layer while a child still referenced it
    #[error("parent layer dropped before its child")]
    ParentLayerDropped,
}
