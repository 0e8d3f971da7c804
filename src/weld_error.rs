//! WeldError: Unified error type for mesh-weld public APIs
//!
//! Every failure in this crate is local to one mesh, one field, or one
//! element: nothing here is fatal to the process. Callers receive a typed
//! error plus a diagnostic message and decide whether to retry, skip, or
//! abort the session.

use thiserror::Error;

/// Unified error type for mesh-weld operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WeldError {
    /// The requested step does not exist in the result database.
    #[error("step `{0}` not found in the result database")]
    StepNotFound(String),
    /// The requested frame index does not exist within the step.
    #[error("frame {frame} not found in step `{step}`")]
    FrameNotFound {
        /// Step that was searched.
        step: String,
        /// Frame index that was requested.
        frame: i32,
    },
    /// A field name is absent from the requested frame. Recoverable: other
    /// fields of the same frame remain loadable.
    #[error("field `{0}` not present in the requested frame")]
    FieldNotFound(String),
    /// An array length disagrees with the expected entity-count times
    /// component-count product.
    #[error("{context}: expected {expected} values, found {found}")]
    SizeMismatch {
        /// Which check failed.
        context: &'static str,
        /// Expected total length.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },
    /// A source element-type tag matched no entry of the target cell table.
    /// Assembly degrades to an empty cell instead of failing; this variant
    /// exists for callers that probe the mapping directly.
    #[error("element type tag `{0}` has no target cell mapping")]
    UnsupportedElementType(String),
    /// A derived computation needs more components than the base field has.
    /// Non-fatal: log and skip the computation for that field.
    #[error("derived field needs {needed} components, found {found}")]
    InsufficientComponents {
        /// Minimum component count the computation requires.
        needed: usize,
        /// Component count of the base field.
        found: usize,
    },
    /// A per-entity access was outside the dense array.
    #[error("entity index {index} out of range ({count} entities)")]
    EntityOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of entities the array holds.
        count: usize,
    },
    /// Geometry arrays were released; rebuild before querying them again.
    #[error("geometry store was released; rebuild it before querying")]
    GeometryReleased,
    /// A structural invariant check failed (see `DebugInvariants`).
    #[error("structural invariant violated: {0}")]
    InvariantViolation(String),
}
