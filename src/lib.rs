//! # mesh-weld
//!
//! mesh-weld is a Rust library for post-processing partitioned finite-element
//! result sets. It reconciles the independently-labeled sub-meshes of a result
//! database into a single 0-based global index space, converts blocked,
//! label-keyed field records into dense per-entity arrays with validity
//! tracking, and assembles a columnar mesh (points, cell types, offsets,
//! connectivity) with named point/cell arrays ready for a downstream writer.
//!
//! ## Features
//! - Label-space federation across partitions with first-writer-wins conflict
//!   resolution and duplicate-label diagnostics
//! - Dense field extraction from partial, multi-block raw records, including
//!   multi-sample (integration point) elemental data
//! - Derived scalar fields: vector magnitude, von Mises invariant, single
//!   component slices
//! - Deterministic source-tag to cell-type mapping and batched cell emission
//! - Explicit eviction of geometry caches and field buffers to bound peak
//!   memory to roughly "one mesh + one field"
//!
//! ## Determinism
//!
//! Partitions are scanned in a fixed, stable order; global indices depend only
//! on that order. Named arrays and diagnostics use ordered containers so the
//! assembled output is bit-reproducible across runs.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! mesh-weld = "0.1"
//! ```
//!
//! The typical flow: implement [`source::ResultDatabase`] over your result
//! store (or use [`source::MemorySource`]), open a [`session::Dataset`], build
//! the mesh, then load frames and attach fields as the caller selects them.

pub mod debug_invariants;
pub mod field;
pub mod geometry;
pub mod mesh;
pub mod remap;
pub mod session;
pub mod source;
pub mod weld_error;

pub use debug_invariants::DebugInvariants;
pub use weld_error::WeldError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::field::derive::{component, magnitude, von_mises};
    pub use crate::field::{FieldArray, FieldDescriptor, FieldExtractor, WELL_KNOWN_FIELDS};
    pub use crate::geometry::{ElementRecord, GeometryStore};
    pub use crate::mesh::assemble::build_mesh;
    pub use crate::mesh::cell_type::CellType;
    pub use crate::mesh::type_map::{cell_type_for_tag, try_cell_type_for_tag};
    pub use crate::mesh::{AttachedArray, Mesh};
    pub use crate::remap::{EntityClass, GlobalRemapper, INVALID_INDEX};
    pub use crate::session::Dataset;
    pub use crate::source::{
        FieldKind, FieldLocation, FrameInfo, MemorySource, RawBlock, RawElement, RawField,
        RawNode, RawPartition, ResultDatabase, StepFrameInfo, StepInfo,
    };
    pub use crate::weld_error::WeldError;
}
