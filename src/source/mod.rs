//! Upstream result-database interface.
//!
//! The proprietary simulation database stays opaque behind the
//! [`ResultDatabase`] trait: an implementation enumerates partitions with
//! their raw node/element lists, the step/frame index, and per-frame field
//! outputs delivered as label-keyed bulk blocks. Everything downstream of
//! this module works only with the record types defined here.

pub mod memory;

pub use memory::MemorySource;

use serde::{Deserialize, Serialize};

use crate::weld_error::WeldError;

/// Where a field output lives: sampled at nodes or at elements.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FieldLocation {
    /// One tuple per node (displacements, rotations).
    Nodal,
    /// One tuple per element (stresses).
    Elemental,
}

/// Semantic classification of a field output.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Translational displacement (conventionally `U`).
    Displacement,
    /// Rotational displacement (conventionally `UR`).
    Rotation,
    /// Stress tensor (conventionally `S`).
    Stress,
    /// Any other upstream field.
    Generic,
}

impl FieldKind {
    /// Classify a field by its conventional upstream name.
    pub fn for_name(name: &str) -> Self {
        match name {
            "U" => FieldKind::Displacement,
            "UR" => FieldKind::Rotation,
            "S" => FieldKind::Stress,
            _ => FieldKind::Generic,
        }
    }
}

/// One time sample within a step.
///
/// `frame_index` is the upstream frame id: local to its step and not
/// necessarily contiguous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Upstream frame id within the step.
    pub frame_index: i32,
    /// Time (or load factor) value of the frame.
    pub frame_value: f64,
    /// Free-form upstream description.
    pub description: String,
}

/// A named phase of the simulation with its ordered frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Step name, unique within the database.
    pub name: String,
    /// Frames in upstream order.
    pub frames: Vec<FrameInfo>,
}

/// A fully-qualified frame reference as exposed to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepFrameInfo {
    /// Name of the owning step.
    pub step_name: String,
    /// Upstream frame id within the step.
    pub frame_index: i32,
    /// Time (or load factor) value of the frame.
    pub frame_value: f64,
    /// Free-form upstream description.
    pub description: String,
}

/// Raw node as delivered by a partition: local label plus coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RawNode {
    /// Partition-local node label.
    pub label: i32,
    /// Cartesian coordinates.
    pub coords: [f64; 3],
}

/// Raw element as delivered by a partition.
#[derive(Clone, Debug, PartialEq)]
pub struct RawElement {
    /// Partition-local element label.
    pub label: i32,
    /// Source element-type tag, copied verbatim (e.g. `C3D8R`).
    pub type_tag: String,
    /// Connectivity as partition-local node labels.
    pub connectivity: Vec<i32>,
}

/// One independently-labeled sub-mesh of the model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPartition {
    /// Partition (instance) name.
    pub name: String,
    /// Nodes in upstream order.
    pub nodes: Vec<RawNode>,
    /// Elements in upstream order.
    pub elements: Vec<RawElement>,
}

/// One bulk data block of a field output.
///
/// `values` holds `labels.len() * s * width` floats for some per-entity
/// sample multiplicity `s >= 1` (multiple integration points per element);
/// see [`RawBlock::sub_samples`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawBlock {
    /// Components per sample in this block.
    pub width: usize,
    /// Entity labels, one per entity row.
    pub labels: Vec<i32>,
    /// Flat sample data, entity-major.
    pub values: Vec<f32>,
}

impl RawBlock {
    /// Number of samples stored per entity in this block.
    ///
    /// Derived from the value count when the upstream library does not report
    /// it explicitly; never less than 1.
    pub fn sub_samples(&self) -> usize {
        let per_entity = self.labels.len() * self.width;
        if per_entity == 0 {
            return 1;
        }
        (self.values.len() / per_entity).max(1)
    }
}

/// A raw field output for one frame: descriptor data plus bulk blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct RawField {
    /// Field name (e.g. `U`, `S`).
    pub name: String,
    /// Nodal or elemental.
    pub location: FieldLocation,
    /// Ordered component labels (e.g. `U1`, `U2`, `U3`); may be empty for
    /// scalar outputs.
    pub component_labels: Vec<String>,
    /// Free-form upstream description.
    pub description: String,
    /// Bulk data blocks; a field may span any number of them.
    pub blocks: Vec<RawBlock>,
}

/// Read-side contract of the opaque upstream result database.
///
/// Implementations decode on demand: `partitions` and `field_outputs` return
/// owned records so the caller controls how long raw data stays resident.
pub trait ResultDatabase {
    /// All partitions of the model, in a fixed, stable order.
    fn partitions(&self) -> Vec<RawPartition>;

    /// Node/element totals as declared by the upstream header, if any.
    ///
    /// Used as a cross-check against the collected data; a disagreement is a
    /// warning, not an error.
    fn declared_counts(&self) -> Option<(usize, usize)> {
        None
    }

    /// Steps with their ordered frames.
    fn steps(&self) -> Vec<StepInfo>;

    /// All field outputs stored for one frame.
    ///
    /// # Errors
    /// `StepNotFound` / `FrameNotFound` when the frame reference is invalid.
    fn field_outputs(&self, step: &str, frame_index: i32) -> Result<Vec<RawField>, WeldError>;

    /// One named field output for one frame.
    ///
    /// # Errors
    /// As [`field_outputs`](Self::field_outputs), plus `FieldNotFound` when
    /// the frame exists but stores no field of that name.
    fn field_output(
        &self,
        step: &str,
        frame_index: i32,
        name: &str,
    ) -> Result<RawField, WeldError> {
        self.field_outputs(step, frame_index)?
            .into_iter()
            .find(|field| field.name == name)
            .ok_or_else(|| WeldError::FieldNotFound(name.to_string()))
    }
}
