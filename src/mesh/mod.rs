//! Columnar mesh container and assembly.
//!
//! A [`Mesh`] is the downstream-facing product: a point array, per-cell type
//! ids, an offsets array of length `cell_count + 1` into a flat connectivity
//! buffer, and zero or more named multi-component arrays attached to points
//! or cells. The byte layout of any export container is out of scope; only
//! these array shapes are defined here.

pub mod assemble;
pub mod cell_type;
pub mod type_map;

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::field::FieldArray;
use crate::mesh::cell_type::CellType;
use crate::source::FieldLocation;
use crate::weld_error::WeldError;

/// A named multi-component array attached to mesh points or cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttachedArray {
    /// Components per tuple.
    pub components: usize,
    /// Flat values, tuple-major; `tuple_count * components` long.
    pub values: Vec<f64>,
}

impl AttachedArray {
    /// Number of tuples.
    pub fn tuple_count(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.values.len() / self.components
        }
    }
}

/// Globally-indexed columnar mesh with attached data arrays.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub(crate) points: Vec<[f64; 3]>,
    pub(crate) cell_types: Vec<CellType>,
    pub(crate) offsets: Vec<usize>,
    pub(crate) connectivity: Vec<usize>,
    pub(crate) point_data: BTreeMap<String, AttachedArray>,
    pub(crate) cell_data: BTreeMap<String, AttachedArray>,
}

impl Mesh {
    /// Number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of cells, empty slots included.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_types.len()
    }

    /// Point coordinates, indexed by global node id.
    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Per-cell type ids, empty sentinel included.
    #[inline]
    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_types
    }

    /// Offsets into the connectivity buffer; `cell_count + 1` long.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Flat connectivity buffer of accepted cells.
    #[inline]
    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }

    /// Type and connectivity slice of one cell.
    ///
    /// An empty cell yields a zero-length slice.
    pub fn cell(&self, index: usize) -> Option<(CellType, &[usize])> {
        let cell_type = *self.cell_types.get(index)?;
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some((cell_type, &self.connectivity[start..end]))
    }

    /// Named point arrays in deterministic order.
    #[inline]
    pub fn point_data(&self) -> &BTreeMap<String, AttachedArray> {
        &self.point_data
    }

    /// Named cell arrays in deterministic order.
    #[inline]
    pub fn cell_data(&self) -> &BTreeMap<String, AttachedArray> {
        &self.cell_data
    }

    /// Attaches a field array under `name` at the given location.
    ///
    /// The array is copied into an [`AttachedArray`]; invalid entities are
    /// already zero-filled by the [`FieldArray`] invariant, so the attached
    /// values are total. The caller may discard the field afterwards.
    ///
    /// # Errors
    /// `SizeMismatch` when the array length disagrees with
    /// `entity_count * components` for the target location.
    pub fn attach(
        &mut self,
        name: &str,
        field: &FieldArray,
        location: FieldLocation,
    ) -> Result<(), WeldError> {
        let entity_count = match location {
            FieldLocation::Nodal => self.point_count(),
            FieldLocation::Elemental => self.cell_count(),
        };
        let expected = entity_count * field.components();
        if field.values().len() != expected || field.entity_count() != entity_count {
            return Err(WeldError::SizeMismatch {
                context: "attach field array",
                expected,
                found: field.values().len(),
            });
        }
        let array = AttachedArray {
            components: field.components(),
            values: field.values().to_vec(),
        };
        match location {
            FieldLocation::Nodal => self.point_data.insert(name.to_string(), array),
            FieldLocation::Elemental => self.cell_data.insert(name.to_string(), array),
        };
        info!(
            "attached {}-component array `{name}` to {entity_count} {}",
            field.components(),
            match location {
                FieldLocation::Nodal => "points",
                FieldLocation::Elemental => "cells",
            }
        );
        Ok(())
    }

    /// Perturbs point coordinates in place by `scale * field` (deformed
    /// shape). Up to three leading components are used; a zero scale is a
    /// no-op, not a failure.
    ///
    /// # Errors
    /// `SizeMismatch` when the field is not sized to the point count.
    pub fn apply_displacement(
        &mut self,
        field: &FieldArray,
        scale: f64,
    ) -> Result<(), WeldError> {
        if scale == 0.0 {
            return Ok(());
        }
        if field.entity_count() != self.point_count() {
            return Err(WeldError::SizeMismatch {
                context: "apply displacement",
                expected: self.point_count() * field.components(),
                found: field.values().len(),
            });
        }
        let take = field.components().min(3);
        for (index, point) in self.points.iter_mut().enumerate() {
            let tuple = field.tuple(index)?;
            for (axis, delta) in tuple.iter().enumerate().take(take) {
                point[axis] += delta * scale;
            }
        }
        info!("applied displacement to {} points (scale {scale})", self.points.len());
        Ok(())
    }
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::weld_debug_assert_ok!(self.validate_invariants(), "Mesh invalid");
    }

    fn validate_invariants(&self) -> Result<(), WeldError> {
        if self.offsets.len() != self.cell_types.len() + 1 {
            return Err(WeldError::InvariantViolation(format!(
                "offsets length {} does not bracket {} cells",
                self.offsets.len(),
                self.cell_types.len()
            )));
        }
        if self.offsets.first() != Some(&0) {
            return Err(WeldError::InvariantViolation(
                "offsets must start at 0".into(),
            ));
        }
        if self.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(WeldError::InvariantViolation(
                "offsets must be non-decreasing".into(),
            ));
        }
        if self.offsets.last() != Some(&self.connectivity.len()) {
            return Err(WeldError::InvariantViolation(
                "final offset must equal connectivity length".into(),
            ));
        }
        if let Some(&bad) = self
            .connectivity
            .iter()
            .find(|&&node| node >= self.points.len())
        {
            return Err(WeldError::InvariantViolation(format!(
                "connectivity references node {bad} beyond {} points",
                self.points.len()
            )));
        }
        Ok(())
    }
}
