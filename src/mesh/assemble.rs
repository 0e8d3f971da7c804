//! Batched mesh assembly from collected geometry.
//!
//! Cells are emitted in one pass: a types array (E entries), an offsets array
//! (E+1 entries), and a flat connectivity buffer sized exactly to the sum of
//! node counts of accepted elements. An element whose type tag has no target
//! mapping keeps its index slot as an empty cell and advances the offsets by
//! zero.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::debug_invariants::DebugInvariants;
use crate::geometry::GeometryStore;
use crate::mesh::cell_type::CellType;
use crate::mesh::type_map::cell_type_for_tag;
use crate::mesh::Mesh;
use crate::weld_error::WeldError;

/// Builds a columnar mesh from the geometry store.
///
/// # Errors
/// `GeometryReleased` when the store's arrays have been evicted.
pub fn build_mesh(geometry: &GeometryStore) -> Result<Mesh, WeldError> {
    let coords = geometry.coords()?;
    let elements = geometry.elements()?;

    let accepted_len: usize = elements
        .iter()
        .filter(|record| cell_type_for_tag(&record.type_tag).is_some())
        .map(|record| record.connectivity.len())
        .sum();

    let mut cell_types = Vec::with_capacity(elements.len());
    let mut offsets = Vec::with_capacity(elements.len() + 1);
    let mut connectivity = Vec::with_capacity(accepted_len);
    let mut dropped = 0usize;

    offsets.push(0);
    for (ordinal, record) in elements.iter().enumerate() {
        match cell_type_for_tag(&record.type_tag) {
            Some(cell_type) => {
                cell_types.push(cell_type);
                connectivity.extend_from_slice(&record.connectivity);
            }
            None => {
                warn!(
                    "element {ordinal} has unsupported type tag `{}`; emitting empty cell",
                    record.type_tag
                );
                cell_types.push(CellType::Empty);
                dropped += 1;
            }
        }
        offsets.push(connectivity.len());
    }

    let mesh = Mesh {
        points: coords.to_vec(),
        cell_types,
        offsets,
        connectivity,
        point_data: BTreeMap::new(),
        cell_data: BTreeMap::new(),
    };
    mesh.debug_assert_invariants();
    info!(
        "assembled mesh: {} points, {} cells ({dropped} empty)",
        mesh.point_count(),
        mesh.cell_count()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remap::GlobalRemapper;
    use crate::source::{RawElement, RawNode, RawPartition};

    fn partition_with_tags(tags: &[&str]) -> Vec<RawPartition> {
        let nodes = (1..=4)
            .map(|label| RawNode {
                label,
                coords: [f64::from(label), 0.0, 0.0],
            })
            .collect();
        let elements = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| RawElement {
                label: i as i32 + 1,
                type_tag: (*tag).to_string(),
                connectivity: vec![1, 2, 3],
            })
            .collect();
        vec![RawPartition {
            name: "PART-1".into(),
            nodes,
            elements,
        }]
    }

    fn build(tags: &[&str]) -> Mesh {
        let mut remapper = GlobalRemapper::new();
        let store = GeometryStore::build(partition_with_tags(tags), None, &mut remapper);
        build_mesh(&store).unwrap()
    }

    #[test]
    fn offsets_bracket_every_cell() {
        let mesh = build(&["S3", "S3R"]);
        assert_eq!(mesh.offsets(), &[0, 3, 6]);
        assert_eq!(mesh.connectivity().len(), 6);
        assert_eq!(mesh.cell_types(), &[CellType::Triangle, CellType::Triangle]);
    }

    #[test]
    fn unmapped_tag_keeps_slot_and_shrinks_connectivity() {
        let supported = build(&["S3", "S3"]);
        let mixed = build(&["S3", "SPRINGA"]);

        // element count unchanged
        assert_eq!(mixed.cell_count(), supported.cell_count());
        // the empty slot contributes no connectivity
        assert_eq!(
            mixed.connectivity().len(),
            supported.connectivity().len() - 3
        );
        let (cell_type, conn) = mixed.cell(1).unwrap();
        assert!(cell_type.is_empty_cell());
        assert!(conn.is_empty());
        // offsets still advance by zero over the empty slot
        assert_eq!(mixed.offsets(), &[0, 3, 3]);
    }

    #[test]
    fn released_geometry_cannot_be_assembled() {
        let mut remapper = GlobalRemapper::new();
        let mut store =
            GeometryStore::build(partition_with_tags(&["S3"]), None, &mut remapper);
        store.release();
        assert_eq!(
            build_mesh(&store).unwrap_err(),
            WeldError::GeometryReleased
        );
    }
}
