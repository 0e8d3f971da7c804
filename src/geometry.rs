//! GeometryStore: globally-indexed coordinates, connectivity and type tags.
//!
//! Built in a single stable-order scan over the partitions; the same scan
//! feeds the [`GlobalRemapper`](crate::remap::GlobalRemapper). The store is
//! evictable: once the mesh has been assembled, [`GeometryStore::release`]
//! frees the arrays while the remapper's label maps stay alive for field
//! lookups.

use log::{info, warn};

use crate::remap::{EntityClass, GlobalRemapper};
use crate::source::RawPartition;
use crate::weld_error::WeldError;

/// One element in the global index space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementRecord {
    /// Connectivity as global node indices, always `< node_count`.
    pub connectivity: Vec<usize>,
    /// Source element-type tag, copied verbatim.
    pub type_tag: String,
}

/// Per-global-id geometry arrays collected from all partitions.
#[derive(Clone, Debug, Default)]
pub struct GeometryStore {
    coords: Vec<[f64; 3]>,
    elements: Vec<ElementRecord>,
    node_count: usize,
    element_count: usize,
    released: bool,
}

impl GeometryStore {
    /// Scans `partitions` in order, filling `remapper` and collecting
    /// coordinates, resolved connectivity and type tags.
    ///
    /// An element node reference that does not resolve within its own
    /// partition falls back to global node 0 and is logged; it is never left
    /// dangling. If `declared` counts disagree with what was collected, the
    /// store proceeds with the smaller of the two and logs a warning.
    pub fn build(
        partitions: Vec<RawPartition>,
        declared: Option<(usize, usize)>,
        remapper: &mut GlobalRemapper,
    ) -> Self {
        let mut coords = Vec::new();
        let mut elements = Vec::new();

        for partition in partitions {
            let RawPartition {
                name,
                nodes,
                elements: raw_elements,
            } = partition;

            let node_labels: Vec<i32> = nodes.iter().map(|n| n.label).collect();
            let element_labels: Vec<i32> = raw_elements.iter().map(|e| e.label).collect();
            remapper.add_partition(&name, &node_labels, &element_labels);

            coords.reserve(nodes.len());
            for node in &nodes {
                coords.push(node.coords);
            }

            elements.reserve(raw_elements.len());
            for element in raw_elements {
                let mut connectivity = Vec::with_capacity(element.connectivity.len());
                for local in element.connectivity {
                    match remapper.resolve_in(&name, local, EntityClass::Node) {
                        Some(index) => connectivity.push(index),
                        None => {
                            warn!(
                                "node label {local} not found in partition `{name}`; \
                                 substituting global node 0"
                            );
                            connectivity.push(0);
                        }
                    }
                }
                elements.push(ElementRecord {
                    connectivity,
                    type_tag: element.type_tag,
                });
            }
        }

        if let Some((declared_nodes, declared_elements)) = declared {
            if declared_nodes != coords.len() {
                warn!(
                    "declared node count {declared_nodes} disagrees with collected {}; \
                     proceeding with the smaller",
                    coords.len()
                );
                coords.truncate(declared_nodes.min(coords.len()));
            }
            if declared_elements != elements.len() {
                warn!(
                    "declared element count {declared_elements} disagrees with collected {}; \
                     proceeding with the smaller",
                    elements.len()
                );
                elements.truncate(declared_elements.min(elements.len()));
            }
        }

        info!(
            "collected geometry: {} nodes, {} elements across {} partition(s)",
            coords.len(),
            elements.len(),
            remapper.spans().len()
        );

        Self {
            node_count: coords.len(),
            element_count: elements.len(),
            coords,
            elements,
            released: false,
        }
    }

    /// Number of global nodes. Stays valid after [`release`](Self::release).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of global elements. Stays valid after [`release`](Self::release).
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Whether the arrays have been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// All node coordinates, indexed by global id.
    ///
    /// # Errors
    /// `GeometryReleased` after [`release`](Self::release).
    pub fn coords(&self) -> Result<&[[f64; 3]], WeldError> {
        if self.released {
            return Err(WeldError::GeometryReleased);
        }
        Ok(&self.coords)
    }

    /// All element records, indexed by global id.
    ///
    /// # Errors
    /// `GeometryReleased` after [`release`](Self::release).
    pub fn elements(&self) -> Result<&[ElementRecord], WeldError> {
        if self.released {
            return Err(WeldError::GeometryReleased);
        }
        Ok(&self.elements)
    }

    /// Coordinates of one global node.
    pub fn node_coord(&self, index: usize) -> Result<[f64; 3], WeldError> {
        let coords = self.coords()?;
        coords
            .get(index)
            .copied()
            .ok_or(WeldError::EntityOutOfRange {
                index,
                count: coords.len(),
            })
    }

    /// One global element record.
    pub fn element(&self, index: usize) -> Result<&ElementRecord, WeldError> {
        let elements = self.elements()?;
        elements.get(index).ok_or(WeldError::EntityOutOfRange {
            index,
            count: self.element_count,
        })
    }

    /// Frees the coordinate, connectivity and type-tag arrays.
    ///
    /// Counts remain queryable; array accessors fail with `GeometryReleased`
    /// until the store is rebuilt.
    pub fn release(&mut self) {
        self.coords = Vec::new();
        self.elements = Vec::new();
        self.released = true;
        info!("geometry arrays released");
    }
}
