//! GlobalRemapper: one global index space out of partition-local label spaces.
//!
//! Each partition owns a private label namespace; the remapper unifies them
//! into two flat arenas (nodes, elements) of 0-based global indices assigned
//! in encountered order. Cross-partition label collisions are resolved
//! first-writer-wins in the flattened lookup and recorded in a diagnostic set;
//! they are never fatal.
//!
//! The remapper is built once per open dataset, before geometry or field
//! extraction, and persists after the geometry cache is released so field
//! lookups keep working.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use log::warn;

use crate::debug_invariants::DebugInvariants;
use crate::weld_error::WeldError;

/// Sentinel returned by [`GlobalRemapper::resolve`] for unknown labels.
///
/// Callers must tolerate sparse data, so resolution failure is a value, not
/// an error; any comparison `index < entity_count` filters it out.
pub const INVALID_INDEX: usize = usize::MAX;

/// Which entity arena a label belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EntityClass {
    /// Node labels / node arena.
    Node,
    /// Element labels / element arena.
    Element,
}

/// Contiguous slice of the global arenas contributed by one partition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionSpan {
    /// Partition name.
    pub name: String,
    /// First global node index of this partition.
    pub node_start: usize,
    /// Number of nodes this partition contributed.
    pub node_count: usize,
    /// First global element index of this partition.
    pub element_start: usize,
    /// Number of elements this partition contributed.
    pub element_count: usize,
}

/// Label-to-global-index federation across all partitions.
#[derive(Clone, Debug, Default)]
pub struct GlobalRemapper {
    spans: Vec<PartitionSpan>,
    partition_index: HashMap<String, usize>,
    node_lookup: HashMap<i32, usize>,
    element_lookup: HashMap<i32, usize>,
    partition_nodes: Vec<HashMap<i32, usize>>,
    partition_elements: Vec<HashMap<i32, usize>>,
    duplicate_nodes: BTreeSet<i32>,
    duplicate_elements: BTreeSet<i32>,
    node_count: usize,
    element_count: usize,
}

impl GlobalRemapper {
    /// Creates an empty remapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a partition, assigning each label the next unused global
    /// index in encountered order.
    ///
    /// A label already present in the flattened lookup keeps its first
    /// mapping and is added to the duplicate diagnostic set. Every label
    /// still consumes a global index slot, so total counts always equal the
    /// sum across partitions.
    pub fn add_partition(&mut self, name: &str, node_labels: &[i32], element_labels: &[i32]) {
        let span_idx = self.spans.len();
        if self.partition_index.contains_key(name) {
            warn!("partition name `{name}` registered more than once; lookups keep the first");
        } else {
            self.partition_index.insert(name.to_string(), span_idx);
        }

        let node_start = self.node_count;
        let mut node_map = HashMap::with_capacity(node_labels.len());
        for &label in node_labels {
            let global = self.node_count;
            self.node_count += 1;
            if node_map.contains_key(&label) || self.node_lookup.contains_key(&label) {
                self.duplicate_nodes.insert(label);
            }
            node_map.entry(label).or_insert(global);
            self.node_lookup.entry(label).or_insert(global);
        }

        let element_start = self.element_count;
        let mut element_map = HashMap::with_capacity(element_labels.len());
        for &label in element_labels {
            let global = self.element_count;
            self.element_count += 1;
            if element_map.contains_key(&label) || self.element_lookup.contains_key(&label) {
                self.duplicate_elements.insert(label);
            }
            element_map.entry(label).or_insert(global);
            self.element_lookup.entry(label).or_insert(global);
        }

        self.spans.push(PartitionSpan {
            name: name.to_string(),
            node_start,
            node_count: node_labels.len(),
            element_start,
            element_count: element_labels.len(),
        });
        self.partition_nodes.push(node_map);
        self.partition_elements.push(element_map);
        self.debug_assert_invariants();
    }

    /// Resolves a label through the flattened lookup.
    ///
    /// Returns [`INVALID_INDEX`] for unknown labels.
    #[inline]
    pub fn resolve(&self, label: i32, class: EntityClass) -> usize {
        self.try_resolve(label, class).unwrap_or(INVALID_INDEX)
    }

    /// Resolves a label, returning `None` for unknown labels.
    #[inline]
    pub fn try_resolve(&self, label: i32, class: EntityClass) -> Option<usize> {
        match class {
            EntityClass::Node => self.node_lookup.get(&label).copied(),
            EntityClass::Element => self.element_lookup.get(&label).copied(),
        }
    }

    /// Resolves a label within one partition's namespace.
    pub fn resolve_in(&self, partition: &str, label: i32, class: EntityClass) -> Option<usize> {
        let &idx = self.partition_index.get(partition)?;
        match class {
            EntityClass::Node => self.partition_nodes[idx].get(&label).copied(),
            EntityClass::Element => self.partition_elements[idx].get(&label).copied(),
        }
    }

    /// Total number of global node indices assigned.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Total number of global element indices assigned.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Entity count for a location class.
    #[inline]
    pub fn count(&self, class: EntityClass) -> usize {
        match class {
            EntityClass::Node => self.node_count,
            EntityClass::Element => self.element_count,
        }
    }

    /// Partition spans in registration order.
    pub fn spans(&self) -> &[PartitionSpan] {
        &self.spans
    }

    /// Labels that were assigned more than once, in deterministic order.
    pub fn duplicate_labels(&self, class: EntityClass) -> &BTreeSet<i32> {
        match class {
            EntityClass::Node => &self.duplicate_nodes,
            EntityClass::Element => &self.duplicate_elements,
        }
    }
}

impl DebugInvariants for GlobalRemapper {
    fn debug_assert_invariants(&self) {
        crate::weld_debug_assert_ok!(self.validate_invariants(), "GlobalRemapper invalid");
    }

    fn validate_invariants(&self) -> Result<(), WeldError> {
        if self.partition_nodes.len() != self.spans.len()
            || self.partition_elements.len() != self.spans.len()
        {
            return Err(WeldError::InvariantViolation(
                "per-partition maps out of step with spans".into(),
            ));
        }

        let mut next_node = 0usize;
        let mut next_element = 0usize;
        for span in &self.spans {
            if span.node_start != next_node || span.element_start != next_element {
                return Err(WeldError::InvariantViolation(format!(
                    "span `{}` is not contiguous with its predecessor",
                    span.name
                )));
            }
            next_node += span.node_count;
            next_element += span.element_count;
        }
        if next_node != self.node_count || next_element != self.element_count {
            return Err(WeldError::InvariantViolation(
                "span totals disagree with arena counts".into(),
            ));
        }

        for &index in self.node_lookup.values() {
            if index >= self.node_count {
                return Err(WeldError::InvariantViolation(format!(
                    "node lookup maps to out-of-range index {index}"
                )));
            }
        }
        for &index in self.element_lookup.values() {
            if index >= self.element_count {
                return Err(WeldError::InvariantViolation(format!(
                    "element lookup maps to out-of-range index {index}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_indices_in_encountered_order() {
        let mut remapper = GlobalRemapper::new();
        remapper.add_partition("PART-1", &[10, 20, 30], &[1, 2]);
        remapper.add_partition("PART-2", &[40, 50], &[7]);

        assert_eq!(remapper.node_count(), 5);
        assert_eq!(remapper.element_count(), 3);
        assert_eq!(remapper.resolve(10, EntityClass::Node), 0);
        assert_eq!(remapper.resolve(30, EntityClass::Node), 2);
        assert_eq!(remapper.resolve(40, EntityClass::Node), 3);
        assert_eq!(remapper.resolve(7, EntityClass::Element), 2);
    }

    #[test]
    fn unknown_label_resolves_to_sentinel() {
        let mut remapper = GlobalRemapper::new();
        remapper.add_partition("PART-1", &[1], &[]);
        assert_eq!(remapper.resolve(999, EntityClass::Node), INVALID_INDEX);
        assert_eq!(remapper.try_resolve(999, EntityClass::Node), None);
        assert_eq!(remapper.resolve(1, EntityClass::Element), INVALID_INDEX);
    }

    #[test]
    fn cross_partition_duplicate_keeps_first_mapping() {
        let mut remapper = GlobalRemapper::new();
        remapper.add_partition("PART-1", &[10, 20], &[]);
        remapper.add_partition("PART-2", &[20, 30], &[]);

        // first writer wins in the flat lookup
        assert_eq!(remapper.resolve(20, EntityClass::Node), 1);
        // the colliding partition still owns its own slot
        assert_eq!(remapper.resolve_in("PART-2", 20, EntityClass::Node), Some(2));
        // counts stay additive
        assert_eq!(remapper.node_count(), 4);
        // diagnostic set records the label
        let dups: Vec<i32> = remapper
            .duplicate_labels(EntityClass::Node)
            .iter()
            .copied()
            .collect();
        assert_eq!(dups, vec![20]);
    }

    #[test]
    fn per_partition_resolution_is_scoped() {
        let mut remapper = GlobalRemapper::new();
        remapper.add_partition("PART-1", &[5], &[5]);
        remapper.add_partition("PART-2", &[6], &[6]);

        assert_eq!(remapper.resolve_in("PART-1", 5, EntityClass::Node), Some(0));
        assert_eq!(remapper.resolve_in("PART-2", 5, EntityClass::Node), None);
        assert_eq!(remapper.resolve_in("PART-9", 5, EntityClass::Node), None);
        assert_eq!(
            remapper.resolve_in("PART-2", 6, EntityClass::Element),
            Some(1)
        );
    }

    #[test]
    fn spans_cover_the_arenas() {
        let mut remapper = GlobalRemapper::new();
        remapper.add_partition("A", &[1, 2], &[1]);
        remapper.add_partition("B", &[3], &[2, 3]);

        let spans = remapper.spans();
        assert_eq!(spans[0].node_start, 0);
        assert_eq!(spans[0].node_count, 2);
        assert_eq!(spans[1].node_start, 2);
        assert_eq!(spans[1].element_start, 1);
        assert!(remapper.validate_invariants().is_ok());
    }
}
