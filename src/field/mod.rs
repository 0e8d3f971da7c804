//! Field data: descriptors, dense arrays, extraction and derivation.

pub mod array;
pub mod derive;
pub mod extract;

pub use array::{FieldArray, Validity};
pub use extract::{FieldExtractor, WELL_KNOWN_FIELDS};

use serde::{Deserialize, Serialize};

use crate::source::{FieldKind, FieldLocation, RawField};

/// Metadata describing one field output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name (e.g. `U`, `S`).
    pub name: String,
    /// Nodal or elemental.
    pub location: FieldLocation,
    /// Number of components per entity.
    pub components: usize,
    /// Ordered component labels.
    pub component_labels: Vec<String>,
    /// Semantic classification.
    pub kind: FieldKind,
    /// Free-form upstream description.
    pub description: String,
}

impl FieldDescriptor {
    /// Builds a descriptor from a raw field without touching its bulk data.
    ///
    /// When the upstream reports no component labels, the widest block
    /// determines the component count (a scalar output is the common case).
    pub fn from_raw(raw: &RawField) -> Self {
        let components = if raw.component_labels.is_empty() {
            raw.blocks
                .iter()
                .map(|b| b.width)
                .max()
                .unwrap_or(1)
                .max(1)
        } else {
            raw.component_labels.len()
        };
        Self {
            name: raw.name.clone(),
            location: raw.location,
            components,
            component_labels: raw.component_labels.clone(),
            kind: FieldKind::for_name(&raw.name),
            description: raw.description.clone(),
        }
    }
}
