//! FieldExtractor: blocked, label-keyed raw records into dense arrays.
//!
//! Raw data arrives as a sequence of bulk blocks, each carrying a width and a
//! list of labeled entity rows. A row may span several sub-samples (e.g.
//! multiple integration points per element); only the **first** sub-sample is
//! kept. That is the documented policy, not an average.
//!
//! Labels resolve through the [`GlobalRemapper`]; unresolved labels advance
//! the source cursor without writing, so the dense array is always exactly
//! total-entity-sized and never partially shifted.

use log::{info, warn};

use crate::field::{FieldArray, FieldDescriptor};
use crate::remap::{EntityClass, GlobalRemapper};
use crate::source::{FieldLocation, RawField};
use crate::weld_error::WeldError;

/// Field names extracted eagerly when a whole frame is loaded.
pub const WELL_KNOWN_FIELDS: [&str; 3] = ["U", "UR", "S"];

/// Converts raw field records into dense [`FieldArray`]s.
#[derive(Clone, Copy, Debug)]
pub struct FieldExtractor<'a> {
    remapper: &'a GlobalRemapper,
}

impl<'a> FieldExtractor<'a> {
    /// Extractor over an already-populated remapper.
    pub fn new(remapper: &'a GlobalRemapper) -> Self {
        Self { remapper }
    }

    /// Extracts one raw field into a dense array plus its descriptor.
    ///
    /// The result always satisfies
    /// `values.len() == entity_count * components`, regardless of how many
    /// blocks were partial or how many labels failed to resolve. Safe to call
    /// repeatedly for different fields of the same frame.
    pub fn extract(&self, raw: &RawField) -> Result<(FieldDescriptor, FieldArray), WeldError> {
        let descriptor = FieldDescriptor::from_raw(raw);
        let class = match raw.location {
            FieldLocation::Nodal => EntityClass::Node,
            FieldLocation::Elemental => EntityClass::Element,
        };
        let entity_count = self.remapper.count(class);
        let mut array = FieldArray::zeroed(entity_count, descriptor.components);

        for (block_no, block) in raw.blocks.iter().enumerate() {
            if block.width == 0 || block.labels.is_empty() {
                continue;
            }
            if block.width != descriptor.components {
                warn!(
                    "field `{}` block {block_no}: width {} disagrees with {} components; \
                     copying the overlap",
                    raw.name, block.width, descriptor.components
                );
            }
            let take = block.width.min(descriptor.components);
            let stride = block.width * block.sub_samples();
            let mut cursor = 0usize;
            for &label in &block.labels {
                if cursor + block.width > block.values.len() {
                    warn!(
                        "field `{}` block {block_no} is truncated after {} of {} rows",
                        raw.name,
                        cursor / stride.max(1),
                        block.labels.len()
                    );
                    break;
                }
                let index = self.remapper.resolve(label, class);
                if index < entity_count {
                    let tuple = array.tuple_mut(index)?;
                    for (component, slot) in tuple.iter_mut().enumerate().take(take) {
                        *slot = f64::from(block.values[cursor + component]);
                    }
                    array.mark_valid(index);
                }
                cursor += stride;
            }
        }

        info!(
            "extracted field `{}`: {} of {} entities valid, {} component(s)",
            raw.name,
            array.valid().count_set(),
            entity_count,
            descriptor.components
        );
        Ok((descriptor, array))
    }
}
