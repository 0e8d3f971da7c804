//! Dataset: one logical session over an open result database.
//!
//! Opening a dataset runs the partition scan exactly once, populating the
//! [`GlobalRemapper`] and the [`GeometryStore`], and caches the step/frame
//! index. Field loads are per-frame and re-extract from the upstream blocks
//! on demand; nothing here suspends mid-way and nothing is shared across
//! sessions.
//!
//! Memory discipline: after [`Dataset::build_mesh`] the geometry arrays can
//! be released with [`Dataset::release_geometry`] while label maps persist
//! for later field lookups, and any loaded field can be moved out with
//! [`Dataset::take_field`] so peak usage stays near "one mesh + one field".

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use itertools::Itertools;
use log::{info, warn};

use crate::field::{FieldArray, FieldDescriptor, FieldExtractor, WELL_KNOWN_FIELDS};
use crate::geometry::GeometryStore;
use crate::mesh::assemble::build_mesh;
use crate::mesh::Mesh;
use crate::remap::GlobalRemapper;
use crate::source::{ResultDatabase, StepFrameInfo, StepInfo};
use crate::weld_error::WeldError;

/// One open result set: scan-once geometry, step/frame index, per-frame
/// field cache.
#[derive(Debug)]
pub struct Dataset<D: ResultDatabase> {
    db: D,
    remapper: GlobalRemapper,
    geometry: GeometryStore,
    steps: Vec<StepInfo>,
    steps_frames: Vec<StepFrameInfo>,
    current: Option<StepFrameInfo>,
    fields: BTreeMap<String, (FieldDescriptor, FieldArray)>,
}

impl<D: ResultDatabase> Dataset<D> {
    /// Opens a database: scans partitions once and reads the step/frame
    /// index. Never re-run for the same open dataset.
    pub fn open(db: D) -> Self {
        let mut remapper = GlobalRemapper::new();
        let declared = db.declared_counts();
        let geometry = GeometryStore::build(db.partitions(), declared, &mut remapper);

        let steps = db.steps();
        let steps_frames: Vec<StepFrameInfo> = steps
            .iter()
            .flat_map(|step| {
                step.frames
                    .iter()
                    .sorted_by_key(|frame| frame.frame_index)
                    .map(|frame| StepFrameInfo {
                        step_name: step.name.clone(),
                        frame_index: frame.frame_index,
                        frame_value: frame.frame_value,
                        description: frame.description.clone(),
                    })
            })
            .collect();
        info!(
            "opened result set: {} nodes, {} elements, {} frame(s) across {} step(s)",
            geometry.node_count(),
            geometry.element_count(),
            steps_frames.len(),
            steps.len()
        );

        Self {
            db,
            remapper,
            geometry,
            steps,
            steps_frames,
            current: None,
            fields: BTreeMap::new(),
        }
    }

    /// The label federation built during the scan.
    pub fn remapper(&self) -> &GlobalRemapper {
        &self.remapper
    }

    /// The collected geometry arrays.
    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    /// All frames, grouped by step and ordered by ascending frame index.
    pub fn steps_frames(&self) -> &[StepFrameInfo] {
        &self.steps_frames
    }

    /// The frame whose fields are currently loaded, if any.
    pub fn current_frame(&self) -> Option<&StepFrameInfo> {
        self.current.as_ref()
    }

    /// Light probe: descriptors of the fields stored for one frame, without
    /// extracting any bulk data.
    ///
    /// # Errors
    /// `StepNotFound` / `FrameNotFound` for an invalid frame reference.
    pub fn list_fields(
        &self,
        step: &str,
        frame: i32,
    ) -> Result<Vec<FieldDescriptor>, WeldError> {
        self.frame_info(step, frame)?;
        Ok(self
            .db
            .field_outputs(step, frame)?
            .iter()
            .map(FieldDescriptor::from_raw)
            .collect())
    }

    /// Loads every well-known field present in a frame, replacing the
    /// previously loaded set. Returns how many fields were loaded.
    ///
    /// A well-known field absent from the frame is skipped, not an error.
    ///
    /// # Errors
    /// `StepNotFound` / `FrameNotFound` for an invalid frame reference.
    pub fn load_frame(&mut self, step: &str, frame: i32) -> Result<usize, WeldError> {
        let current = self.frame_info(step, frame)?;
        self.fields.clear();
        self.current = Some(current);

        let mut loaded = 0usize;
        for name in WELL_KNOWN_FIELDS {
            match self.db.field_output(step, frame, name) {
                Ok(raw) => {
                    let (descriptor, array) =
                        FieldExtractor::new(&self.remapper).extract(&raw)?;
                    self.fields.insert(name.to_string(), (descriptor, array));
                    loaded += 1;
                }
                Err(WeldError::FieldNotFound(_)) => continue,
                Err(other) => return Err(other),
            }
        }
        info!("loaded {loaded} field(s) for step `{step}`, frame {frame}");
        Ok(loaded)
    }

    /// Loads one named field on demand without resetting other loaded
    /// fields. Safe to call repeatedly for different fields.
    ///
    /// # Errors
    /// `StepNotFound` / `FrameNotFound` for an invalid frame reference;
    /// `FieldNotFound` when the frame stores no field of that name (other
    /// loaded fields are unaffected).
    pub fn load_field(
        &mut self,
        step: &str,
        frame: i32,
        name: &str,
    ) -> Result<&FieldArray, WeldError> {
        let current = self.frame_info(step, frame)?;
        let raw = self.db.field_output(step, frame, name)?;
        let (descriptor, array) = FieldExtractor::new(&self.remapper).extract(&raw)?;
        if let Some(previous) = &self.current {
            if previous.step_name != current.step_name
                || previous.frame_index != current.frame_index
            {
                warn!(
                    "field `{name}` loaded from step `{}` frame {} alongside fields from \
                     step `{}` frame {}",
                    current.step_name,
                    current.frame_index,
                    previous.step_name,
                    previous.frame_index
                );
            }
        }
        self.current = Some(current);
        let entry = match self.fields.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert((descriptor, array));
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert((descriptor, array)),
        };
        Ok(&entry.1)
    }

    /// A loaded field with its descriptor.
    pub fn field(&self, name: &str) -> Option<(&FieldDescriptor, &FieldArray)> {
        self.fields
            .get(name)
            .map(|(descriptor, array)| (descriptor, array))
    }

    /// Whether a field is currently loaded.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of the currently loaded fields in deterministic order.
    pub fn loaded_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Moves a loaded field out of the session (eviction after attach).
    /// Re-requesting the field later re-extracts it from the upstream blocks.
    pub fn take_field(&mut self, name: &str) -> Option<(FieldDescriptor, FieldArray)> {
        self.fields.remove(name)
    }

    /// Assembles a mesh from the collected geometry.
    ///
    /// # Errors
    /// `GeometryReleased` once [`release_geometry`](Self::release_geometry)
    /// has been called.
    pub fn build_mesh(&self) -> Result<Mesh, WeldError> {
        build_mesh(&self.geometry)
    }

    /// Evicts the geometry arrays. Already-built meshes are unaffected and
    /// the remapper keeps serving field lookups.
    pub fn release_geometry(&mut self) {
        self.geometry.release();
    }

    fn frame_info(&self, step: &str, frame: i32) -> Result<StepFrameInfo, WeldError> {
        let step_info = self
            .steps
            .iter()
            .find(|s| s.name == step)
            .ok_or_else(|| WeldError::StepNotFound(step.to_string()))?;
        let frame_info = step_info
            .frames
            .iter()
            .find(|f| f.frame_index == frame)
            .ok_or_else(|| WeldError::FrameNotFound {
                step: step.to_string(),
                frame,
            })?;
        Ok(StepFrameInfo {
            step_name: step_info.name.clone(),
            frame_index: frame_info.frame_index,
            frame_value: frame_info.frame_value,
            description: frame_info.description.clone(),
        })
    }
}
