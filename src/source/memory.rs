//! In-memory [`ResultDatabase`] backed by plain vectors.
//!
//! Primarily a fixture backend for tests and benches, but also usable for
//! small synthetic models assembled programmatically.

use std::collections::HashMap;

use crate::source::{FrameInfo, RawField, RawPartition, ResultDatabase, StepInfo};
use crate::weld_error::WeldError;

/// A `ResultDatabase` whose contents are handed in up front.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    partitions: Vec<RawPartition>,
    declared_counts: Option<(usize, usize)>,
    steps: Vec<StepInfo>,
    fields: HashMap<(String, i32), Vec<RawField>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a partition; scan order follows insertion order.
    pub fn with_partition(mut self, partition: RawPartition) -> Self {
        self.partitions.push(partition);
        self
    }

    /// Overrides the declared node/element totals.
    pub fn with_declared_counts(mut self, nodes: usize, elements: usize) -> Self {
        self.declared_counts = Some((nodes, elements));
        self
    }

    /// Appends a frame to `step`, creating the step on first use.
    pub fn with_frame(mut self, step: &str, frame: FrameInfo) -> Self {
        match self.steps.iter_mut().find(|s| s.name == step) {
            Some(existing) => existing.frames.push(frame),
            None => self.steps.push(StepInfo {
                name: step.to_string(),
                frames: vec![frame],
            }),
        }
        self
    }

    /// Stores a field output under `(step, frame_index)`.
    ///
    /// The frame itself must still be registered via
    /// [`with_frame`](Self::with_frame) for lookups to succeed.
    pub fn with_field(mut self, step: &str, frame_index: i32, field: RawField) -> Self {
        self.fields
            .entry((step.to_string(), frame_index))
            .or_default()
            .push(field);
        self
    }

    fn check_frame(&self, step: &str, frame_index: i32) -> Result<(), WeldError> {
        let step_info = self
            .steps
            .iter()
            .find(|s| s.name == step)
            .ok_or_else(|| WeldError::StepNotFound(step.to_string()))?;
        if step_info
            .frames
            .iter()
            .any(|f| f.frame_index == frame_index)
        {
            Ok(())
        } else {
            Err(WeldError::FrameNotFound {
                step: step.to_string(),
                frame: frame_index,
            })
        }
    }
}

impl ResultDatabase for MemorySource {
    fn partitions(&self) -> Vec<RawPartition> {
        self.partitions.clone()
    }

    fn declared_counts(&self) -> Option<(usize, usize)> {
        self.declared_counts
    }

    fn steps(&self) -> Vec<StepInfo> {
        self.steps.clone()
    }

    fn field_outputs(&self, step: &str, frame_index: i32) -> Result<Vec<RawField>, WeldError> {
        self.check_frame(step, frame_index)?;
        Ok(self
            .fields
            .get(&(step.to_string(), frame_index))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FieldLocation, RawBlock};

    fn frame(index: i32, value: f64) -> FrameInfo {
        FrameInfo {
            frame_index: index,
            frame_value: value,
            description: String::new(),
        }
    }

    #[test]
    fn unknown_step_and_frame_are_not_found() {
        let src = MemorySource::new().with_frame("Step-1", frame(0, 0.0));
        assert_eq!(
            src.field_outputs("Step-2", 0).unwrap_err(),
            WeldError::StepNotFound("Step-2".into())
        );
        assert_eq!(
            src.field_outputs("Step-1", 5).unwrap_err(),
            WeldError::FrameNotFound {
                step: "Step-1".into(),
                frame: 5
            }
        );
    }

    #[test]
    fn missing_field_is_local_to_its_name() {
        let src = MemorySource::new()
            .with_frame("Step-1", frame(0, 0.0))
            .with_field(
                "Step-1",
                0,
                RawField {
                    name: "U".into(),
                    location: FieldLocation::Nodal,
                    component_labels: vec!["U1".into(), "U2".into(), "U3".into()],
                    description: String::new(),
                    blocks: vec![RawBlock {
                        width: 3,
                        labels: vec![1],
                        values: vec![1.0, 2.0, 3.0],
                    }],
                },
            );
        assert!(src.field_output("Step-1", 0, "U").is_ok());
        assert_eq!(
            src.field_output("Step-1", 0, "S").unwrap_err(),
            WeldError::FieldNotFound("S".into())
        );
    }

    #[test]
    fn frames_group_under_one_step() {
        let src = MemorySource::new()
            .with_frame("Step-1", frame(0, 0.0))
            .with_frame("Step-1", frame(1, 0.5));
        let steps = src.steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].frames.len(), 2);
    }
}
