//! Extraction behavior under partial, multi-sample and repeated loads.

use mesh_weld::prelude::*;

fn grid_partition(nodes: i32, elements: i32) -> RawPartition {
    RawPartition {
        name: "GRID".into(),
        nodes: (1..=nodes)
            .map(|label| RawNode {
                label,
                coords: [f64::from(label), 0.0, 0.0],
            })
            .collect(),
        elements: (1..=elements)
            .map(|label| RawElement {
                label,
                type_tag: "C3D8R".into(),
                connectivity: (1..=8).collect(),
            })
            .collect(),
    }
}

fn stress_field(labels: Vec<i32>, sub_samples: usize) -> RawField {
    let width = 6;
    let mut values = Vec::new();
    for &label in &labels {
        for sample in 0..sub_samples {
            // first sample carries the label as its axial stress; later
            // samples carry garbage that must never land
            let lead = if sample == 0 {
                f64::from(label) as f32
            } else {
                -999.0
            };
            values.push(lead);
            values.extend_from_slice(&[0.0; 5]);
        }
    }
    RawField {
        name: "S".into(),
        location: FieldLocation::Elemental,
        component_labels: (1..=6).map(|i| format!("S{i}")).collect(),
        description: String::new(),
        blocks: vec![RawBlock {
            width,
            labels,
            values,
        }],
    }
}

fn source_with(field: RawField) -> MemorySource {
    MemorySource::new()
        .with_partition(grid_partition(8, 4))
        .with_frame(
            "Step-1",
            FrameInfo {
                frame_index: 0,
                frame_value: 0.0,
                description: String::new(),
            },
        )
        .with_field("Step-1", 0, field)
}

#[test]
fn array_length_is_total_regardless_of_coverage() {
    let mut dataset = Dataset::open(source_with(stress_field(vec![2, 4], 1)));
    let array = dataset.load_field("Step-1", 0, "S").unwrap();
    assert_eq!(array.values().len(), 4 * 6);
    assert_eq!(array.valid().count_set(), 2);
    assert!(array.is_valid(1));
    assert!(array.is_valid(3));
    assert!(!array.is_valid(0));
}

#[test]
fn only_the_first_integration_point_is_kept() {
    let mut dataset = Dataset::open(source_with(stress_field(vec![1, 2, 3, 4], 4)));
    let array = dataset.load_field("Step-1", 0, "S").unwrap();
    for element in 0..4 {
        let tuple = array.tuple(element).unwrap();
        assert_eq!(tuple[0], f64::from(element as i32 + 1));
        assert!(tuple.iter().all(|&v| v != -999.0));
    }
}

#[test]
fn unknown_labels_do_not_shift_later_rows() {
    let mut dataset = Dataset::open(source_with(stress_field(vec![99, 3], 1)));
    let array = dataset.load_field("Step-1", 0, "S").unwrap();
    assert_eq!(array.valid().count_set(), 1);
    // element 3 kept its own values even though the row before it was skipped
    assert_eq!(array.tuple(2).unwrap()[0], 3.0);
}

#[test]
fn derived_von_mises_matches_known_tensor() {
    let mut dataset = Dataset::open(source_with(stress_field(vec![1], 1)));
    dataset.load_field("Step-1", 0, "S").unwrap();
    let (_, stress) = dataset.field("S").unwrap();
    let vm = von_mises(stress).unwrap();
    // (1, 0, 0, 0, 0, 0) is uniaxial: vm equals the axial component
    assert!((vm.tuple(0).unwrap()[0] - 1.0).abs() < 1e-12);
    // uncovered elements produce 0, not an error
    assert_eq!(vm.tuple(1).unwrap(), &[0.0]);
}

#[test]
fn insufficient_components_skip_is_non_fatal() {
    let narrow = RawField {
        name: "S".into(),
        location: FieldLocation::Elemental,
        component_labels: vec!["S11".into(), "S22".into()],
        description: String::new(),
        blocks: vec![RawBlock {
            width: 2,
            labels: vec![1],
            values: vec![5.0, 5.0],
        }],
    };
    let mut dataset = Dataset::open(source_with(narrow));
    dataset.load_field("Step-1", 0, "S").unwrap();
    let (_, stress) = dataset.field("S").unwrap();
    assert_eq!(
        von_mises(stress).unwrap_err(),
        WeldError::InsufficientComponents {
            needed: 6,
            found: 2
        }
    );
    // the base field itself stays usable
    assert_eq!(stress.tuple(0).unwrap(), &[5.0, 5.0]);
}

#[test]
fn reloading_one_field_leaves_others_in_place() {
    let displacement = RawField {
        name: "U".into(),
        location: FieldLocation::Nodal,
        component_labels: vec!["U1".into(), "U2".into(), "U3".into()],
        description: String::new(),
        blocks: vec![RawBlock {
            width: 3,
            labels: (1..=8).collect(),
            values: vec![1.0; 24],
        }],
    };
    let source = source_with(stress_field(vec![1, 2, 3, 4], 1)).with_field(
        "Step-1",
        0,
        displacement,
    );
    let mut dataset = Dataset::open(source);
    dataset.load_frame("Step-1", 0).unwrap();
    assert!(dataset.has_field("U") && dataset.has_field("S"));

    // re-extract S on demand; U must be untouched
    dataset.load_field("Step-1", 0, "S").unwrap();
    assert!(dataset.has_field("U"));
    let (_, u) = dataset.field("U").unwrap();
    assert_eq!(u.valid().count_set(), 8);
}
