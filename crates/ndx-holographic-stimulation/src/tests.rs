//! Unit tests for the typed wrappers and namespace loading.

use ndarray::Array2;
use ndx_schema::{
    global, ContainerTree, FieldValidationError, FieldValues, LoadOutcome, NeurodataType,
    SchemaDefinitionError, TypeRegistry,
};

use crate::*;

fn region(tree: &mut ContainerTree, registry: &TypeRegistry) -> ndx_schema::ContainerId {
    let table = tree
        .insert_typed(registry, &DynamicTable::new("PlaneSegmentation", "ROIs"))
        .unwrap();
    tree.insert_typed(
        registry,
        &DynamicTableRegion::new("rois", "the first of two ROIs", vec![0, 1], table),
    )
    .unwrap()
}

fn spiral() -> SpiralScanning {
    SpiralScanning {
        name: "spiral_scanning".to_string(),
        description: "Spiral scanning beam pattern".to_string(),
        spiral_duration: 15e-3,
        spiral_diameter: 15e-6,
        spiral_height: 10e-6,
        num_revolutions: 5,
        num_spirals: 5,
        isi_spiral: 10e-3,
    }
}

#[test]
fn test_load_namespaces_lifecycle() {
    let registry = load_namespaces().unwrap();
    assert_eq!(registry.namespace(NAMESPACE).unwrap().version, VERSION);
    assert!(registry.resolve("HolographicSeries").is_ok());

    let again = load_namespaces().unwrap();
    assert_eq!(again.namespaces().count(), 3);

    let mut newer = holographic_stimulation().unwrap();
    newer.version = "0.2.0".to_string();
    assert!(matches!(
        global::load(newer),
        Err(SchemaDefinitionError::VersionConflict { .. })
    ));
    assert_eq!(
        global::load(holographic_stimulation().unwrap()).unwrap(),
        LoadOutcome::AlreadyLoaded
    );
}

#[test]
fn test_spiral_scanning_round_trip() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let id = tree.insert_typed(&registry, &spiral()).unwrap();

    let back: SpiralScanning = tree.get_typed(id).unwrap();
    assert_eq!(back.num_revolutions, 5);
    assert_eq!(back.spiral_duration, 15e-3);
    assert!(tree.get(id).unwrap().is_a("DynamicTable"));
}

#[test]
fn test_spiral_counts_fit_int8() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let mut pattern = spiral();
    pattern.num_spirals = 300;
    assert!(matches!(
        tree.insert_typed(&registry, &pattern),
        Err(FieldValidationError::OutOfRange { .. })
    ));
    assert!(tree.is_empty());
}

#[test]
fn test_pattern_owns_beam_shapes() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let spiral = tree.insert_typed(&registry, &spiral()).unwrap();
    let focusing = tree
        .insert_typed(
            &registry,
            &TemporalFocusing {
                name: "temporal_focusing".to_string(),
                description: "temporal focusing".to_string(),
                lateral_psf: "5 um +/- 1 um".to_string(),
                axial_psf: "12 um +/- 3 um".to_string(),
                duration: 2e-3,
                num_repetitions: 3,
                isi: 1e-3,
            },
        )
        .unwrap();

    let pattern = HolographicStimulusPattern::new("pattern")
        .with_description("5 revolutions, 5 repetitions")
        .with_spiral_scanning(spiral)
        .with_temporal_focusing(focusing);
    let id = tree.insert_typed(&registry, &pattern).unwrap();

    assert_eq!(tree.get_typed::<HolographicStimulusPattern>(id).unwrap(), pattern);
    assert_eq!(tree.parent_of(spiral), Some(id));
    assert_eq!(tree.path(focusing), "/temporal_focusing/temporal_focusing");
}

#[test]
fn test_pattern_rejects_wrong_child_type() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let device = tree.insert_typed(&registry, &Device::new("device")).unwrap();
    let result = tree.construct(
        &registry,
        HolographicStimulusPattern::TYPE_NAME,
        "pattern",
        FieldValues::new().child("spiral_scanning", device),
    );
    assert!(matches!(result, Err(FieldValidationError::LinkTargetType { .. })));
}

#[test]
fn test_site_requires_device() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let result = tree.construct(
        &registry,
        HolographicStimulusSite::TYPE_NAME,
        "site",
        FieldValues::new()
            .attribute("description", "example site")
            .attribute("excitation_lambda", 600.0)
            .attribute("location", "VISrl"),
    );
    assert!(matches!(
        result,
        Err(FieldValidationError::MissingField { ref field, .. }) if field == "device"
    ));
    assert!(tree.is_empty());
}

#[test]
fn test_site_link_must_be_a_device() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let pattern = tree
        .insert_typed(&registry, &HolographicStimulusPattern::new("pattern"))
        .unwrap();
    let site = HolographicStimulusSite::new("site", pattern, "example site", 600.0, "VISrl");
    assert!(matches!(
        tree.insert_typed(&registry, &site),
        Err(FieldValidationError::LinkTargetType { .. })
    ));
}

#[test]
fn test_series_defaults_and_shape() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let rois = region(&mut tree, &registry);

    let series = HolographicSeries::new("holo", Array2::<f64>::zeros((100, 2)).into_dyn(), rois)
        .with_timestamps((0..100).map(|i| i as f64 * 0.1).collect())
        .with_stimulation_wavelength(1035.0);
    assert_eq!(series.num_rois(), Some(2));
    let id = tree.insert_typed(&registry, &series).unwrap();

    let container = tree.get(id).unwrap();
    let data = container.dataset("data").unwrap();
    assert_eq!(data.attribute("unit").and_then(|v| v.as_str()), Some("watts"));
    assert_eq!(data.attribute("resolution").and_then(|v| v.as_f64()), Some(-1.0));
    assert_eq!(
        container.dataset("timestamps").unwrap().attribute("unit").and_then(|v| v.as_str()),
        Some("seconds")
    );
    assert_eq!(tree.get_typed::<HolographicSeries>(id).unwrap(), series);
}

#[test]
fn test_series_rejects_one_dimensional_data() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let rois = region(&mut tree, &registry);

    let series = HolographicSeries::new("holo", ndarray::Array1::<f64>::zeros(100).into_dyn(), rois);
    assert!(matches!(
        tree.insert_typed(&registry, &series),
        Err(FieldValidationError::RankMismatch { expected: 2, found: 1, .. })
    ));
    assert_eq!(tree.parent_of(rois), None);
}

#[test]
fn test_series_starting_time() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let rois = region(&mut tree, &registry);

    let series = HolographicSeries::new("holo", Array2::<f64>::ones((10, 2)).into_dyn(), rois)
        .with_starting_time(0.5, 30.0);
    let id = tree.insert_typed(&registry, &series).unwrap();
    let back: HolographicSeries = tree.get_typed(id).unwrap();
    assert_eq!(back.starting_time, Some(StartingTime { time: 0.5, rate: 30.0 }));
}

#[test]
fn test_holographic_type_dispatch() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();

    let value: HolographicType = spiral().into();
    assert_eq!(value.type_name(), "SpiralScanning");
    assert_eq!(value.name(), "spiral_scanning");
    let id = value.insert(&mut tree, &registry).unwrap();
    assert_eq!(HolographicType::from_tree(&tree, id).unwrap(), value);

    let device = tree.insert_typed(&registry, &Device::new("device")).unwrap();
    assert!(matches!(
        HolographicType::from_tree(&tree, device),
        Err(FieldValidationError::WrongKind { .. })
    ));
    assert_eq!(HolographicType::TYPE_NAMES.len(), 5);
    for name in HolographicType::TYPE_NAMES {
        assert_eq!(registry.owner_of(name), Some(NAMESPACE));
    }
}

#[test]
fn test_nwb_file_slots() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let device = tree.insert_typed(&registry, &Device::new("device")).unwrap();
    let pattern = tree
        .insert_typed(&registry, &HolographicStimulusPattern::new("pattern"))
        .unwrap();

    let mut file = NwbFile::new("session", "abc").with_session_start_time("2024-01-01T00:00:00Z");
    file.devices.push(device);
    file.lab_meta_data.push(pattern);
    let root = tree.insert_typed(&registry, &file).unwrap();

    assert_eq!(tree.get(root).unwrap().name(), "root");
    assert_eq!(tree.get_typed::<NwbFile>(root).unwrap(), file);
    assert_eq!(tree.path(pattern), "/lab_meta_data/pattern");
}
