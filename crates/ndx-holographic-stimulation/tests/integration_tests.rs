//! Integration tests for whole holographic stimulation sessions.

use ndarray::{Array2, ArrayD};
use ndx_holographic_stimulation::*;
use ndx_schema::io::{read, write, HierarchicalStore, MemoryStore, StoredValue};
use ndx_schema::{
    AttachmentConflictError, ContainerId, ContainerTree, DeferredArray, ElementKind, Error,
    FieldValidationError, SerializationError, TypeRegistry, Value,
};

struct Session {
    tree: ContainerTree,
    root: ContainerId,
    series: ContainerId,
    data: ArrayD<f64>,
}

fn power(num_times: usize) -> ArrayD<f64> {
    Array2::from_shape_fn((num_times, 2), |(t, roi)| t as f64 * 0.25 + roi as f64 * 1e-3).into_dyn()
}

/// A session with one device, one pattern, `num_sites` sites and a 100 x 2 series.
fn session(registry: &TypeRegistry, num_sites: usize) -> Session {
    session_with_data(registry, num_sites, power(100))
}

fn session_with_data(registry: &TypeRegistry, num_sites: usize, data: ArrayD<f64>) -> Session {
    let num_times = data.shape()[0];
    let mut tree = ContainerTree::new();
    let device = tree
        .insert_typed(
            registry,
            &Device::new("device")
                .with_description("spatial light modulator")
                .with_manufacturer("Meadowlark"),
        )
        .unwrap();
    let pattern = tree
        .insert_typed(
            registry,
            &HolographicStimulusPattern::new("pattern").with_description("spiral, 5 revolutions"),
        )
        .unwrap();
    let sites: Vec<ContainerId> = (0..num_sites)
        .rev()
        .map(|i| {
            let site = HolographicStimulusSite::new(
                format!("site_{}", i),
                device,
                "example site",
                600.0,
                "VISrl",
            )
            .with_effector("ChR2")
            .with_stimulus_pattern(pattern);
            tree.insert_typed(registry, &site).unwrap()
        })
        .collect();
    let table = tree
        .insert_typed(registry, &DynamicTable::new("PlaneSegmentation", "segmented ROIs"))
        .unwrap();
    let rois = tree
        .insert_typed(
            registry,
            &DynamicTableRegion::new("rois", "the first two ROIs", vec![0, 1], table),
        )
        .unwrap();

    let mut series = HolographicSeries::new("HolographicSeries", data.clone(), rois)
        .with_timestamps((0..num_times).map(|t| t as f64 / 30.0).collect())
        .with_stimulus_pattern(pattern)
        .with_device(device);
    for site in &sites {
        series = series.with_site(*site);
    }
    let series = tree.insert_typed(registry, &series).unwrap();

    let mut file = NwbFile::new("holographic stimulation session", "session-0001")
        .with_session_start_time("2024-03-01T09:30:00Z");
    file.devices.push(device);
    file.lab_meta_data.push(pattern);
    file.ogen_sites = sites;
    file.analysis.push(table);
    file.stimulus.push(series);
    let root = tree.insert_typed(registry, &file).unwrap();

    Session {
        tree,
        root,
        series,
        data,
    }
}

fn find(tree: &ContainerTree, type_name: &str) -> ContainerId {
    tree.iter()
        .find(|(_, c)| c.type_name() == type_name)
        .map(|(id, _)| id)
        .unwrap()
}

#[test]
fn test_session_round_trip() {
    let registry = registry().unwrap();
    let session = session(&registry, 1);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();

    let (tree, root) = read(&store, &registry).unwrap();
    let file: NwbFile = tree.get_typed(root).unwrap();
    assert_eq!(file.identifier, "session-0001");
    assert_eq!(file.ogen_sites.len(), 1);

    let series_id = tree.get(root).unwrap().child("stimulus", "HolographicSeries").unwrap();
    let series: HolographicSeries = tree.get_typed(series_id).unwrap();
    assert_eq!(series.unit, "watts");
    assert_eq!(series.data.as_array().and_then(|a| a.as_float()), Some(&session.data));
    assert_eq!(series.num_rois(), Some(2));

    let site: HolographicStimulusSite = tree.get_typed(series.site[0]).unwrap();
    assert_eq!(site.name, "site_0");
    assert_eq!(site.effector.as_deref(), Some("ChR2"));

    let pattern: HolographicStimulusPattern =
        tree.get_typed(site.stimulus_pattern.unwrap()).unwrap();
    assert_eq!(pattern.description.as_deref(), Some("spiral, 5 revolutions"));
    assert_eq!(series.stimulus_pattern, site.stimulus_pattern);

    let device: Device = tree.get_typed(site.device).unwrap();
    assert_eq!(device.manufacturer.as_deref(), Some("Meadowlark"));

    let region: DynamicTableRegion = tree.get_typed(series.rois).unwrap();
    assert_eq!(region.rows, vec![0, 1]);
    assert_eq!(tree.get(region.table).unwrap().name(), "PlaneSegmentation");
}

#[test]
fn test_storage_layout() {
    let registry = registry().unwrap();
    let session = session(&registry, 1);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();

    let series = store.node("/stimulus/HolographicSeries").unwrap();
    let attributes = series.attributes().unwrap();
    assert_eq!(
        attributes.get("neurodata_type").and_then(StoredValue::as_text),
        Some("HolographicSeries")
    );
    assert_eq!(
        attributes.get("namespace").and_then(StoredValue::as_text),
        Some(NAMESPACE)
    );
    assert!(store.node("/stimulus/HolographicSeries/data").is_some());
    assert!(store.node("/stimulus/HolographicSeries/rois/rois").is_some());
    assert!(store.node("/lab_meta_data/pattern").is_some());
    assert!(store.node("/analysis/PlaneSegmentation").is_some());
}

#[test]
fn test_site_order_survives_round_trip() {
    let registry = registry().unwrap();
    for num_sites in [0, 1, 4] {
        let session = session(&registry, num_sites);
        let written: Vec<String> = session
            .tree
            .get_typed::<HolographicSeries>(session.series)
            .unwrap()
            .site
            .iter()
            .map(|id| session.tree.get(*id).unwrap().name().to_string())
            .collect();

        let mut store = MemoryStore::new();
        write(&session.tree, session.root, &mut store).unwrap();
        let (tree, _) = read(&store, &registry).unwrap();
        let series: HolographicSeries = tree.get_typed(find(&tree, "HolographicSeries")).unwrap();
        let names: Vec<String> = series
            .site
            .iter()
            .map(|id| tree.get(*id).unwrap().name().to_string())
            .collect();

        assert_eq!(names.len(), num_sites);
        assert_eq!(names, written);
    }
}

#[test]
fn test_duplicate_device_name() {
    let registry = registry().unwrap();
    let mut session = session(&registry, 1);
    let second = session
        .tree
        .insert_typed(&registry, &Device::new("device"))
        .unwrap();

    let result = session.tree.attach(session.root, "devices", second);
    assert!(matches!(
        result,
        Err(AttachmentConflictError::DuplicateName { ref name, .. }) if name == "device"
    ));
    assert_eq!(session.tree.get(session.root).unwrap().children("devices").count(), 1);

    let third = session
        .tree
        .insert_typed(&registry, &Device::new("device"))
        .unwrap();
    let mut file = NwbFile::new("duplicate devices", "session-0002");
    file.devices = vec![second, third];
    assert!(matches!(
        session.tree.insert_typed(&registry, &file),
        Err(FieldValidationError::DuplicateChild { .. })
    ));
}

#[test]
fn test_rename_collision() {
    let registry = registry().unwrap();
    let mut session = session(&registry, 2);
    let first = session.tree.get(session.root).unwrap().child("ogen_sites", "site_0").unwrap();

    assert!(matches!(
        session.tree.rename(first, "site_1"),
        Err(Error::Attachment(AttachmentConflictError::DuplicateName { .. }))
    ));
    session.tree.rename(first, "site_a").unwrap();
    let names: Vec<&str> = session
        .tree
        .get(session.root)
        .unwrap()
        .children("ogen_sites")
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["site_1", "site_a"]);
}

#[test]
fn test_rois_cannot_be_detached() {
    let registry = registry().unwrap();
    let mut session = session(&registry, 1);
    assert!(matches!(
        session.tree.detach(session.series, "rois", "rois"),
        Err(AttachmentConflictError::RequiredSlot { .. })
    ));
    assert!(session.tree.get(session.series).unwrap().child("rois", "rois").is_some());
}

#[test]
fn test_version_mismatch_on_read() {
    let registry = registry().unwrap();
    let session = session(&registry, 1);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();
    store
        .set_attribute(
            "/stimulus/HolographicSeries",
            "namespace_version",
            StoredValue::Scalar(Value::from("0.0.9")),
        )
        .unwrap();

    assert!(matches!(
        read(&store, &registry),
        Err(SerializationError::NamespaceVersionMismatch { ref stored, .. }) if stored == "0.0.9"
    ));
}

#[test]
fn test_deferred_data_with_wrong_width() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let table = tree
        .insert_typed(&registry, &DynamicTable::new("PlaneSegmentation", "ROIs"))
        .unwrap();
    let rois = tree
        .insert_typed(&registry, &DynamicTableRegion::new("rois", "ROIs", vec![0, 1], table))
        .unwrap();

    let streamed = DeferredArray::new(ElementKind::Float, vec![None, Some(2)])
        .with_chunk(ndx_schema::ArrayData::Float(Array2::<f64>::zeros((10, 3)).into_dyn()));
    let series = tree
        .insert_typed(&registry, &HolographicSeries::new("holo", streamed, rois))
        .unwrap();
    let mut file = NwbFile::new("deferred", "session-0003");
    file.stimulus.push(series);
    let root = tree.insert_typed(&registry, &file).unwrap();

    let mut store = MemoryStore::new();
    assert!(matches!(
        write(&tree, root, &mut store),
        Err(SerializationError::Validation { .. })
    ));
    assert_eq!(store, MemoryStore::new());
}

#[test]
fn test_deferred_data_written_in_full() {
    let registry = registry().unwrap();
    let mut tree = ContainerTree::new();
    let table = tree
        .insert_typed(&registry, &DynamicTable::new("PlaneSegmentation", "ROIs"))
        .unwrap();
    let rois = tree
        .insert_typed(&registry, &DynamicTableRegion::new("rois", "ROIs", vec![0, 1], table))
        .unwrap();

    let streamed = DeferredArray::new(ElementKind::Float, vec![None, Some(2)])
        .with_chunk(ndx_schema::ArrayData::Float(power(40)))
        .with_chunk(ndx_schema::ArrayData::Float(power(60)));
    let series = tree
        .insert_typed(&registry, &HolographicSeries::new("holo", streamed, rois))
        .unwrap();
    let mut file = NwbFile::new("deferred", "session-0004");
    file.stimulus.push(series);
    file.analysis.push(table);
    let root = tree.insert_typed(&registry, &file).unwrap();

    let mut store = MemoryStore::new();
    write(&tree, root, &mut store).unwrap();
    let (tree, _) = read(&store, &registry).unwrap();
    let series: HolographicSeries = tree.get_typed(find(&tree, "HolographicSeries")).unwrap();
    let data = series.data.as_array().unwrap();
    assert_eq!(data.shape(), &[100, 2]);
}

#[test]
fn test_json_file_persistence() {
    let registry = registry().unwrap();
    let session = session(&registry, 2);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    store.save(&path).unwrap();
    let reopened = MemoryStore::open(&path).unwrap();
    assert_eq!(reopened, store);

    let (tree, _) = read(&reopened, &registry).unwrap();
    let series: HolographicSeries = tree.get_typed(find(&tree, "HolographicSeries")).unwrap();
    assert_eq!(series.data.as_array().and_then(|a| a.as_float()), Some(&session.data));
    assert_eq!(series.site.len(), 2);
}

#[test]
fn test_dropped_power_readings_survive_reopen() {
    let registry = registry().unwrap();
    let mut data = power(100);
    data[[3, 1]] = f64::NAN;
    data[[7, 0]] = f64::INFINITY;
    let session = session_with_data(&registry, 1, data);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    store.save(&path).unwrap();
    let reopened = MemoryStore::open(&path).unwrap();

    let (tree, _) = read(&reopened, &registry).unwrap();
    let series: HolographicSeries = tree.get_typed(find(&tree, "HolographicSeries")).unwrap();
    let samples = series.data.as_array().and_then(|a| a.as_float()).unwrap();
    assert_eq!(samples.shape(), &[100, 2]);
    assert!(samples[[3, 1]].is_nan());
    assert_eq!(samples[[7, 0]], f64::INFINITY);
    assert_eq!(samples[[3, 0]], session.data[[3, 0]]);
}

#[test]
fn test_dispatch_after_read() {
    let registry = registry().unwrap();
    let session = session(&registry, 1);
    let mut store = MemoryStore::new();
    write(&session.tree, session.root, &mut store).unwrap();
    let (tree, root) = read(&store, &registry).unwrap();

    let mut kinds: Vec<&str> = tree
        .iter()
        .filter_map(|(id, _)| HolographicType::from_tree(&tree, id).ok())
        .map(|value| value.type_name())
        .collect();
    kinds.sort_unstable();
    assert_eq!(
        kinds,
        vec!["HolographicSeries", "HolographicStimulusPattern", "HolographicStimulusSite"]
    );
    assert!(HolographicType::from_tree(&tree, root).is_err());
}
