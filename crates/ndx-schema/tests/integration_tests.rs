//! Integration tests with extension-style schema scenarios.

use ndx_schema::io::{read, write, MemoryStore};
use ndx_schema::*;

/// A base namespace and an extension that refines it.
fn base_and_extension() -> (Namespace, Namespace) {
    let base = NamespaceBuilder::new("base", "2.0.0")
        .doc("Base types")
        .type_spec(TypeSpec::group("Container"))
        .type_spec(
            TypeSpec::group("Series")
                .extends("Container")
                .attribute(
                    AttributeSpec::new("description", DataKind::Text).with_default("no description"),
                )
                .dataset_field(
                    DatasetSpec::new("data", DataKind::Numeric)
                        .with_attribute(AttributeSpec::new("unit", DataKind::Text)),
                )
                .dataset_field(DatasetSpec::new("timestamps", DataKind::Float64).optional()),
        )
        .type_spec(TypeSpec::group("Device").extends("Container"))
        .type_spec(
            TypeSpec::group("File")
                .attribute(AttributeSpec::new("identifier", DataKind::Text))
                .child(GroupSpec::new("devices", "Device").with_quantity(FieldCardinality::ZeroOrMore))
                .child(
                    GroupSpec::new("acquisition", "Container")
                        .with_quantity(FieldCardinality::ZeroOrMore),
                ),
        )
        .build()
        .unwrap();

    let extension = NamespaceBuilder::new("ndx-ext", "0.1.0")
        .author("Lab")
        .include_type("Series", "base")
        .include_type("Device", "base")
        .type_spec(
            TypeSpec::group("PowerSeries")
                .extends("Series")
                .dataset_field(
                    DatasetSpec::new("data", DataKind::Numeric)
                        .with_shape(Shape::new(vec![None, Some(2)]))
                        .with_dims(vec!["time", "power"])
                        .with_attribute(AttributeSpec::new("unit", DataKind::Text).with_default("watts")),
                )
                .link(LinkSpec::new("device", "Device")),
        )
        .build()
        .unwrap();

    (base, extension)
}

#[test]
fn test_extension_flattening() {
    let (base, extension) = base_and_extension();
    let mut registry = TypeRegistry::new();
    registry.register(base).unwrap();
    registry.register(extension).unwrap();

    let resolved = registry.resolve("PowerSeries").unwrap();
    assert_eq!(resolved.namespace, "ndx-ext");
    assert_eq!(resolved.ancestry, vec!["Container", "Series", "PowerSeries"]);
    let names: Vec<&str> = resolved.fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["description", "data", "timestamps", "device"]);

    match resolved.field("data") {
        Some(FieldSpec::Dataset(data)) => {
            assert_eq!(data.shape, Some(Shape::new(vec![None, Some(2)])));
            assert_eq!(data.attribute("unit").unwrap().default_value, Some(Value::from("watts")));
        }
        other => panic!("unexpected data field {:?}", other),
    }

    assert!(registry.is_subtype("PowerSeries", "Container"));
    assert_eq!(registry.subtypes_of("Series"), vec!["PowerSeries".to_string()]);
}

#[test]
fn test_extension_requires_base() {
    let (_, extension) = base_and_extension();
    let mut registry = TypeRegistry::new();
    assert!(matches!(
        registry.register(extension),
        Err(SchemaDefinitionError::UnresolvedInclude { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_session_round_trip() {
    let (base, extension) = base_and_extension();
    let mut registry = TypeRegistry::new();
    registry.register(base).unwrap();
    registry.register(extension).unwrap();

    let mut tree = ContainerTree::new();
    let laser = tree.construct(&registry, "Device", "laser", FieldValues::new()).unwrap();
    let power = tree
        .construct(
            &registry,
            "PowerSeries",
            "power",
            FieldValues::new()
                .data("data", ndarray::Array2::<f64>::zeros((50, 2)).into_dyn())
                .link("device", laser),
        )
        .unwrap();
    let file = tree
        .construct(
            &registry,
            "File",
            "root",
            FieldValues::new()
                .attribute("identifier", "abc")
                .children("devices", vec![laser])
                .children("acquisition", vec![power]),
        )
        .unwrap();

    let report = TreeValidator::new(&tree, file).validate();
    assert!(report.is_valid(), "{:?}", report.errors);

    let mut store = MemoryStore::new();
    write(&tree, file, &mut store).unwrap();
    let (copy, root) = read(&store, &registry).unwrap();

    let power = copy.get(copy.get(root).unwrap().child("acquisition", "power").unwrap()).unwrap();
    assert_eq!(power.type_name(), "PowerSeries");
    assert!(power.is_a("Container"));
    assert_eq!(power.text("description"), Some("no description"));
    assert_eq!(
        power.dataset("data").unwrap().attribute("unit"),
        Some(&Value::from("watts"))
    );
    assert_eq!(copy.path(power.link("device").unwrap()), "/devices/laser");
}

#[test]
fn test_namespace_documents() {
    let (base, extension) = base_and_extension();

    let yaml = extension.to_yaml().unwrap();
    assert_eq!(Namespace::from_yaml(&yaml).unwrap(), extension);
    let json = base.to_json().unwrap();
    assert_eq!(Namespace::from_json(&json).unwrap(), base);

    let mut registry = TypeRegistry::new();
    assert_eq!(registry.load(base.clone()).unwrap(), LoadOutcome::Loaded);
    assert_eq!(registry.load(base).unwrap(), LoadOutcome::AlreadyLoaded);
    assert_eq!(
        registry.load(Namespace::from_yaml(&yaml).unwrap()).unwrap(),
        LoadOutcome::Loaded
    );
}

#[test]
fn test_conflicting_versions() {
    let (base, _) = base_and_extension();
    let mut newer = base.clone();
    newer.version = "2.1.0".to_string();

    let mut registry = TypeRegistry::new();
    registry.load(base).unwrap();
    assert!(matches!(
        registry.load(newer),
        Err(SchemaDefinitionError::VersionConflict { ref loaded, ref requested, .. })
            if loaded == "2.0.0" && requested == "2.1.0"
    ));
}

#[test]
fn test_errors_convert_to_umbrella() {
    fn build(registry: &TypeRegistry) -> Result<ContainerId> {
        let mut tree = ContainerTree::new();
        Ok(tree.construct(registry, "File", "root", FieldValues::new())?)
    }

    let (base, _) = base_and_extension();
    let mut registry = TypeRegistry::new();
    registry.register(base).unwrap();
    let err = build(&registry).unwrap_err();
    assert!(matches!(err, Error::Field(FieldValidationError::MissingField { .. })));
    assert!(err.to_string().contains("identifier"));
}
