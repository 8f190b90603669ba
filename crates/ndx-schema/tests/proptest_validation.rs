//! Property-based tests for ndx-schema.
//!
//! These tests use proptest to verify invariants across randomly generated inputs.

use ndx_schema::io::TAG_ATTRIBUTES;
use ndx_schema::{
    validate_version, AttributeSpec, ContainerTree, DataKind, FieldCardinality, FieldValues,
    GroupSpec, NamespaceBuilder, Shape, TypeRegistry, TypeSpec,
};
use proptest::prelude::*;

// Strategy for generating attribute names, minus the reserved tag names
fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
        .prop_map(|s| s.to_string())
        .prop_filter("Reserved", |s| !TAG_ATTRIBUTES.contains(&s.as_str()))
}

// Distinct attribute names for one level of an inheritance chain
fn level_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(field_name_strategy(), 0..5).prop_map(|s| s.into_iter().collect())
}

fn chain_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(level_strategy(), 1..6)
}

/// Build a linear chain `T0 <- T1 <- ...` where each level declares its attributes.
fn chain_namespace(levels: &[Vec<String>]) -> ndx_schema::Namespace {
    let mut builder = NamespaceBuilder::new("chain", "1.0.0");
    for (i, attrs) in levels.iter().enumerate() {
        let mut spec = TypeSpec::group(format!("T{}", i));
        if i > 0 {
            spec = spec.extends(format!("T{}", i - 1));
        }
        for attr in attrs {
            spec = spec.attribute(AttributeSpec::new(attr.clone(), DataKind::Text).optional());
        }
        builder = builder.type_spec(spec);
    }
    builder.build().unwrap()
}

fn dims_strategy() -> impl Strategy<Value = Vec<Option<usize>>> {
    prop::collection::vec(prop::option::of(1usize..8), 0..4)
}

proptest! {
    /// A resolved type holds every field of every ancestor
    #[test]
    fn test_flattening_keeps_ancestor_fields(levels in chain_strategy()) {
        let mut registry = TypeRegistry::new();
        registry.register(chain_namespace(&levels)).unwrap();

        for i in 0..levels.len() {
            let resolved = registry.resolve(&format!("T{}", i)).unwrap();
            prop_assert_eq!(resolved.ancestry.len(), i + 1);
            for level in &levels[..=i] {
                for attr in level {
                    prop_assert!(resolved.field(attr).is_some());
                }
            }
            for j in 0..=i {
                let (sub, sup) = (format!("T{}", i), format!("T{}", j));
                prop_assert!(registry.is_subtype(&sub, &sup));
            }
        }
    }

    /// Register fails or succeeds as a whole
    #[test]
    fn test_register_is_atomic(levels in chain_strategy(), clash in 0usize..6) {
        let mut registry = TypeRegistry::new();
        registry.register(chain_namespace(&levels)).unwrap();

        let name = format!("T{}", clash);
        let clashing = NamespaceBuilder::new("other", "1.0.0")
            .type_spec(TypeSpec::group("Fresh"))
            .type_spec(TypeSpec::group(name.clone()))
            .build()
            .unwrap();
        let result = registry.register(clashing);

        prop_assert_eq!(result.is_err(), clash < levels.len());
        prop_assert_eq!(registry.resolve("Fresh").is_ok(), clash >= levels.len());
    }

    /// Shapes always refine themselves and any fully open shape of the same rank
    #[test]
    fn test_shape_refinement(dims in dims_strategy()) {
        let shape = Shape::new(dims.clone());
        prop_assert!(shape.refines(&shape));
        prop_assert!(shape.refines(&Shape::any_of_rank(dims.len())));
        prop_assert!(!shape.refines(&Shape::any_of_rank(dims.len() + 1)));
    }

    /// Concrete dims always satisfy the shape they were derived from
    #[test]
    fn test_shape_accepts_matching_dims(dims in dims_strategy(), fill in 1usize..8) {
        let shape = Shape::new(dims.clone());
        let concrete: Vec<usize> = dims.iter().map(|d| d.unwrap_or(fill)).collect();
        prop_assert!(shape.check("data", &concrete).is_ok());
    }

    #[test]
    fn test_version_format(major in 0u32..100, minor in 0u32..100, patch in 0u32..100) {
        let version = format!("{}.{}.{}", major, minor, patch);
        prop_assert!(validate_version(&version).is_ok());
        let truncated = format!("{}.{}", major, minor);
        prop_assert!(validate_version(&truncated).is_err());
    }

    /// Cardinality bounds are enforced when constructing slot owners
    #[test]
    fn test_slot_cardinality(count in 0usize..4) {
        let ns = NamespaceBuilder::new("slots", "1.0.0")
            .type_spec(TypeSpec::group("Item"))
            .type_spec(TypeSpec::group("Bag").child(
                GroupSpec::new("items", "Item").with_quantity(FieldCardinality::OneOrMore),
            ))
            .build()
            .unwrap();
        let mut registry = TypeRegistry::new();
        registry.register(ns).unwrap();

        let mut tree = ContainerTree::new();
        let items: Vec<_> = (0..count)
            .map(|i| tree.construct(&registry, "Item", &format!("item{}", i), FieldValues::new()).unwrap())
            .collect();
        let before = tree.len();
        let result = tree.construct(&registry, "Bag", "bag", FieldValues::new().children("items", items));

        prop_assert_eq!(result.is_ok(), count >= 1);
        prop_assert_eq!(tree.len(), if count >= 1 { before + 1 } else { before });
    }
}
