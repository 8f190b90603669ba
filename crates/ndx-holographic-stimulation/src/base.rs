//! Base namespaces the extension builds on.
//!
//! These stand in for the host-provided `hdmf-common` and `core` schemas and
//! carry only the types and fields the extension touches.

use ndx_schema::{
    AttributeSpec, DataKind, DataSpec, DatasetSpec, FieldCardinality, GroupSpec, LinkSpec,
    Namespace, NamespaceBuilder, SchemaDefinitionError, Shape, TypeSpec,
};

pub const HDMF_COMMON: &str = "hdmf-common";
pub const HDMF_COMMON_VERSION: &str = "1.8.0";
pub const CORE: &str = "core";
pub const CORE_VERSION: &str = "2.7.0";

/// Tables and the datasets they are made of.
pub fn hdmf_common() -> Result<Namespace, SchemaDefinitionError> {
    NamespaceBuilder::new(HDMF_COMMON, HDMF_COMMON_VERSION)
        .doc("Common data structures")
        .type_spec(TypeSpec::group("Container").with_doc("An abstract data type for a group storing collections of data and metadata."))
        .type_spec(
            TypeSpec::dataset("Data")
                .with_doc("An abstract data type for a dataset.")
                .with_data(DataSpec::new(DataKind::Numeric)),
        )
        .type_spec(
            TypeSpec::dataset("VectorData")
                .extends("Data")
                .with_doc("An n-dimensional dataset representing a column of a DynamicTable.")
                .attribute(
                    AttributeSpec::new("description", DataKind::Text)
                        .with_doc("Description of what these vectors represent."),
                ),
        )
        .type_spec(
            TypeSpec::dataset("ElementIdentifiers")
                .extends("Data")
                .with_doc("A list of unique identifiers for values within a dataset, e.g. rows of a DynamicTable.")
                .with_data(
                    DataSpec::new(DataKind::Int32)
                        .with_shape(Shape::any_of_rank(1))
                        .with_dims(vec!["num_elements"]),
                ),
        )
        .type_spec(
            TypeSpec::group("DynamicTable")
                .extends("Container")
                .with_doc("A group containing multiple datasets that are aligned on the first dimension.")
                .attribute(
                    AttributeSpec::new("description", DataKind::Text)
                        .with_doc("Description of what is in this dynamic table."),
                )
                .child(
                    GroupSpec::new("id", "ElementIdentifiers")
                        .with_quantity(FieldCardinality::Optional)
                        .with_doc("Array of unique identifiers for the rows of this dynamic table."),
                )
                .child(
                    GroupSpec::new("columns", "VectorData")
                        .with_quantity(FieldCardinality::ZeroOrMore)
                        .with_doc("Vector columns of this dynamic table."),
                ),
        )
        .type_spec(
            TypeSpec::dataset("DynamicTableRegion")
                .extends("VectorData")
                .with_doc("A region/index into a DynamicTable.")
                .with_data(
                    DataSpec::new(DataKind::Int32)
                        .with_shape(Shape::any_of_rank(1))
                        .with_dims(vec!["num_rows"]),
                )
                .link(
                    LinkSpec::new("table", "DynamicTable")
                        .with_doc("Reference to the DynamicTable object that this region applies to."),
                ),
        )
        .build()
}

/// The acquisition-session types the extension extends or links to.
pub fn core() -> Result<Namespace, SchemaDefinitionError> {
    NamespaceBuilder::new(CORE, CORE_VERSION)
        .doc("Core neurophysiology data types")
        .include_type("Container", HDMF_COMMON)
        .include_type("DynamicTable", HDMF_COMMON)
        .type_spec(
            TypeSpec::group("NWBContainer")
                .extends("Container")
                .with_doc("An abstract data type for a generic container storing collections of data and metadata."),
        )
        .type_spec(
            TypeSpec::group("NWBDataInterface")
                .extends("NWBContainer")
                .with_doc("An abstract data type for a generic container storing collections of data, as opposed to metadata."),
        )
        .type_spec(time_series())
        .type_spec(
            TypeSpec::group("Device")
                .extends("NWBContainer")
                .with_doc("Metadata about a data acquisition device, e.g., recording system, electrode, microscope.")
                .attribute(AttributeSpec::new("description", DataKind::Text).optional())
                .attribute(AttributeSpec::new("manufacturer", DataKind::Text).optional()),
        )
        .type_spec(
            TypeSpec::group("OptogeneticStimulusSite")
                .extends("NWBContainer")
                .with_doc("A site of optogenetic stimulation.")
                .attribute(AttributeSpec::new("description", DataKind::Text))
                .attribute(
                    AttributeSpec::new("excitation_lambda", DataKind::Float32)
                        .with_doc("Excitation wavelength, in nm."),
                )
                .attribute(
                    AttributeSpec::new("location", DataKind::Text)
                        .with_doc("Location of the stimulation site."),
                )
                .link(LinkSpec::new("device", "Device").with_doc("Device that generated the stimulus.")),
        )
        .type_spec(
            TypeSpec::group("OptogeneticSeries")
                .extends("TimeSeries")
                .with_doc("An optogenetic stimulus.")
                .link(LinkSpec::new("site", "OptogeneticStimulusSite")),
        )
        .type_spec(
            TypeSpec::group("LabMetaData")
                .extends("NWBContainer")
                .with_doc("Lab-specific meta-data."),
        )
        .type_spec(
            TypeSpec::group("ImagingPlane")
                .extends("NWBContainer")
                .with_doc("An imaging plane and its metadata.")
                .attribute(AttributeSpec::new("description", DataKind::Text).optional())
                .attribute(AttributeSpec::new("excitation_lambda", DataKind::Float32))
                .attribute(AttributeSpec::new("indicator", DataKind::Text))
                .attribute(AttributeSpec::new("location", DataKind::Text))
                .link(LinkSpec::new("device", "Device")),
        )
        .type_spec(nwb_file())
        .build()
}

fn time_series() -> TypeSpec {
    TypeSpec::group("TimeSeries")
        .extends("NWBDataInterface")
        .with_doc("General purpose time series.")
        .attribute(
            AttributeSpec::new("description", DataKind::Text)
                .with_default("no description")
                .with_doc("Description of the time series."),
        )
        .attribute(
            AttributeSpec::new("comments", DataKind::Text)
                .with_default("no comments")
                .with_doc("Human-readable comments about the TimeSeries."),
        )
        .dataset_field(
            DatasetSpec::new("data", DataKind::Numeric)
                .with_doc("Data values. The first dimension must be time.")
                .with_attribute(AttributeSpec::new("unit", DataKind::Text))
                .with_attribute(AttributeSpec::new("conversion", DataKind::Float32).with_default(1.0))
                .with_attribute(AttributeSpec::new("resolution", DataKind::Float32).with_default(-1.0))
                .with_attribute(AttributeSpec::new("offset", DataKind::Float32).with_default(0.0)),
        )
        .dataset_field(
            DatasetSpec::new("starting_time", DataKind::Float64)
                .with_shape(Shape::scalar())
                .with_attribute(AttributeSpec::new("rate", DataKind::Float32))
                .with_attribute(AttributeSpec::new("unit", DataKind::Text).with_default("seconds"))
                .optional()
                .with_doc("Timestamp of the first sample in seconds."),
        )
        .dataset_field(
            DatasetSpec::new("timestamps", DataKind::Float64)
                .with_shape(Shape::any_of_rank(1))
                .with_dims(vec!["num_times"])
                .with_attribute(AttributeSpec::new("interval", DataKind::Int32).with_default(1))
                .with_attribute(AttributeSpec::new("unit", DataKind::Text).with_default("seconds"))
                .optional()
                .with_doc("Timestamps for samples stored in data, in seconds."),
        )
}

fn nwb_file() -> TypeSpec {
    let many = |slot: &str, target: &str| {
        GroupSpec::new(slot, target).with_quantity(FieldCardinality::ZeroOrMore)
    };
    TypeSpec::group("NWBFile")
        .extends("NWBContainer")
        .with_doc("An NWB file storing cellular-based neurophysiology data from a single experimental session.")
        .attribute(AttributeSpec::new("session_description", DataKind::Text))
        .attribute(AttributeSpec::new("identifier", DataKind::Text))
        .attribute(
            AttributeSpec::new("session_start_time", DataKind::Text)
                .optional()
                .with_doc("Date and time of the experiment start, ISO 8601."),
        )
        .child(many("devices", "Device"))
        .child(many("ogen_sites", "OptogeneticStimulusSite"))
        .child(many("imaging_planes", "ImagingPlane"))
        .child(many("lab_meta_data", "LabMetaData"))
        .child(many("acquisition", "NWBDataInterface"))
        .child(many("stimulus", "TimeSeries"))
        .child(many("analysis", "Container"))
}
