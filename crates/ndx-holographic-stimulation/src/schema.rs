//! The `ndx-holographic-stimulation` namespace.

use ndx_schema::{
    AttributeSpec, DataKind, DatasetSpec, FieldCardinality, GroupSpec, LinkSpec, Namespace,
    NamespaceBuilder, SchemaDefinitionError, Shape, TypeSpec,
};

use crate::base::{CORE, HDMF_COMMON};

pub const NAMESPACE: &str = "ndx-holographic-stimulation";
pub const VERSION: &str = "0.1.0";

pub fn holographic_stimulation() -> Result<Namespace, SchemaDefinitionError> {
    NamespaceBuilder::new(NAMESPACE, VERSION)
        .doc("An extension of the optogenetic module to include the holographic photostimulation and its different patterns")
        .author("Alessandra Trapani")
        .contact("alessandramaria.trapani@gmail.com")
        .include_type("TimeSeries", CORE)
        .include_type("Device", CORE)
        .include_type("OptogeneticStimulusSite", CORE)
        .include_type("LabMetaData", CORE)
        .include_type("DynamicTableRegion", HDMF_COMMON)
        .include_type("DynamicTable", HDMF_COMMON)
        .type_spec(spiral_scanning())
        .type_spec(temporal_focusing())
        .type_spec(stimulus_pattern())
        .type_spec(stimulus_site())
        .type_spec(series())
        .build()
}

fn spiral_scanning() -> TypeSpec {
    TypeSpec::group("SpiralScanning")
        .extends("DynamicTable")
        .with_doc("table of parameters defining the spiral scanning beam pattern")
        .attribute(
            AttributeSpec::new("spiral_duration", DataKind::Float32)
                .with_doc("time duration for a single spiral, in sec"),
        )
        .attribute(
            AttributeSpec::new("spiral_diameter", DataKind::Float32)
                .with_doc("spiral diameter of each spot, in m"),
        )
        .attribute(
            AttributeSpec::new("spiral_height", DataKind::Float32)
                .with_doc("spiral height of each spot, in m"),
        )
        .attribute(
            AttributeSpec::new("num_revolutions", DataKind::Int8)
                .with_doc("number of turns within a spiral"),
        )
        .attribute(
            AttributeSpec::new("num_spirals", DataKind::Int8)
                .with_doc("numbers of repetitions for each spiral"),
        )
        .attribute(
            AttributeSpec::new("isi_spiral", DataKind::Float32)
                .with_doc("duration of the interval between each individual spiral, in sec"),
        )
}

fn temporal_focusing() -> TypeSpec {
    TypeSpec::group("TemporalFocusing")
        .extends("DynamicTable")
        .with_doc("table of parameters defining the temporal focusing beam-shaping")
        .attribute(
            AttributeSpec::new("lateral_psf", DataKind::Text)
                .with_doc("estimated lateral spatial profile or point spread function, expressed as mean [um] ± s.d [um]"),
        )
        .attribute(
            AttributeSpec::new("axial_psf", DataKind::Text)
                .with_doc("estimated axial spatial profile or point spread function, expressed as mean [um] ± s.d [um]"),
        )
        .attribute(
            AttributeSpec::new("duration", DataKind::Float32)
                .with_doc("the time duration for a single spot, in sec"),
        )
        .attribute(
            AttributeSpec::new("num_repetitions", DataKind::Int8)
                .with_doc("numbers of repetitions for each spot"),
        )
        .attribute(
            AttributeSpec::new("isi", DataKind::Float32)
                .with_doc("duration of the interval between each individual spot, in sec"),
        )
}

fn stimulus_pattern() -> TypeSpec {
    TypeSpec::group("HolographicStimulusPattern")
        .extends("LabMetaData")
        .with_doc("Holographic excitation single ROI")
        .attribute(
            AttributeSpec::new("description", DataKind::Text)
                .optional()
                .with_doc("description of the stimulus pattern"),
        )
        .child(
            GroupSpec::new("spiral_scanning", "SpiralScanning")
                .with_quantity(FieldCardinality::Optional)
                .with_doc("The spiral scanning beam pattern is obtained by scanning the beam spot following a spiral path over the somatic membrane"),
        )
        .child(
            GroupSpec::new("temporal_focusing", "TemporalFocusing")
                .with_quantity(FieldCardinality::Optional)
                .with_doc("The temporal focusing beam-shaping is accomplished by manipulating light phases to generate custom-shaped light patterns that can illuminate extended lateral regions (e.g., the entire cell body) simultaneously."),
        )
}

fn stimulus_site() -> TypeSpec {
    TypeSpec::group("HolographicStimulusSite")
        .extends("OptogeneticStimulusSite")
        .with_doc("An extension of OptogeneticStimulusSite to include the geometrical representation for the stimulus.")
        .attribute(
            AttributeSpec::new("effector", DataKind::Text)
                .optional()
                .with_doc("Light-activated effector protein expressed by the targeted cell (eg. ChR2)"),
        )
        .link(
            LinkSpec::new("stimulus_pattern", "HolographicStimulusPattern")
                .with_quantity(FieldCardinality::Optional)
                .with_doc("The beam pattern on single cells, e.g. \"spiral\" or \"temporal focusing\""),
        )
}

fn series() -> TypeSpec {
    TypeSpec::group("HolographicSeries")
        .extends("TimeSeries")
        .with_doc("An extension of OptogeneticSeries to include the holographic representation for the stimulus.")
        .dataset_field(
            DatasetSpec::new("data", DataKind::Numeric)
                .with_shape(Shape::any_of_rank(2))
                .with_dims(vec!["num_times", "num_rois"])
                .with_attribute(
                    AttributeSpec::new("unit", DataKind::Text)
                        .with_default("watts")
                        .with_doc("SI unit of data"),
                )
                .with_doc("The data values. The first dimension must be time. The second dimension represents ROIs"),
        )
        .attribute(
            AttributeSpec::new("stimulation_wavelength", DataKind::Float32)
                .optional()
                .with_doc("stimulation wavelength in nm"),
        )
        .child(
            GroupSpec::new("rois", "DynamicTableRegion")
                .with_doc("a table region corresponding to the ROIs that were used to generate this data"),
        )
        .link(
            LinkSpec::new("site", "HolographicStimulusSite")
                .with_quantity(FieldCardinality::ZeroOrMore)
                .with_doc("link to the holographic stimulus site"),
        )
        .link(
            LinkSpec::new("stimulus_pattern", "HolographicStimulusPattern")
                .with_quantity(FieldCardinality::Optional)
                .with_doc("link to the holographic stimulus pattern"),
        )
        .link(
            LinkSpec::new("device", "Device")
                .with_quantity(FieldCardinality::Optional)
                .with_doc("link to the device used for generate the photostimulation"),
        )
}
