//! Typed wrappers for the extension and the base types it uses.
//!
//! Each wrapper maps one registered type onto plain Rust fields. Links and
//! child slots are held as [`ContainerId`]s of containers already in the tree.

use ndx_schema::{
    required_f64, required_i64, required_text, ArrayData, ContainerId, ContainerTree, DatasetData,
    DatasetValue, FieldValidationError, FieldValues, NeurodataType, TypeRegistry, TypedContainer,
    Value, DATA_FIELD,
};

use crate::base::{CORE, HDMF_COMMON};
use crate::schema::NAMESPACE;

fn optional_text(container: &TypedContainer, field: &str) -> Option<String> {
    container.text(field).map(str::to_string)
}

fn required_link(container: &TypedContainer, field: &str) -> Result<ContainerId, FieldValidationError> {
    container.link(field).ok_or_else(|| FieldValidationError::MissingField {
        type_name: container.type_name().to_string(),
        field: field.to_string(),
    })
}

fn single_child(container: &TypedContainer, slot: &str) -> Option<ContainerId> {
    container.children(slot).next().map(|(_, id)| id)
}

fn missing(container: &TypedContainer, field: &str) -> FieldValidationError {
    FieldValidationError::MissingField {
        type_name: container.type_name().to_string(),
        field: field.to_string(),
    }
}

/// `core` Device.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Device {
    pub name: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }
}

impl NeurodataType for Device {
    const TYPE_NAME: &'static str = "Device";
    const NAMESPACE: &'static str = CORE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .maybe_attribute("description", self.description.clone())
            .maybe_attribute("manufacturer", self.manufacturer.clone())
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: optional_text(container, "description"),
            manufacturer: optional_text(container, "manufacturer"),
        })
    }
}

/// `hdmf-common` DynamicTable.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicTable {
    pub name: String,
    pub description: String,
    pub id: Option<ContainerId>,
    pub columns: Vec<ContainerId>,
}

impl DynamicTable {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            id: None,
            columns: Vec::new(),
        }
    }
}

impl NeurodataType for DynamicTable {
    const TYPE_NAME: &'static str = "DynamicTable";
    const NAMESPACE: &'static str = HDMF_COMMON;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        let values = FieldValues::new()
            .attribute("description", self.description.as_str())
            .maybe_child("id", self.id);
        if self.columns.is_empty() {
            values
        } else {
            values.children("columns", self.columns.clone())
        }
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            id: single_child(container, "id"),
            columns: container.children("columns").map(|(_, id)| id).collect(),
        })
    }
}

/// `hdmf-common` DynamicTableRegion: row indices into a table.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicTableRegion {
    pub name: String,
    pub description: String,
    pub rows: Vec<i64>,
    pub table: ContainerId,
}

impl DynamicTableRegion {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        rows: Vec<i64>,
        table: ContainerId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rows,
            table,
        }
    }
}

impl NeurodataType for DynamicTableRegion {
    const TYPE_NAME: &'static str = "DynamicTableRegion";
    const NAMESPACE: &'static str = HDMF_COMMON;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .data(DATA_FIELD, ArrayData::from(self.rows.clone()))
            .attribute("description", self.description.as_str())
            .link("table", self.table)
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        let rows = container
            .dataset(DATA_FIELD)
            .and_then(|d| d.data.as_array())
            .and_then(ArrayData::as_int)
            .ok_or_else(|| missing(container, DATA_FIELD))?;
        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            rows: rows.iter().copied().collect(),
            table: required_link(container, "table")?,
        })
    }
}

/// Parameters of a spiral scanning beam pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct SpiralScanning {
    pub name: String,
    pub description: String,
    /// Seconds.
    pub spiral_duration: f64,
    /// Meters.
    pub spiral_diameter: f64,
    /// Meters.
    pub spiral_height: f64,
    pub num_revolutions: i64,
    pub num_spirals: i64,
    /// Seconds between spirals.
    pub isi_spiral: f64,
}

impl NeurodataType for SpiralScanning {
    const TYPE_NAME: &'static str = "SpiralScanning";
    const NAMESPACE: &'static str = NAMESPACE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .attribute("description", self.description.as_str())
            .attribute("spiral_duration", self.spiral_duration)
            .attribute("spiral_diameter", self.spiral_diameter)
            .attribute("spiral_height", self.spiral_height)
            .attribute("num_revolutions", self.num_revolutions)
            .attribute("num_spirals", self.num_spirals)
            .attribute("isi_spiral", self.isi_spiral)
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            spiral_duration: required_f64(container, "spiral_duration")?,
            spiral_diameter: required_f64(container, "spiral_diameter")?,
            spiral_height: required_f64(container, "spiral_height")?,
            num_revolutions: required_i64(container, "num_revolutions")?,
            num_spirals: required_i64(container, "num_spirals")?,
            isi_spiral: required_f64(container, "isi_spiral")?,
        })
    }
}

/// Parameters of a temporal focusing beam shape.
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalFocusing {
    pub name: String,
    pub description: String,
    /// Lateral point spread function, as "mean um +/- s.d. um".
    pub lateral_psf: String,
    pub axial_psf: String,
    /// Seconds per spot.
    pub duration: f64,
    pub num_repetitions: i64,
    pub isi: f64,
}

impl NeurodataType for TemporalFocusing {
    const TYPE_NAME: &'static str = "TemporalFocusing";
    const NAMESPACE: &'static str = NAMESPACE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .attribute("description", self.description.as_str())
            .attribute("lateral_psf", self.lateral_psf.as_str())
            .attribute("axial_psf", self.axial_psf.as_str())
            .attribute("duration", self.duration)
            .attribute("num_repetitions", self.num_repetitions)
            .attribute("isi", self.isi)
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            lateral_psf: required_text(container, "lateral_psf")?,
            axial_psf: required_text(container, "axial_psf")?,
            duration: required_f64(container, "duration")?,
            num_repetitions: required_i64(container, "num_repetitions")?,
            isi: required_f64(container, "isi")?,
        })
    }
}

/// The beam pattern used on single cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HolographicStimulusPattern {
    pub name: String,
    pub description: Option<String>,
    pub spiral_scanning: Option<ContainerId>,
    pub temporal_focusing: Option<ContainerId>,
}

impl HolographicStimulusPattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_spiral_scanning(mut self, id: ContainerId) -> Self {
        self.spiral_scanning = Some(id);
        self
    }

    pub fn with_temporal_focusing(mut self, id: ContainerId) -> Self {
        self.temporal_focusing = Some(id);
        self
    }
}

impl NeurodataType for HolographicStimulusPattern {
    const TYPE_NAME: &'static str = "HolographicStimulusPattern";
    const NAMESPACE: &'static str = NAMESPACE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .maybe_attribute("description", self.description.clone())
            .maybe_child("spiral_scanning", self.spiral_scanning)
            .maybe_child("temporal_focusing", self.temporal_focusing)
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: optional_text(container, "description"),
            spiral_scanning: single_child(container, "spiral_scanning"),
            temporal_focusing: single_child(container, "temporal_focusing"),
        })
    }
}

/// Holographic optogenetic stimulus site.
#[derive(Clone, Debug, PartialEq)]
pub struct HolographicStimulusSite {
    pub name: String,
    pub description: String,
    /// Nanometers.
    pub excitation_lambda: f64,
    pub location: String,
    pub device: ContainerId,
    pub effector: Option<String>,
    pub stimulus_pattern: Option<ContainerId>,
}

impl HolographicStimulusSite {
    pub fn new(
        name: impl Into<String>,
        device: ContainerId,
        description: impl Into<String>,
        excitation_lambda: f64,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            excitation_lambda,
            location: location.into(),
            device,
            effector: None,
            stimulus_pattern: None,
        }
    }

    pub fn with_effector(mut self, effector: impl Into<String>) -> Self {
        self.effector = Some(effector.into());
        self
    }

    pub fn with_stimulus_pattern(mut self, pattern: ContainerId) -> Self {
        self.stimulus_pattern = Some(pattern);
        self
    }
}

impl NeurodataType for HolographicStimulusSite {
    const TYPE_NAME: &'static str = "HolographicStimulusSite";
    const NAMESPACE: &'static str = NAMESPACE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        FieldValues::new()
            .attribute("description", self.description.as_str())
            .attribute("excitation_lambda", self.excitation_lambda)
            .attribute("location", self.location.as_str())
            .link("device", self.device)
            .maybe_attribute("effector", self.effector.clone())
            .maybe_link("stimulus_pattern", self.stimulus_pattern)
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            excitation_lambda: required_f64(container, "excitation_lambda")?,
            location: required_text(container, "location")?,
            device: required_link(container, "device")?,
            effector: optional_text(container, "effector"),
            stimulus_pattern: container.link("stimulus_pattern"),
        })
    }
}

/// Start time and sampling rate of a regularly sampled series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartingTime {
    /// Seconds.
    pub time: f64,
    /// Hz.
    pub rate: f64,
}

/// Holographic stimulation delivered to a set of ROIs over time.
#[derive(Clone, Debug, PartialEq)]
pub struct HolographicSeries {
    pub name: String,
    pub description: String,
    pub comments: String,
    /// `(num_times, num_rois)`.
    pub data: DatasetData,
    pub unit: String,
    pub conversion: f64,
    pub timestamps: Option<Vec<f64>>,
    pub starting_time: Option<StartingTime>,
    pub stimulation_wavelength: Option<f64>,
    pub rois: ContainerId,
    pub site: Vec<ContainerId>,
    pub stimulus_pattern: Option<ContainerId>,
    pub device: Option<ContainerId>,
}

impl HolographicSeries {
    pub fn new(name: impl Into<String>, data: impl Into<DatasetData>, rois: ContainerId) -> Self {
        Self {
            name: name.into(),
            description: "no description".to_string(),
            comments: "no comments".to_string(),
            data: data.into(),
            unit: "watts".to_string(),
            conversion: 1.0,
            timestamps: None,
            starting_time: None,
            stimulation_wavelength: None,
            rois,
            site: Vec::new(),
            stimulus_pattern: None,
            device: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_timestamps(mut self, timestamps: Vec<f64>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    pub fn with_starting_time(mut self, time: f64, rate: f64) -> Self {
        self.starting_time = Some(StartingTime { time, rate });
        self
    }

    pub fn with_stimulation_wavelength(mut self, nm: f64) -> Self {
        self.stimulation_wavelength = Some(nm);
        self
    }

    /// Append a stimulus site; order is kept.
    pub fn with_site(mut self, site: ContainerId) -> Self {
        self.site.push(site);
        self
    }

    pub fn with_stimulus_pattern(mut self, pattern: ContainerId) -> Self {
        self.stimulus_pattern = Some(pattern);
        self
    }

    pub fn with_device(mut self, device: ContainerId) -> Self {
        self.device = Some(device);
        self
    }

    /// Number of ROIs, if the second dimension is already known.
    pub fn num_rois(&self) -> Option<usize> {
        self.data.known_dims().get(1).copied().flatten()
    }
}

impl NeurodataType for HolographicSeries {
    const TYPE_NAME: &'static str = "HolographicSeries";
    const NAMESPACE: &'static str = NAMESPACE;

    fn name(&self) -> &str {
        &self.name
    }

    fn to_fields(&self) -> FieldValues {
        let data = DatasetValue::new(self.data.clone())
            .with_attribute("unit", self.unit.as_str())
            .with_attribute("conversion", self.conversion);
        let mut values = FieldValues::new()
            .attribute("description", self.description.as_str())
            .attribute("comments", self.comments.as_str())
            .dataset("data", data)
            .maybe_attribute("stimulation_wavelength", self.stimulation_wavelength)
            .child("rois", self.rois)
            .links("site", self.site.clone())
            .maybe_link("stimulus_pattern", self.stimulus_pattern)
            .maybe_link("device", self.device);
        if let Some(timestamps) = &self.timestamps {
            values = values.dataset(
                "timestamps",
                DatasetValue::new(ArrayData::from(timestamps.clone())),
            );
        }
        if let Some(start) = self.starting_time {
            values = values.dataset(
                "starting_time",
                DatasetValue::new(Value::Float(start.time)).with_attribute("rate", start.rate),
            );
        }
        values
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        let data = container
            .dataset("data")
            .ok_or_else(|| missing(container, "data"))?;
        let timestamps = container
            .dataset("timestamps")
            .and_then(|d| d.data.as_array())
            .and_then(ArrayData::as_float)
            .map(|a| a.iter().copied().collect());
        let starting_time = match container.dataset("starting_time") {
            Some(start) => Some(StartingTime {
                time: start
                    .data
                    .as_scalar()
                    .and_then(Value::as_f64)
                    .ok_or_else(|| missing(container, "starting_time"))?,
                rate: start
                    .attribute("rate")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| missing(container, "starting_time.rate"))?,
            }),
            None => None,
        };

        Ok(Self {
            name: container.name().to_string(),
            description: required_text(container, "description")?,
            comments: required_text(container, "comments")?,
            data: data.data.clone(),
            unit: data
                .attribute("unit")
                .and_then(Value::as_str)
                .ok_or_else(|| missing(container, "data.unit"))?
                .to_string(),
            conversion: data.attribute("conversion").and_then(Value::as_f64).unwrap_or(1.0),
            timestamps,
            starting_time,
            stimulation_wavelength: container
                .attribute("stimulation_wavelength")
                .and_then(Value::as_f64),
            rois: single_child(container, "rois").ok_or_else(|| missing(container, "rois"))?,
            site: container.link_targets("site").to_vec(),
            stimulus_pattern: container.link("stimulus_pattern"),
            device: container.link("device"),
        })
    }
}

/// `core` NWBFile, the root of a session. Always stored at the root and named `root`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NwbFile {
    pub session_description: String,
    pub identifier: String,
    pub session_start_time: Option<String>,
    pub devices: Vec<ContainerId>,
    pub ogen_sites: Vec<ContainerId>,
    pub imaging_planes: Vec<ContainerId>,
    pub lab_meta_data: Vec<ContainerId>,
    pub acquisition: Vec<ContainerId>,
    pub stimulus: Vec<ContainerId>,
    pub analysis: Vec<ContainerId>,
}

impl NwbFile {
    pub fn new(session_description: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            session_description: session_description.into(),
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_session_start_time(mut self, iso8601: impl Into<String>) -> Self {
        self.session_start_time = Some(iso8601.into());
        self
    }

    fn slots(&self) -> [(&'static str, &Vec<ContainerId>); 7] {
        [
            ("devices", &self.devices),
            ("ogen_sites", &self.ogen_sites),
            ("imaging_planes", &self.imaging_planes),
            ("lab_meta_data", &self.lab_meta_data),
            ("acquisition", &self.acquisition),
            ("stimulus", &self.stimulus),
            ("analysis", &self.analysis),
        ]
    }
}

impl NeurodataType for NwbFile {
    const TYPE_NAME: &'static str = "NWBFile";
    const NAMESPACE: &'static str = CORE;

    fn name(&self) -> &str {
        ndx_schema::io::ROOT_NAME
    }

    fn to_fields(&self) -> FieldValues {
        let mut values = FieldValues::new()
            .attribute("session_description", self.session_description.as_str())
            .attribute("identifier", self.identifier.as_str())
            .maybe_attribute("session_start_time", self.session_start_time.clone());
        for (slot, children) in self.slots() {
            if !children.is_empty() {
                values = values.children(slot, children.clone());
            }
        }
        values
    }

    fn from_container(
        _tree: &ContainerTree,
        _id: ContainerId,
        container: &TypedContainer,
    ) -> Result<Self, FieldValidationError> {
        let slot = |name: &str| -> Vec<ContainerId> {
            container.children(name).map(|(_, id)| id).collect()
        };
        Ok(Self {
            session_description: required_text(container, "session_description")?,
            identifier: required_text(container, "identifier")?,
            session_start_time: optional_text(container, "session_start_time"),
            devices: slot("devices"),
            ogen_sites: slot("ogen_sites"),
            imaging_planes: slot("imaging_planes"),
            lab_meta_data: slot("lab_meta_data"),
            acquisition: slot("acquisition"),
            stimulus: slot("stimulus"),
            analysis: slot("analysis"),
        })
    }
}

/// The extension's own types as one family.
#[derive(Clone, Debug, PartialEq)]
pub enum HolographicType {
    Series(HolographicSeries),
    StimulusSite(HolographicStimulusSite),
    StimulusPattern(HolographicStimulusPattern),
    SpiralScanning(SpiralScanning),
    TemporalFocusing(TemporalFocusing),
}

impl HolographicType {
    pub const TYPE_NAMES: [&'static str; 5] = [
        HolographicSeries::TYPE_NAME,
        HolographicStimulusSite::TYPE_NAME,
        HolographicStimulusPattern::TYPE_NAME,
        SpiralScanning::TYPE_NAME,
        TemporalFocusing::TYPE_NAME,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            HolographicType::Series(_) => HolographicSeries::TYPE_NAME,
            HolographicType::StimulusSite(_) => HolographicStimulusSite::TYPE_NAME,
            HolographicType::StimulusPattern(_) => HolographicStimulusPattern::TYPE_NAME,
            HolographicType::SpiralScanning(_) => SpiralScanning::TYPE_NAME,
            HolographicType::TemporalFocusing(_) => TemporalFocusing::TYPE_NAME,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            HolographicType::Series(v) => v.name(),
            HolographicType::StimulusSite(v) => v.name(),
            HolographicType::StimulusPattern(v) => v.name(),
            HolographicType::SpiralScanning(v) => v.name(),
            HolographicType::TemporalFocusing(v) => v.name(),
        }
    }

    pub fn fields(&self) -> FieldValues {
        match self {
            HolographicType::Series(v) => v.to_fields(),
            HolographicType::StimulusSite(v) => v.to_fields(),
            HolographicType::StimulusPattern(v) => v.to_fields(),
            HolographicType::SpiralScanning(v) => v.to_fields(),
            HolographicType::TemporalFocusing(v) => v.to_fields(),
        }
    }

    /// Validate and add to `tree`.
    pub fn insert(
        &self,
        tree: &mut ContainerTree,
        registry: &TypeRegistry,
    ) -> Result<ContainerId, FieldValidationError> {
        match self {
            HolographicType::Series(v) => tree.insert_typed(registry, v),
            HolographicType::StimulusSite(v) => tree.insert_typed(registry, v),
            HolographicType::StimulusPattern(v) => tree.insert_typed(registry, v),
            HolographicType::SpiralScanning(v) => tree.insert_typed(registry, v),
            HolographicType::TemporalFocusing(v) => tree.insert_typed(registry, v),
        }
    }

    /// Read a container of any extension type.
    pub fn from_tree(tree: &ContainerTree, id: ContainerId) -> Result<Self, FieldValidationError> {
        let container = tree
            .get(id)
            .ok_or(FieldValidationError::UnknownContainer(id.index()))?;
        if container.is_a(HolographicSeries::TYPE_NAME) {
            tree.get_typed(id).map(HolographicType::Series)
        } else if container.is_a(HolographicStimulusSite::TYPE_NAME) {
            tree.get_typed(id).map(HolographicType::StimulusSite)
        } else if container.is_a(HolographicStimulusPattern::TYPE_NAME) {
            tree.get_typed(id).map(HolographicType::StimulusPattern)
        } else if container.is_a(SpiralScanning::TYPE_NAME) {
            tree.get_typed(id).map(HolographicType::SpiralScanning)
        } else if container.is_a(TemporalFocusing::TYPE_NAME) {
            tree.get_typed(id).map(HolographicType::TemporalFocusing)
        } else {
            Err(FieldValidationError::WrongKind {
                field: container.name().to_string(),
                expected: "a holographic stimulation type".to_string(),
                found: container.type_name().to_string(),
            })
        }
    }
}

impl From<HolographicSeries> for HolographicType {
    fn from(v: HolographicSeries) -> Self {
        HolographicType::Series(v)
    }
}

impl From<HolographicStimulusSite> for HolographicType {
    fn from(v: HolographicStimulusSite) -> Self {
        HolographicType::StimulusSite(v)
    }
}

impl From<HolographicStimulusPattern> for HolographicType {
    fn from(v: HolographicStimulusPattern) -> Self {
        HolographicType::StimulusPattern(v)
    }
}

impl From<SpiralScanning> for HolographicType {
    fn from(v: SpiralScanning) -> Self {
        HolographicType::SpiralScanning(v)
    }
}

impl From<TemporalFocusing> for HolographicType {
    fn from(v: TemporalFocusing) -> Self {
        HolographicType::TemporalFocusing(v)
    }
}
