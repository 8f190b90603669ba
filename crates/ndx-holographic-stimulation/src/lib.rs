//! Holographic optogenetic stimulation types.
//!
//! This crate defines the `ndx-holographic-stimulation` namespace on top of
//! the `hdmf-common` and `core` base namespaces, and typed wrappers for its
//! types.
//!
//! # Overview
//!
//! - **SpiralScanning / TemporalFocusing** - beam pattern parameter tables
//! - **HolographicStimulusPattern** - the pattern applied to single cells
//! - **HolographicStimulusSite** - a stimulus site with effector and pattern
//! - **HolographicSeries** - stimulation power over time per ROI
//!
//! # Quick Start
//!
//! ```rust
//! use ndarray::Array2;
//! use ndx_holographic_stimulation::{
//!     registry, Device, DynamicTable, DynamicTableRegion, HolographicSeries,
//!     HolographicStimulusPattern, HolographicStimulusSite,
//! };
//! use ndx_schema::ContainerTree;
//!
//! let registry = registry().unwrap();
//! let mut tree = ContainerTree::new();
//!
//! let device = tree.insert_typed(&registry, &Device::new("device")).unwrap();
//! let pattern = tree
//!     .insert_typed(&registry, &HolographicStimulusPattern::new("spiral"))
//!     .unwrap();
//! let site = tree
//!     .insert_typed(
//!         &registry,
//!         &HolographicStimulusSite::new("site", device, "example site", 600.0, "VISrl")
//!             .with_effector("ChR2")
//!             .with_stimulus_pattern(pattern),
//!     )
//!     .unwrap();
//!
//! let table = tree
//!     .insert_typed(&registry, &DynamicTable::new("PlaneSegmentation", "segmented ROIs"))
//!     .unwrap();
//! let rois = tree
//!     .insert_typed(&registry, &DynamicTableRegion::new("rois", "two ROIs", vec![0, 1], table))
//!     .unwrap();
//!
//! let series = HolographicSeries::new("holo", Array2::<f64>::zeros((100, 2)).into_dyn(), rois)
//!     .with_site(site);
//! let id = tree.insert_typed(&registry, &series).unwrap();
//! assert_eq!(tree.get_typed::<HolographicSeries>(id).unwrap().unit, "watts");
//! ```

mod base;
mod schema;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use ndx_schema::{global, LoadOutcome, Namespace, SchemaDefinitionError, TypeRegistry};
use tracing::info;

pub use base::{core, hdmf_common, CORE, CORE_VERSION, HDMF_COMMON, HDMF_COMMON_VERSION};
pub use schema::{holographic_stimulation, NAMESPACE, VERSION};
pub use types::{
    Device, DynamicTable, DynamicTableRegion, HolographicSeries, HolographicStimulusPattern,
    HolographicStimulusSite, HolographicType, NwbFile, SpiralScanning, StartingTime,
    TemporalFocusing,
};

/// The base namespaces and the extension, in load order.
pub fn namespaces() -> Result<Vec<Namespace>, SchemaDefinitionError> {
    Ok(vec![hdmf_common()?, core()?, holographic_stimulation()?])
}

/// A fresh registry holding every namespace this crate defines.
pub fn registry() -> Result<TypeRegistry, SchemaDefinitionError> {
    let mut registry = TypeRegistry::new();
    for namespace in namespaces()? {
        registry.load(namespace)?;
    }
    Ok(registry)
}

/// Load every namespace into the process-wide registry.
///
/// Calling this again is a no-op. Fails if a different version of one of the
/// namespaces is already loaded.
pub fn load_namespaces() -> Result<Arc<TypeRegistry>, SchemaDefinitionError> {
    for namespace in namespaces()? {
        let name = namespace.name.clone();
        if global::load(namespace)? == LoadOutcome::Loaded {
            info!(namespace = %name, "Registered namespace");
        }
    }
    Ok(global::snapshot())
}
