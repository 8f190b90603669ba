//! Process-wide registry.
//!
//! Nothing is loaded implicitly; callers load the namespaces they need once at
//! startup. Readers take a [`snapshot`] and never hold the lock while working.

use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

use crate::namespace::Namespace;
use crate::registry::{LoadOutcome, TypeRegistry};
use crate::SchemaDefinitionError;

fn cell() -> &'static RwLock<Arc<TypeRegistry>> {
    static REGISTRY: OnceLock<RwLock<Arc<TypeRegistry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Arc::new(TypeRegistry::new())))
}

/// Load `namespace` into the process-wide registry.
pub fn load(namespace: Namespace) -> Result<LoadOutcome, SchemaDefinitionError> {
    let mut guard = cell().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut next = TypeRegistry::clone(&guard);
    let outcome = next.load(namespace)?;
    if outcome == LoadOutcome::Loaded {
        *guard = Arc::new(next);
    }
    Ok(outcome)
}

/// Current registry contents. Later loads do not affect a taken snapshot.
pub fn snapshot() -> Arc<TypeRegistry> {
    let guard = cell().read().unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(&guard)
}

/// Drop every loaded namespace.
pub fn reset() {
    let mut guard = cell().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Arc::new(TypeRegistry::new());
    debug!("Global registry reset");
}
