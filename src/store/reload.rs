use super::StoreError;
use crate::models::{ModMeta, ModSettings};
use crate::services::{ResolvedFiles, resolve_active_files};
use indexmap::IndexMap;

/// Recomputes the active file mappings of an enabled mod
#[cfg_attr(test, mockall::automock)]
pub trait ModReloader {
    fn reload_mod(
        &mut self,
        mod_id: &str,
        meta: &ModMeta,
        settings: &ModSettings,
    ) -> Result<(), StoreError>;
}

/// Reloader that keeps the latest resolved mappings per mod in memory
#[derive(Debug, Default)]
pub struct MappingReloader {
    resolved: IndexMap<String, ResolvedFiles>,
    reload_count: usize,
}

impl MappingReloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mappings computed by the last reload of `mod_id`
    pub fn resolved(&self, mod_id: &str) -> Option<&ResolvedFiles> {
        self.resolved.get(mod_id)
    }

    pub fn reload_count(&self) -> usize {
        self.reload_count
    }
}

impl ModReloader for MappingReloader {
    fn reload_mod(
        &mut self,
        mod_id: &str,
        meta: &ModMeta,
        settings: &ModSettings,
    ) -> Result<(), StoreError> {
        let resolved = resolve_active_files(meta, settings);
        tracing::info!(
            "Reloaded mod {}: {} file(s), {} swap(s), {} conflict(s)",
            mod_id,
            resolved.files.len(),
            resolved.swaps.len(),
            resolved.conflicts.len()
        );

        self.resolved.insert(mod_id.to_string(), resolved);
        self.reload_count += 1;
        Ok(())
    }
}
