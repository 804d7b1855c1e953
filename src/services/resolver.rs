use crate::models::{GamePath, ModMeta, ModSettings, RelPath};
use indexmap::IndexMap;

/// Effective file mappings of a mod under its current settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFiles {
    /// Game path -> local file that replaces it
    pub files: IndexMap<GamePath, RelPath>,

    /// Game path -> game path it is redirected to
    pub swaps: IndexMap<GamePath, GamePath>,

    /// Game paths claimed by more than one active option
    pub conflicts: Vec<GamePath>,
}

impl ResolvedFiles {
    pub fn len(&self) -> usize {
        self.files.len() + self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.swaps.is_empty()
    }
}

/// Collect the files of all active options plus the file swaps.
///
/// Groups are walked in order and options in index order; the first active
/// option to claim a game path keeps it.
pub fn resolve_active_files(meta: &ModMeta, settings: &ModSettings) -> ResolvedFiles {
    let mut resolved = ResolvedFiles::default();

    for group in meta.groups.values() {
        let setting = settings.get(&group.name);
        for index in group.active_indices(setting) {
            let option = &group.options[index];
            for (file, path) in option.mappings() {
                if path.is_empty() {
                    continue;
                }
                if resolved.files.contains_key(path) {
                    if !resolved.conflicts.contains(path) {
                        resolved.conflicts.push(path.clone());
                    }
                    continue;
                }
                resolved.files.insert(path.clone(), file.clone());
            }
        }
    }

    for (from, to) in &meta.file_swaps {
        if !from.is_empty() {
            resolved.swaps.insert(from.clone(), to.clone());
        }
    }

    if !resolved.conflicts.is_empty() {
        tracing::debug!(
            "{} game path(s) are claimed by multiple active options",
            resolved.conflicts.len()
        );
    }

    resolved
}
