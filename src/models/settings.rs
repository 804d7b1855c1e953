use super::group::SelectType;
use super::meta::ModMeta;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Persisted per-mod selection state.
///
/// `settings` maps a group name to the selected option index (Single groups)
/// or to a bitmask of active options (Multi groups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModSettings {
    #[serde(rename = "Enabled", default)]
    pub enabled: bool,

    #[serde(rename = "Priority", default)]
    pub priority: i32,

    #[serde(rename = "Settings", default)]
    pub settings: IndexMap<String, u32>,
}

impl Default for ModSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            priority: 0,
            settings: IndexMap::new(),
        }
    }
}

impl ModSettings {
    /// Stored value for a group, 0 when absent
    pub fn get(&self, group: &str) -> u32 {
        self.settings.get(group).copied().unwrap_or(0)
    }

    /// Set a group's value. Returns true if it changed.
    pub fn set(&mut self, group: &str, value: u32) -> bool {
        self.settings.insert(group.to_string(), value) != Some(value)
    }

    pub fn remove(&mut self, group: &str) -> Option<u32> {
        self.settings.shift_remove(group)
    }

    /// Move a group's value to a new key, keeping its position
    pub fn rename(&mut self, from: &str, to: &str) {
        let Some((index, _, value)) = self.settings.shift_remove_full(from) else {
            return;
        };
        self.settings.shift_insert(index, to.to_string(), value);
    }

    /// Bring the value of one group in line with `meta`.
    ///
    /// - group missing from `meta`: the entry is dropped
    /// - entry missing: inserted as 0
    /// - Single: clamped to the last option (0 for an empty group)
    /// - Multi: bits at or above the option count are cleared
    ///
    /// Returns true if the stored value changed or was added or removed.
    pub fn fix_specific_setting(&mut self, group: &str, meta: &ModMeta) -> bool {
        let Some(option_group) = meta.group(group) else {
            return self.remove(group).is_some();
        };

        let Some(&old) = self.settings.get(group) else {
            self.settings.insert(group.to_string(), 0);
            return true;
        };

        let fixed = match option_group.selection_type {
            SelectType::Single => old.min(option_group.max_setting()),
            SelectType::Multi => old & option_group.max_setting(),
        };

        if fixed != old {
            tracing::debug!(
                "Reconciled setting for group {}: {} -> {}",
                group,
                old,
                fixed
            );
            self.settings.insert(group.to_string(), fixed);
            return true;
        }
        false
    }

    /// Reconcile every group of `meta` and drop entries for unknown groups.
    ///
    /// Returns true if anything changed.
    pub fn fix_invalid_settings(&mut self, meta: &ModMeta) -> bool {
        let orphans: Vec<String> = self
            .settings
            .keys()
            .filter(|name| !meta.has_group(name))
            .cloned()
            .collect();

        let mut changed = false;
        for name in orphans.iter().chain(meta.groups.keys()) {
            changed |= self.fix_specific_setting(name, meta);
        }
        changed
    }
}
