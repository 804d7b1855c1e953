use super::group::{MAX_MULTI_OPTIONS, OptionGroup, SelectType};
use super::paths::GamePath;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Descriptive fields of a mod that are edited as plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModInfoField {
    Name,
    Author,
    Description,
    Version,
    Website,
}

/// Metadata of a single mod: descriptive info, option groups and file swaps.
///
/// Groups are keyed by name; the key always equals the group's own `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModMeta {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Author", default)]
    pub author: String,

    #[serde(rename = "Description", default)]
    pub description: String,

    #[serde(rename = "Version", default)]
    pub version: String,

    #[serde(rename = "Website", default)]
    pub website: String,

    #[serde(rename = "Groups", default)]
    pub groups: IndexMap<String, OptionGroup>,

    #[serde(rename = "FileSwaps", default)]
    pub file_swaps: IndexMap<GamePath, GamePath>,
}

impl ModMeta {
    pub fn group(&self, name: &str) -> Option<&OptionGroup> {
        self.groups.get(name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut OptionGroup> {
        self.groups.get_mut(name)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Single-selection groups, in order
    pub fn single_groups(&self) -> impl Iterator<Item = &OptionGroup> {
        self.groups_of(SelectType::Single)
    }

    /// Multi-selection groups, in order
    pub fn multi_groups(&self) -> impl Iterator<Item = &OptionGroup> {
        self.groups_of(SelectType::Multi)
    }

    /// Names of Multi groups with more options than a selection mask can hold.
    ///
    /// Options past [`MAX_MULTI_OPTIONS`] can be renamed or removed but never
    /// selected.
    pub fn oversized_multi_groups(&self) -> Vec<&str> {
        self.multi_groups()
            .filter(|g| g.options.len() > MAX_MULTI_OPTIONS)
            .map(|g| g.name.as_str())
            .collect()
    }

    fn groups_of(&self, selection_type: SelectType) -> impl Iterator<Item = &OptionGroup> {
        self.groups
            .values()
            .filter(move |g| g.selection_type == selection_type)
    }

    /// Owned list of group names, safe to iterate while the meta is edited
    pub fn group_names(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Owned list of swap rows, in table order
    pub fn swap_rows(&self) -> Vec<(GamePath, GamePath)> {
        self.file_swaps
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn info(&self, field: ModInfoField) -> &str {
        match field {
            ModInfoField::Name => &self.name,
            ModInfoField::Author => &self.author,
            ModInfoField::Description => &self.description,
            ModInfoField::Version => &self.version,
            ModInfoField::Website => &self.website,
        }
    }

    pub fn info_mut(&mut self, field: ModInfoField) -> &mut String {
        match field {
            ModInfoField::Name => &mut self.name,
            ModInfoField::Author => &mut self.author,
            ModInfoField::Description => &mut self.description,
            ModInfoField::Version => &mut self.version,
            ModInfoField::Website => &mut self.website,
        }
    }
}
