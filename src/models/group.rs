use super::mod_option::ModOption;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of options in a Multi group.
///
/// A Multi selection is persisted as a `u32` bitmask, one bit per option.
pub const MAX_MULTI_OPTIONS: usize = u32::BITS as usize;

/// How options of a group are selected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectType {
    /// Exactly one option is active; the setting is its index.
    #[default]
    Single,
    /// Any subset of options is active; the setting is a bitmask.
    Multi,
}

impl fmt::Display for SelectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectType::Single => f.write_str("Single"),
            SelectType::Multi => f.write_str("Multi"),
        }
    }
}

/// A named, ordered list of options.
///
/// The position of an option in `options` is its identity for settings: the
/// selected index of a Single group and the bit number of a Multi group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    #[serde(rename = "GroupName")]
    pub name: String,

    #[serde(rename = "SelectionType", default)]
    pub selection_type: SelectType,

    #[serde(rename = "Options", default)]
    pub options: Vec<ModOption>,
}

impl OptionGroup {
    pub fn new(name: impl Into<String>, selection_type: SelectType) -> Self {
        Self {
            name: name.into(),
            selection_type,
            options: Vec::new(),
        }
    }

    pub fn is_single(&self) -> bool {
        self.selection_type == SelectType::Single
    }

    pub fn is_multi(&self) -> bool {
        self.selection_type == SelectType::Multi
    }

    /// Largest setting value that is valid for the current option count
    pub fn max_setting(&self) -> u32 {
        let count = self.options.len();
        match self.selection_type {
            SelectType::Single => count.saturating_sub(1) as u32,
            SelectType::Multi if count >= MAX_MULTI_OPTIONS => u32::MAX,
            SelectType::Multi => (1u32 << count) - 1,
        }
    }

    /// Indices of options that are active under `setting`
    pub fn active_indices(&self, setting: u32) -> Vec<usize> {
        match self.selection_type {
            SelectType::Single => {
                let index = setting as usize;
                if index < self.options.len() {
                    vec![index]
                } else {
                    Vec::new()
                }
            }
            SelectType::Multi => (0..self.options.len().min(MAX_MULTI_OPTIONS))
                .filter(|&i| setting & (1 << i) != 0)
                .collect(),
        }
    }

    /// Option names in order, for combo or checkbox rendering
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }
}
