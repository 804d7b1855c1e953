use super::bitmask;
use super::game_paths::parse_game_paths;
use crate::models::{
    GamePath, MAX_MULTI_OPTIONS, ModInfoField, ModMeta, ModOption, ModSettings, OptionGroup,
    PathError, RelPath, SelectType,
};
use thiserror::Error;

/// Reasons an edit is refused.
///
/// A rejected edit never mutates the meta or the settings, so callers that do
/// not care why may simply ignore the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRejection {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("A group named {0} already exists")]
    DuplicateGroup(String),

    #[error("Group {0} not found")]
    UnknownGroup(String),

    #[error("Group {group} has no option at index {index}")]
    OptionOutOfRange { group: String, index: usize },

    #[error("Group {group} is not a {expected} group")]
    WrongSelectionType { group: String, expected: SelectType },

    #[error("Multi group {0} already has the maximum of {MAX_MULTI_OPTIONS} options")]
    TooManyOptions(String),

    #[error("File swap table has no row {0}")]
    SwapRowOutOfRange(usize),

    #[error("No files given")]
    NoFiles,

    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

/// What an accepted edit changed, and therefore what the caller has to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// The mod meta was modified and must be saved
    pub meta_changed: bool,

    /// A stored settings value was added, removed or modified
    pub settings_changed: bool,

    /// The set of active options of some group changed
    pub selection_changed: bool,

    /// Files or swaps that feed the effective file mappings changed
    pub mappings_changed: bool,
}

impl EditOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }

    pub fn needs_save(&self) -> bool {
        self.meta_changed || self.settings_changed
    }

    /// Whether an enabled mod has to recompute its active file mappings
    pub fn needs_reload(&self) -> bool {
        self.mappings_changed || self.selection_changed
    }

    fn meta() -> Self {
        Self {
            meta_changed: true,
            ..Self::default()
        }
    }

    fn mappings() -> Self {
        Self {
            meta_changed: true,
            mappings_changed: true,
            ..Self::default()
        }
    }

    fn selection() -> Self {
        Self {
            settings_changed: true,
            selection_changed: true,
            ..Self::default()
        }
    }
}

pub type EditResult = Result<EditOutcome, EditRejection>;

/// Applies group, option and file swap edits to one mod.
///
/// Every operation validates first and mutates second, so a rejection leaves
/// both `meta` and `settings` untouched. Accepted operations keep the settings
/// consistent with the meta: names are moved along with renamed groups, and
/// indices and bitmasks are renumbered when options are removed.
pub struct GroupEditor<'a> {
    pub(crate) meta: &'a mut ModMeta,
    pub(crate) settings: &'a mut ModSettings,
}

impl<'a> GroupEditor<'a> {
    pub fn new(meta: &'a mut ModMeta, settings: &'a mut ModSettings) -> Self {
        Self { meta, settings }
    }

    // Group lifecycle

    /// Add an empty group. Its setting starts at 0.
    pub fn add_group(&mut self, name: &str, selection_type: SelectType) -> EditResult {
        if name.is_empty() {
            return Err(EditRejection::EmptyName);
        }
        if self.meta.has_group(name) {
            return Err(EditRejection::DuplicateGroup(name.to_string()));
        }

        self.meta
            .groups
            .insert(name.to_string(), OptionGroup::new(name, selection_type));
        self.settings.set(name, 0);

        tracing::info!("Added {} group {}", selection_type, name);
        Ok(EditOutcome {
            meta_changed: true,
            settings_changed: true,
            ..EditOutcome::default()
        })
    }

    /// Rename a group, carrying its options, selection type and setting.
    ///
    /// Renaming to the empty string removes the group.
    pub fn rename_group(&mut self, old_name: &str, new_name: &str) -> EditResult {
        if !self.meta.has_group(old_name) {
            return Err(EditRejection::UnknownGroup(old_name.to_string()));
        }
        if new_name == old_name {
            return Ok(EditOutcome::unchanged());
        }
        if new_name.is_empty() {
            return self.remove_group(old_name);
        }
        if self.meta.has_group(new_name) {
            return Err(EditRejection::DuplicateGroup(new_name.to_string()));
        }

        let Some((index, _, mut group)) = self.meta.groups.shift_remove_full(old_name) else {
            return Err(EditRejection::UnknownGroup(old_name.to_string()));
        };
        group.name = new_name.to_string();
        self.meta.groups.shift_insert(index, new_name.to_string(), group);

        self.settings.rename(old_name, new_name);
        self.settings.fix_specific_setting(new_name, self.meta);

        tracing::info!("Renamed group {} to {}", old_name, new_name);
        Ok(EditOutcome {
            meta_changed: true,
            settings_changed: true,
            ..EditOutcome::default()
        })
    }

    /// Remove a group and its setting
    pub fn remove_group(&mut self, name: &str) -> EditResult {
        let Some(group) = self.meta.groups.shift_remove(name) else {
            return Err(EditRejection::UnknownGroup(name.to_string()));
        };

        let had_active = !group.active_indices(self.settings.get(name)).is_empty();
        let settings_changed = self.settings.fix_specific_setting(name, self.meta);

        tracing::info!("Removed group {}", name);
        Ok(EditOutcome {
            meta_changed: true,
            settings_changed,
            selection_changed: had_active,
            mappings_changed: had_active,
        })
    }

    // Option lifecycle

    /// Append an option to a group.
    ///
    /// In a Single group the new option becomes the selected one. In a Multi
    /// group it starts inactive.
    pub fn add_option(&mut self, group_name: &str, option_name: &str) -> EditResult {
        if option_name.is_empty() {
            return Err(EditRejection::EmptyName);
        }

        let group = group_mut(self.meta, group_name)?;
        if group.is_multi() && group.options.len() >= MAX_MULTI_OPTIONS {
            return Err(EditRejection::TooManyOptions(group_name.to_string()));
        }

        group.options.push(ModOption::new(option_name));
        let index = group.options.len() - 1;
        tracing::info!("Added option {} to group {}", option_name, group_name);

        match group.selection_type {
            SelectType::Single => {
                self.settings.set(group_name, index as u32);
                Ok(EditOutcome {
                    meta_changed: true,
                    settings_changed: true,
                    selection_changed: true,
                    mappings_changed: true,
                })
            }
            SelectType::Multi => Ok(EditOutcome::meta()),
        }
    }

    /// Rename an option in place, keeping its description and files.
    ///
    /// Renaming to the empty string removes the option. Option names need not
    /// be unique within a group.
    pub fn rename_option(&mut self, group_name: &str, index: usize, new_name: &str) -> EditResult {
        if new_name.is_empty() {
            return self.remove_option(group_name, index);
        }

        let option = option_mut(self.meta, group_name, index)?;
        if option.name == new_name {
            return Ok(EditOutcome::unchanged());
        }

        tracing::info!(
            "Renamed option {} of group {} to {}",
            option.name,
            group_name,
            new_name
        );
        option.name = new_name.to_string();
        Ok(EditOutcome::meta())
    }

    /// Remove an option and renumber the group's setting.
    ///
    /// Single: a selection above `index` moves down by one. If the selected
    /// option itself is removed, the option that moves into its position
    /// becomes selected, or the new last option if there is none.
    ///
    /// Multi: the bit at `index` is dropped and higher bits shift down.
    pub fn remove_option(&mut self, group_name: &str, index: usize) -> EditResult {
        let group = group_mut(self.meta, group_name)?;
        if index >= group.options.len() {
            return Err(EditRejection::OptionOutOfRange {
                group: group_name.to_string(),
                index,
            });
        }

        let old = self.settings.get(group_name);
        let was_active = group.active_indices(old).contains(&index);

        let removed = group.options.remove(index);
        let remaining = group.options.len();
        let renumbered = match group.selection_type {
            SelectType::Single => single_after_removal(old, index, remaining),
            SelectType::Multi => bitmask::remove_bit(old, index),
        };

        self.settings.set(group_name, renumbered);
        self.settings.fix_specific_setting(group_name, self.meta);
        let settings_changed = self.settings.get(group_name) != old;

        tracing::info!("Removed option {} from group {}", removed.name, group_name);
        Ok(EditOutcome {
            meta_changed: true,
            settings_changed,
            selection_changed: was_active,
            mappings_changed: was_active,
        })
    }

    /// Replace the description of an option
    pub fn set_option_description(
        &mut self,
        group_name: &str,
        index: usize,
        description: &str,
    ) -> EditResult {
        let option = option_mut(self.meta, group_name, index)?;
        if option.description == description {
            return Ok(EditOutcome::unchanged());
        }

        option.description = description.to_string();
        tracing::debug!("Updated description of option {} in {}", index, group_name);
        Ok(EditOutcome::meta())
    }

    // Selection

    /// Select option `index` of a Single group
    pub fn set_single_selection(&mut self, group_name: &str, index: usize) -> EditResult {
        let group = checked_group(self.meta, group_name, SelectType::Single)?;
        if index >= group.options.len() {
            return Err(EditRejection::OptionOutOfRange {
                group: group_name.to_string(),
                index,
            });
        }

        if !self.settings.set(group_name, index as u32) {
            return Ok(EditOutcome::unchanged());
        }
        Ok(EditOutcome::selection())
    }

    /// Flip option `index` of a Multi group on or off.
    ///
    /// Any subset of options is a valid Multi selection, so this always
    /// changes the stored mask. Only the first [`MAX_MULTI_OPTIONS`] options
    /// have a bit.
    pub fn toggle_multi_option(&mut self, group_name: &str, index: usize) -> EditResult {
        let group = checked_group(self.meta, group_name, SelectType::Multi)?;
        // Options past the mask width of an oversized group cannot be selected
        if index >= group.options.len().min(MAX_MULTI_OPTIONS) {
            return Err(EditRejection::OptionOutOfRange {
                group: group_name.to_string(),
                index,
            });
        }

        let mask = bitmask::toggle_bit(self.settings.get(group_name), index);
        self.settings.set(group_name, mask);
        tracing::debug!("Toggled option {} of {}, mask is now {:#b}", index, group_name, mask);
        Ok(EditOutcome::selection())
    }

    // Option files

    /// Add the game paths described by `input` to each of `files` in an option.
    ///
    /// See [`parse_game_paths`] for the input syntax. Nothing is changed if any
    /// entry fails to parse.
    pub fn add_option_files(
        &mut self,
        group_name: &str,
        index: usize,
        files: &[RelPath],
        input: &str,
    ) -> EditResult {
        if files.is_empty() {
            return Err(EditRejection::NoFiles);
        }
        let parsed = parse_for_files(files, input)?;

        let option = option_mut(self.meta, group_name, index)?;
        let mut changed = false;
        for (file, paths) in parsed {
            changed |= option.add_game_paths(file, paths);
        }

        if !changed {
            return Ok(EditOutcome::unchanged());
        }
        tracing::info!(
            "Added {} file(s) to option {} of group {}",
            files.len(),
            index,
            group_name
        );
        Ok(EditOutcome::mappings())
    }

    /// Remove files or game paths from an option.
    ///
    /// An empty `input` removes the files entirely. Otherwise only the parsed
    /// game paths are removed, and a file left without paths is dropped.
    pub fn remove_option_files(
        &mut self,
        group_name: &str,
        index: usize,
        files: &[RelPath],
        input: &str,
    ) -> EditResult {
        if files.is_empty() {
            return Err(EditRejection::NoFiles);
        }
        let whole_files = input.trim().is_empty();
        let parsed = if whole_files {
            Vec::new()
        } else {
            parse_for_files(files, input)?
        };

        let option = option_mut(self.meta, group_name, index)?;
        let mut changed = false;
        if whole_files {
            for file in files {
                changed |= option.remove_file(file);
            }
        } else {
            for (file, paths) in &parsed {
                changed |= option.remove_game_paths(file, paths);
            }
        }

        if !changed {
            return Ok(EditOutcome::unchanged());
        }
        tracing::info!(
            "Removed file(s) from option {} of group {}",
            index,
            group_name
        );
        Ok(EditOutcome::mappings())
    }

    // Mod status

    /// Enable or disable the mod. Enabling makes its mappings live.
    pub fn set_enabled(&mut self, enabled: bool) -> EditResult {
        if self.settings.enabled == enabled {
            return Ok(EditOutcome::unchanged());
        }

        self.settings.enabled = enabled;
        tracing::info!("Mod {}", if enabled { "enabled" } else { "disabled" });
        Ok(EditOutcome {
            settings_changed: true,
            mappings_changed: true,
            ..EditOutcome::default()
        })
    }

    pub fn set_priority(&mut self, priority: i32) -> EditResult {
        if self.settings.priority == priority {
            return Ok(EditOutcome::unchanged());
        }

        self.settings.priority = priority;
        Ok(EditOutcome {
            settings_changed: true,
            ..EditOutcome::default()
        })
    }

    // Mod info

    pub fn set_mod_info(&mut self, field: ModInfoField, value: &str) -> EditResult {
        let current = self.meta.info_mut(field);
        if current.as_str() == value {
            return Ok(EditOutcome::unchanged());
        }

        *current = value.to_string();
        tracing::debug!("Updated mod info {:?}", field);
        Ok(EditOutcome::meta())
    }
}

fn group_mut<'m>(meta: &'m mut ModMeta, name: &str) -> Result<&'m mut OptionGroup, EditRejection> {
    meta.group_mut(name)
        .ok_or_else(|| EditRejection::UnknownGroup(name.to_string()))
}

fn checked_group<'m>(
    meta: &'m ModMeta,
    name: &str,
    expected: SelectType,
) -> Result<&'m OptionGroup, EditRejection> {
    let group = meta
        .group(name)
        .ok_or_else(|| EditRejection::UnknownGroup(name.to_string()))?;
    if group.selection_type != expected {
        return Err(EditRejection::WrongSelectionType {
            group: name.to_string(),
            expected,
        });
    }
    Ok(group)
}

fn option_mut<'m>(
    meta: &'m mut ModMeta,
    group_name: &str,
    index: usize,
) -> Result<&'m mut ModOption, EditRejection> {
    group_mut(meta, group_name)?
        .options
        .get_mut(index)
        .ok_or_else(|| EditRejection::OptionOutOfRange {
            group: group_name.to_string(),
            index,
        })
}

fn parse_for_files<'f>(
    files: &'f [RelPath],
    input: &str,
) -> Result<Vec<(&'f RelPath, Vec<GamePath>)>, EditRejection> {
    files
        .iter()
        .map(|file| -> Result<_, EditRejection> { Ok((file, parse_game_paths(input, file)?)) })
        .collect()
}

/// New selected index of a Single group after option `removed` is deleted
fn single_after_removal(old: u32, removed: usize, remaining: usize) -> u32 {
    let old = old as usize;
    let new = if old > removed {
        old - 1
    } else if old == removed {
        if removed < remaining {
            removed
        } else {
            remaining.saturating_sub(1)
        }
    } else {
        old
    };
    new as u32
}
