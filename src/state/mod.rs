// Editor session module
//
// This module provides the EditorSession which owns the meta and settings of
// the mod being edited, applies edits through GroupEditor, persists them and
// emits change events for front ends.

use crate::metrics::EditMetrics;
use crate::models::{
    MAX_MULTI_OPTIONS, ModInfoField, ModMeta, ModOption, ModSettings, OptionGroup, RelPath,
    SelectType,
};
use crate::services::{EditOutcome, EditRejection, EditResult, GroupEditor};
use crate::store::{ModReloader, ModStore, StoreError};
use tokio::sync::broadcast;

/// Change events emitted when an edit is applied
///
/// Front ends subscribe to these instead of diffing the mod themselves.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorChange {
    /// Groups were added, removed, renamed or reordered
    GroupsChanged,

    /// Options of an existing group changed (names, descriptions or files)
    OptionsChanged { group: String },

    /// The stored selection of a group changed
    SelectionChanged { group: String, value: u32 },

    /// A group's stored selection was dropped, usually with the group itself
    SelectionRemoved { group: String },

    FileSwapsChanged,

    ModInfoChanged,

    /// Enabled flag or priority changed
    StatusChanged { enabled: bool, priority: i32 },

    /// Meta and settings were written to the store
    Saved,

    SaveFailed { message: String },

    /// Active mappings were recomputed
    Reloaded,

    ReloadFailed { message: String },
}

/// One edit, as submitted by a front end.
///
/// Edits discovered while iterating over the mod are collected as requests
/// and applied afterwards with [`EditorSession::apply_all`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditRequest {
    AddGroup { name: String, selection_type: SelectType },
    RenameGroup { old_name: String, new_name: String },
    RemoveGroup { name: String },
    AddOption { group: String, name: String },
    RenameOption { group: String, index: usize, name: String },
    RemoveOption { group: String, index: usize },
    SetOptionDescription { group: String, index: usize, description: String },
    SelectSingle { group: String, index: usize },
    ToggleMulti { group: String, index: usize },
    AddOptionFiles { group: String, index: usize, files: Vec<RelPath>, input: String },
    RemoveOptionFiles { group: String, index: usize, files: Vec<RelPath>, input: String },
    EditSwapSource { row: usize, input: String },
    EditSwapTarget { row: usize, input: String },
    SetModInfo { field: ModInfoField, value: String },
    SetEnabled(bool),
    SetPriority(i32),
}

/// The group and option the user is looking at.
///
/// Indices into [`ModMeta::groups`] and the selected group's options. Never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub group: Option<usize>,
    pub option: Option<usize>,
}

/// Editing session for a single mod
///
/// This is the central component that:
/// - Owns the [`ModMeta`] and [`ModSettings`] of the selected mod
/// - Applies [`EditRequest`]s through [`GroupEditor`]
/// - Saves after every accepted change and reloads enabled mods
/// - Detects changes and emits [`EditorChange`] events
/// - Supports subscribing to changes via tokio broadcast channels
///
/// A session is discarded when another mod is selected. Persistence failures
/// are reported as events; the in-memory edit is kept.
///
/// # Related Types
///
/// - [`crate::store::ModStore`]: save/load collaborator
/// - [`crate::store::ModReloader`]: recomputes active mappings
/// - [`crate::metrics::EditMetrics`]: counters logged on [`close`](Self::close)
pub struct EditorSession<S: ModStore, R: ModReloader> {
    mod_id: String,
    meta: ModMeta,
    settings: ModSettings,
    selection: Selection,

    store: S,
    reloader: R,

    /// Broadcast channel for change events
    change_tx: broadcast::Sender<EditorChange>,

    metrics: EditMetrics,
}

impl<S: ModStore, R: ModReloader> EditorSession<S, R> {
    /// Load a mod and reconcile its settings with its meta.
    ///
    /// If reconciliation changed anything the settings are saved right away.
    /// `capacity` is the buffer size of the change channel.
    pub fn open(mod_id: &str, mut store: S, reloader: R, capacity: usize) -> Result<Self, StoreError> {
        let (meta, mut settings) = store.load_mod(mod_id)?;

        for group in meta.oversized_multi_groups() {
            tracing::warn!(
                "Multi group {} of mod {} has more than {} options; the extra options cannot be selected",
                group,
                mod_id,
                MAX_MULTI_OPTIONS
            );
        }

        if settings.fix_invalid_settings(&meta) {
            tracing::info!("Repaired inconsistent settings of mod {}", mod_id);
            if let Err(e) = store.save_mod(mod_id, &meta, &settings) {
                tracing::warn!("Failed to save repaired settings of {}: {}", mod_id, e);
            }
        }

        let (change_tx, _) = broadcast::channel(capacity.max(1));
        let mut session = Self {
            mod_id: mod_id.to_string(),
            meta,
            settings,
            selection: Selection::default(),
            store,
            reloader,
            change_tx,
            metrics: EditMetrics::new(),
        };
        session.select_group(0);

        tracing::info!(
            "Opened mod {} with {} group(s) and {} file swap(s)",
            mod_id,
            session.meta.groups.len(),
            session.meta.file_swaps.len()
        );
        Ok(session)
    }

    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    pub fn meta(&self) -> &ModMeta {
        &self.meta
    }

    pub fn settings(&self) -> &ModSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reloader(&self) -> &R {
        &self.reloader
    }

    pub fn metrics(&self) -> &EditMetrics {
        &self.metrics
    }

    /// Subscribe to change events
    ///
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorChange> {
        self.change_tx.subscribe()
    }

    /// Apply an edit, persisting it and emitting change events
    ///
    /// Rejected edits change nothing and return an empty vector.
    pub fn apply(&mut self, request: EditRequest) -> Vec<EditorChange> {
        self.try_apply(request).unwrap_or_default()
    }

    /// Like [`apply`](Self::apply) but hands back the rejection reason
    ///
    /// This is the primary way to modify the mod. It:
    /// 1. Captures the old meta and settings
    /// 2. Runs the edit
    /// 3. Detects what changed
    /// 4. Saves, and reloads if the mod is enabled and its mappings moved
    /// 5. Emits the events
    pub fn try_apply(&mut self, request: EditRequest) -> Result<Vec<EditorChange>, EditRejection> {
        let old_meta = self.meta.clone();
        let old_settings = self.settings.clone();

        let outcome = match self.run(&request) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                tracing::debug!("Rejected {:?}: {}", request, rejection);
                self.metrics.record_rejected();
                return Err(rejection);
            }
        };

        self.clamp_selection();
        if outcome.is_unchanged() {
            self.metrics.record_unchanged();
            return Ok(Vec::new());
        }
        self.metrics.record_applied();

        let mut changes = detect_changes(&old_meta, &self.meta, &old_settings, &self.settings);
        changes.extend(self.persist(outcome));

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.change_tx.send(change.clone());
        }

        Ok(changes)
    }

    /// Apply queued requests in order
    pub fn apply_all<I>(&mut self, requests: I) -> Vec<EditorChange>
    where
        I: IntoIterator<Item = EditRequest>,
    {
        requests
            .into_iter()
            .flat_map(|request| self.apply(request))
            .collect()
    }

    fn run(&mut self, request: &EditRequest) -> EditResult {
        let mut editor = GroupEditor::new(&mut self.meta, &mut self.settings);
        match request {
            EditRequest::AddGroup { name, selection_type } => {
                editor.add_group(name, *selection_type)
            }
            EditRequest::RenameGroup { old_name, new_name } => {
                editor.rename_group(old_name, new_name)
            }
            EditRequest::RemoveGroup { name } => editor.remove_group(name),
            EditRequest::AddOption { group, name } => editor.add_option(group, name),
            EditRequest::RenameOption { group, index, name } => {
                editor.rename_option(group, *index, name)
            }
            EditRequest::RemoveOption { group, index } => editor.remove_option(group, *index),
            EditRequest::SetOptionDescription { group, index, description } => {
                editor.set_option_description(group, *index, description)
            }
            EditRequest::SelectSingle { group, index } => {
                editor.set_single_selection(group, *index)
            }
            EditRequest::ToggleMulti { group, index } => {
                editor.toggle_multi_option(group, *index)
            }
            EditRequest::AddOptionFiles { group, index, files, input } => {
                editor.add_option_files(group, *index, files, input)
            }
            EditRequest::RemoveOptionFiles { group, index, files, input } => {
                editor.remove_option_files(group, *index, files, input)
            }
            EditRequest::EditSwapSource { row, input } => editor.edit_swap_source(*row, input),
            EditRequest::EditSwapTarget { row, input } => editor.edit_swap_target(*row, input),
            EditRequest::SetModInfo { field, value } => editor.set_mod_info(*field, value),
            EditRequest::SetEnabled(enabled) => editor.set_enabled(*enabled),
            EditRequest::SetPriority(priority) => editor.set_priority(*priority),
        }
    }

    /// Save, then reload if needed. Failures become events.
    fn persist(&mut self, outcome: EditOutcome) -> Vec<EditorChange> {
        let mut changes = Vec::new();

        if outcome.needs_save() {
            match self.store.save_mod(&self.mod_id, &self.meta, &self.settings) {
                Ok(()) => {
                    self.metrics.record_save(true);
                    changes.push(EditorChange::Saved);
                }
                Err(e) => {
                    tracing::error!("Failed to save mod {}: {}", self.mod_id, e);
                    self.metrics.record_save(false);
                    changes.push(EditorChange::SaveFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        if self.settings.enabled && outcome.needs_reload() {
            match self.reloader.reload_mod(&self.mod_id, &self.meta, &self.settings) {
                Ok(()) => {
                    self.metrics.record_reload(true);
                    changes.push(EditorChange::Reloaded);
                }
                Err(e) => {
                    tracing::error!("Failed to reload mod {}: {}", self.mod_id, e);
                    self.metrics.record_reload(false);
                    changes.push(EditorChange::ReloadFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        changes
    }

    // Selection context

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select a group by position, clamped to the existing groups
    pub fn select_group(&mut self, index: usize) -> Selection {
        self.selection.group = clamp_index(index, self.meta.groups.len());
        self.selection.option = self
            .selected_group()
            .and_then(|group| clamp_index(0, group.options.len()));
        self.selection
    }

    /// Select an option of the selected group, clamped to its options
    pub fn select_option(&mut self, index: usize) -> Selection {
        self.selection.option = self
            .selected_group()
            .and_then(|group| clamp_index(index, group.options.len()));
        self.selection
    }

    pub fn selected_group(&self) -> Option<&OptionGroup> {
        self.selection
            .group
            .and_then(|index| self.meta.groups.get_index(index))
            .map(|(_, group)| group)
    }

    pub fn selected_option(&self) -> Option<&ModOption> {
        let group = self.selected_group()?;
        group.options.get(self.selection.option?)
    }

    fn clamp_selection(&mut self) {
        let group_count = self.meta.groups.len();
        self.selection.group = self
            .selection
            .group
            .and_then(|index| clamp_index(index, group_count))
            .or_else(|| clamp_index(0, group_count));

        let option_count = self.selected_group().map_or(0, |group| group.options.len());
        self.selection.option = self
            .selection
            .option
            .and_then(|index| clamp_index(index, option_count))
            .or_else(|| clamp_index(0, option_count));
    }

    // Convenience methods for common edits

    pub fn add_group(&mut self, name: &str, selection_type: SelectType) -> Vec<EditorChange> {
        self.apply(EditRequest::AddGroup {
            name: name.to_string(),
            selection_type,
        })
    }

    pub fn rename_group(&mut self, old_name: &str, new_name: &str) -> Vec<EditorChange> {
        self.apply(EditRequest::RenameGroup {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }

    pub fn add_option(&mut self, group: &str, name: &str) -> Vec<EditorChange> {
        self.apply(EditRequest::AddOption {
            group: group.to_string(),
            name: name.to_string(),
        })
    }

    pub fn rename_option(&mut self, group: &str, index: usize, name: &str) -> Vec<EditorChange> {
        self.apply(EditRequest::RenameOption {
            group: group.to_string(),
            index,
            name: name.to_string(),
        })
    }

    /// Select a Single option or toggle a Multi option, whichever fits the group
    pub fn choose_option(&mut self, group: &str, index: usize) -> Vec<EditorChange> {
        let request = match self.meta.group(group).map(|g| g.selection_type) {
            Some(SelectType::Multi) => EditRequest::ToggleMulti {
                group: group.to_string(),
                index,
            },
            _ => EditRequest::SelectSingle {
                group: group.to_string(),
                index,
            },
        };
        self.apply(request)
    }

    /// End the session, logging its metrics and returning the collaborators
    pub fn close(self) -> (S, R) {
        tracing::info!("Closing mod {}", self.mod_id);
        self.metrics.log_summary();
        (self.store, self.reloader)
    }
}

/// Detect what changed between two snapshots and generate events
fn detect_changes(
    old_meta: &ModMeta,
    new_meta: &ModMeta,
    old_settings: &ModSettings,
    new_settings: &ModSettings,
) -> Vec<EditorChange> {
    let mut changes = Vec::new();

    let old_shape: Vec<(&String, SelectType)> = old_meta
        .groups
        .iter()
        .map(|(name, group)| (name, group.selection_type))
        .collect();
    let new_shape: Vec<(&String, SelectType)> = new_meta
        .groups
        .iter()
        .map(|(name, group)| (name, group.selection_type))
        .collect();
    if old_shape != new_shape {
        changes.push(EditorChange::GroupsChanged);
    }

    // Options of groups that existed before
    for (name, group) in &new_meta.groups {
        if let Some(old_group) = old_meta.group(name)
            && old_group.options != group.options
        {
            changes.push(EditorChange::OptionsChanged {
                group: name.clone(),
            });
        }
    }

    for (group, &value) in &new_settings.settings {
        if old_settings.settings.get(group) != Some(&value) {
            changes.push(EditorChange::SelectionChanged {
                group: group.clone(),
                value,
            });
        }
    }

    for group in old_settings.settings.keys() {
        if !new_settings.settings.contains_key(group) {
            changes.push(EditorChange::SelectionRemoved {
                group: group.clone(),
            });
        }
    }

    if old_meta.file_swaps != new_meta.file_swaps {
        changes.push(EditorChange::FileSwapsChanged);
    }

    let info_fields = [
        ModInfoField::Name,
        ModInfoField::Author,
        ModInfoField::Description,
        ModInfoField::Version,
        ModInfoField::Website,
    ];
    if info_fields
        .iter()
        .any(|&field| old_meta.info(field) != new_meta.info(field))
    {
        changes.push(EditorChange::ModInfoChanged);
    }

    if old_settings.enabled != new_settings.enabled || old_settings.priority != new_settings.priority
    {
        changes.push(EditorChange::StatusChanged {
            enabled: new_settings.enabled,
            priority: new_settings.priority,
        });
    }

    changes
}

fn clamp_index(index: usize, len: usize) -> Option<usize> {
    if len == 0 { None } else { Some(index.min(len - 1)) }
}
