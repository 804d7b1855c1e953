use super::paths::{GamePath, RelPath};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One selectable choice within an option group.
///
/// `files` maps each local file of the mod to the set of game paths it
/// replaces while this option is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModOption {
    #[serde(rename = "OptionName")]
    pub name: String,

    #[serde(rename = "OptionDesc", default)]
    pub description: String,

    #[serde(rename = "OptionFiles", default)]
    pub files: IndexMap<RelPath, IndexSet<GamePath>>,
}

impl ModOption {
    /// Create an option with an empty description and no files
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            files: IndexMap::new(),
        }
    }

    /// Add game paths for a file. Returns true if any path was new.
    pub fn add_game_paths<I>(&mut self, file: &RelPath, paths: I) -> bool
    where
        I: IntoIterator<Item = GamePath>,
    {
        let mut paths = paths.into_iter().filter(|p| !p.is_empty()).peekable();
        if paths.peek().is_none() {
            return false;
        }

        let set = self.files.entry(file.clone()).or_default();
        let mut added = false;
        for path in paths {
            added |= set.insert(path);
        }
        added
    }

    /// Remove game paths from a file, dropping the file once it has none left.
    /// Returns true if anything was removed.
    pub fn remove_game_paths<'a, I>(&mut self, file: &RelPath, paths: I) -> bool
    where
        I: IntoIterator<Item = &'a GamePath>,
    {
        let Some(set) = self.files.get_mut(file) else {
            return false;
        };

        let mut removed = false;
        for path in paths {
            removed |= set.shift_remove(path);
        }

        if set.is_empty() {
            self.files.shift_remove(file);
        }
        removed
    }

    /// Remove a file from this option entirely
    pub fn remove_file(&mut self, file: &RelPath) -> bool {
        self.files.shift_remove(file).is_some()
    }

    /// Iterate every (file, game path) pair of this option
    pub fn mappings(&self) -> impl Iterator<Item = (&RelPath, &GamePath)> {
        self.files
            .iter()
            .flat_map(|(file, paths)| paths.iter().map(move |path| (file, path)))
    }
}
