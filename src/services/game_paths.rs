//! Parsing of the game path input used when adding files to an option.
//!
//! The input is a `;`-separated list. `default` stands for the file's own
//! relative path, `default-N` for that path with its first N folders skipped.

use crate::models::{GamePath, PathError, RelPath};
use regex::Regex;
use std::sync::LazyLock;

pub const GAME_PATHS_SEPARATOR: char = ';';

pub const DEFAULT_GAME_PATH: &str = "default";

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:default)(?:-(\d+))?$").expect("default game path pattern is valid")
});

/// Parse `input` into the game paths it describes for `file`.
///
/// Empty entries are skipped. Duplicates are kept once, in input order.
pub fn parse_game_paths(input: &str, file: &RelPath) -> Result<Vec<GamePath>, PathError> {
    let mut paths = Vec::new();

    for entry in input.split(GAME_PATHS_SEPARATOR).map(str::trim) {
        if entry.is_empty() {
            continue;
        }

        let path = match DEFAULT_PATTERN.captures(entry) {
            Some(captures) => {
                let skip = captures
                    .get(1)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .unwrap_or(0);
                GamePath::from_rel_path(file, skip)?
            }
            None => GamePath::new(entry)?,
        };

        if !path.is_empty() && !paths.contains(&path) {
            paths.push(path);
        }
    }

    Ok(paths)
}
