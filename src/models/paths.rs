use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum length of a game path, in bytes of its normalized form.
pub const MAX_GAME_PATH_LENGTH: usize = 255;

/// Errors produced while constructing a [`GamePath`] or [`RelPath`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Game path is longer than {MAX_GAME_PATH_LENGTH} characters: {0}")]
    TooLong(String),

    #[error("Relative path is empty")]
    EmptyRelPath,

    #[error("Relative path must not be absolute: {0}")]
    Absolute(String),

    #[error("Relative path must not leave the mod directory: {0}")]
    ParentComponent(String),

    #[error("Cannot skip {skip} folders of {path}")]
    SkipTooLarge { path: String, skip: usize },
}

/// Normalized virtual path of an in-game asset.
///
/// Construction lower-cases the path and converts `\` separators to `/`, so
/// equality, ordering and hashing are all case-insensitive with respect to
/// the input. The empty path is a valid "no path" value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GamePath(String);

impl GamePath {
    pub fn new(path: &str) -> Result<Self, PathError> {
        let normalized = path
            .trim()
            .replace('\\', "/")
            .trim_start_matches('/')
            .to_lowercase();

        if normalized.len() > MAX_GAME_PATH_LENGTH {
            return Err(PathError::TooLong(path.to_string()));
        }

        Ok(Self(normalized))
    }

    /// The "no path" sentinel used for the trailing blank row of a swap table.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Derive the default game path for a local file, skipping its first
    /// `skip_folders` directories.
    pub fn from_rel_path(file: &RelPath, skip_folders: usize) -> Result<Self, PathError> {
        let components: Vec<&str> = file.as_str().split('/').collect();
        if skip_folders >= components.len() {
            return Err(PathError::SkipTooLarge {
                path: file.to_string(),
                skip: skip_folders,
            });
        }

        Self::new(&components[skip_folders..].join("/"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GamePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<GamePath> for String {
    fn from(path: GamePath) -> Self {
        path.0
    }
}

/// Path of a local file, relative to its mod's directory.
///
/// Separators are normalized to `/`. Case is preserved since it names a real
/// file on disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelPath(String);

impl RelPath {
    pub fn new(path: &str) -> Result<Self, PathError> {
        let normalized = path.trim().replace('\\', "/");

        if normalized.is_empty() {
            return Err(PathError::EmptyRelPath);
        }
        if normalized.starts_with('/') || normalized.contains(':') {
            return Err(PathError::Absolute(path.to_string()));
        }
        if normalized.split('/').any(|component| component == "..") {
            return Err(PathError::ParentComponent(path.to_string()));
        }

        let cleaned = normalized
            .split('/')
            .filter(|component| !component.is_empty() && *component != ".")
            .collect::<Vec<_>>()
            .join("/");

        if cleaned.is_empty() {
            return Err(PathError::EmptyRelPath);
        }

        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RelPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RelPath> for String {
    fn from(path: RelPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_path_normalization() {
        let path = GamePath::new("  Chara\\Equipment\\E0001.TEX ").unwrap();
        assert_eq!(path.as_str(), "chara/equipment/e0001.tex");
    }

    #[test]
    fn test_game_path_case_insensitive_equality() {
        assert_eq!(
            GamePath::new("UI/Icon/Foo.tex").unwrap(),
            GamePath::new("ui/icon/foo.TEX").unwrap()
        );
    }

    #[test]
    fn test_game_path_leading_slash_stripped() {
        assert_eq!(GamePath::new("/a/b.png").unwrap().as_str(), "a/b.png");
    }

    #[test]
    fn test_game_path_empty_is_valid() {
        let path = GamePath::new("   ").unwrap();
        assert!(path.is_empty());
        assert_eq!(path, GamePath::empty());
    }

    #[test]
    fn test_game_path_too_long() {
        let long = "a".repeat(MAX_GAME_PATH_LENGTH + 1);
        assert!(matches!(GamePath::new(&long), Err(PathError::TooLong(_))));

        let max = "a".repeat(MAX_GAME_PATH_LENGTH);
        assert!(GamePath::new(&max).is_ok());
    }

    #[test]
    fn test_game_path_from_rel_path() {
        let file = RelPath::new("Files/chara/body.mdl").unwrap();

        assert_eq!(
            GamePath::from_rel_path(&file, 0).unwrap().as_str(),
            "files/chara/body.mdl"
        );
        assert_eq!(
            GamePath::from_rel_path(&file, 1).unwrap().as_str(),
            "chara/body.mdl"
        );
        assert!(matches!(
            GamePath::from_rel_path(&file, 3),
            Err(PathError::SkipTooLarge { skip: 3, .. })
        ));
    }

    #[test]
    fn test_rel_path_validation() {
        assert_eq!(RelPath::new("a\\b\\c.tex").unwrap().as_str(), "a/b/c.tex");
        assert_eq!(RelPath::new("./a//b.tex").unwrap().as_str(), "a/b.tex");
        assert!(matches!(RelPath::new(""), Err(PathError::EmptyRelPath)));
        assert!(matches!(RelPath::new("/etc/passwd"), Err(PathError::Absolute(_))));
        assert!(matches!(RelPath::new("C:/x.tex"), Err(PathError::Absolute(_))));
        assert!(matches!(
            RelPath::new("a/../../b"),
            Err(PathError::ParentComponent(_))
        ));
    }

    #[test]
    fn test_game_path_serde_normalizes() {
        let path: GamePath = serde_yaml_ng::from_str("\"A\\\\B.png\"").unwrap();
        assert_eq!(path.as_str(), "a/b.png");
    }
}
