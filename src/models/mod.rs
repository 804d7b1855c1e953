//! Data models for mod metadata editing.
//!
//! - [`GamePath`] / [`RelPath`]: normalized in-game and local file paths
//! - [`ModOption`]: one selectable choice and the files it replaces
//! - [`OptionGroup`]: ordered options plus a [`SelectType`]
//! - [`ModMeta`]: groups, file swaps and descriptive info of one mod
//! - [`ModSettings`]: the persisted per-group selection values
//!
//! All models derive `Serialize`/`Deserialize` for YAML persistence through
//! [`crate::store::YamlModStore`]. Mutations that must keep settings and meta
//! consistent go through [`crate::services::GroupEditor`].

pub mod group;
pub mod meta;
pub mod mod_option;
pub mod paths;
pub mod settings;

pub use group::{MAX_MULTI_OPTIONS, OptionGroup, SelectType};
pub use meta::{ModInfoField, ModMeta};
pub use mod_option::ModOption;
pub use paths::{GamePath, MAX_GAME_PATH_LENGTH, PathError, RelPath};
pub use settings::ModSettings;
