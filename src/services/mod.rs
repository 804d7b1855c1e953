//! Services module - Pure editing logic for option groups, options and file swaps.
//!
//! Everything here operates on borrowed [`ModMeta`](crate::models::ModMeta) and
//! [`ModSettings`](crate::models::ModSettings) values and has no knowledge of
//! persistence or rendering, so any front end can drive it.
//!
//! # Components
//!
//! - [`GroupEditor`]: group, option, selection, option file and swap edits.
//!   Every operation either returns an [`EditOutcome`] describing what changed
//!   or an [`EditRejection`] with both stores untouched.
//! - [`bitmask`]: positional bitmask arithmetic for Multi selections
//! - [`parse_game_paths`]: the `;`-separated game path input with `default`
//!   and `default-N` shorthands
//! - [`resolve_active_files`]: effective file mappings under the current
//!   settings, used when an enabled mod is reloaded
//!
//! # Usage Example
//!
//! ```ignore
//! use modopt::services::GroupEditor;
//! use modopt::models::SelectType;
//!
//! let mut editor = GroupEditor::new(&mut meta, &mut settings);
//! editor.add_group("Extras", SelectType::Multi)?;
//! editor.add_option("Extras", "Tattoo")?;
//! let outcome = editor.toggle_multi_option("Extras", 0)?;
//! assert!(outcome.needs_save());
//! ```

pub mod bitmask;
pub mod editor;
pub mod game_paths;
pub mod resolver;
pub mod swaps;

pub use editor::{EditOutcome, EditRejection, EditResult, GroupEditor};
pub use game_paths::parse_game_paths;
pub use resolver::{ResolvedFiles, resolve_active_files};
