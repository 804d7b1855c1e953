// modopt - Option group and file swap editor for game mods
//
// This is the library crate containing the data model, the editing rules and
// the session that persists edits. The binary crate (main.rs) provides a
// console front end.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use config::EditorConfig;
pub use metrics::EditMetrics;
pub use models::{GamePath, ModMeta, ModOption, ModSettings, OptionGroup, RelPath, SelectType};
pub use services::{EditOutcome, EditRejection, GroupEditor};
pub use state::{EditRequest, EditorChange, EditorSession, Selection};
pub use store::{MappingReloader, ModReloader, ModStore, StoreError, YamlModStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
