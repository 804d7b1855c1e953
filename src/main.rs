//! modopt - console front end for the mod option editor
//!
//! # Usage
//!
//! ```text
//! modopt <mod-id> [command args...]
//! ```
//!
//! Opens the mod below the configured mod root, optionally applies one edit
//! and prints the groups, options, selections and file swaps.
//!
//! # Commands
//!
//! - `add-group <name> <single|multi>`
//! - `rename-group <old> <new>` (an empty `<new>` removes the group)
//! - `add-option <group> <name>`
//! - `rename-option <group> <index> <name>` (an empty `<name>` removes the option)
//! - `select <group> <index>`: select an option of a Single group
//! - `toggle <group> <index>`: flip an option of a Multi group
//! - `swap-source <row> <path>`: row equal to the swap count adds a swap
//! - `swap-target <row> <path>`
//! - `enable` / `disable`
//!
//! # Configuration
//!
//! Read from `modopt.yaml` in the working directory if present, then from
//! `MODOPT_*` environment variables.

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use modopt::config::DEFAULT_CONFIG_FILE;
use modopt::{
    APP_NAME, EditRequest, EditorChange, EditorConfig, EditorSession, MappingReloader, ModMeta,
    ModSettings, SelectType, VERSION, YamlModStore,
};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((mod_id, command)) = args.split_first() else {
        bail!("Usage: {} <mod-id> [command args...]", APP_NAME);
    };
    // Commands are parsed before the mod is opened
    let request = parse_command(command)?;

    let config = EditorConfig::load(DEFAULT_CONFIG_FILE)?;
    let _guard = modopt::logging::setup_from_config(&config)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    // The config is read before logging is set up
    if Utf8Path::new(DEFAULT_CONFIG_FILE).exists() {
        tracing::info!("Loaded config from {}", DEFAULT_CONFIG_FILE);
    } else {
        tracing::info!("No {} found, using defaults and environment", DEFAULT_CONFIG_FILE);
    }
    tracing::debug!("Mod root: {}", config.mod_root);

    let store = YamlModStore::new(&config.mod_root)
        .with_context(|| format!("Failed to open mod root {}", config.mod_root))?;
    let mut session = EditorSession::open(mod_id, store, MappingReloader::new(), config.event_capacity)
        .with_context(|| format!("Failed to open mod {}", mod_id))?;

    if let Some(request) = request {
        match session.try_apply(request) {
            Ok(changes) if changes.is_empty() => println!("Nothing changed."),
            Ok(changes) => report_changes(&changes),
            Err(rejection) => println!("Edit rejected: {}", rejection),
        }
    }

    print_summary(mod_id, session.meta(), session.settings());

    if let Some(resolved) = session.reloader().resolved(mod_id) {
        println!(
            "Active mappings: {} file(s), {} swap(s), {} conflict(s)",
            resolved.files.len(),
            resolved.swaps.len(),
            resolved.conflicts.len()
        );
    }

    session.close();
    tracing::info!("Application shutdown complete");
    Ok(())
}

fn parse_command(command: &[String]) -> Result<Option<EditRequest>> {
    let Some((name, args)) = command.split_first() else {
        return Ok(None);
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let request = match (name.as_str(), args.as_slice()) {
        ("add-group", [group, kind]) => EditRequest::AddGroup {
            name: group.to_string(),
            selection_type: parse_select_type(kind)?,
        },
        ("rename-group", [old_name, new_name]) => EditRequest::RenameGroup {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        },
        ("add-option", [group, option]) => EditRequest::AddOption {
            group: group.to_string(),
            name: option.to_string(),
        },
        ("rename-option", [group, index, option]) => EditRequest::RenameOption {
            group: group.to_string(),
            index: parse_index(index)?,
            name: option.to_string(),
        },
        ("select", [group, index]) => EditRequest::SelectSingle {
            group: group.to_string(),
            index: parse_index(index)?,
        },
        ("toggle", [group, index]) => EditRequest::ToggleMulti {
            group: group.to_string(),
            index: parse_index(index)?,
        },
        ("swap-source", [row, path]) => EditRequest::EditSwapSource {
            row: parse_index(row)?,
            input: path.to_string(),
        },
        ("swap-target", [row, path]) => EditRequest::EditSwapTarget {
            row: parse_index(row)?,
            input: path.to_string(),
        },
        ("enable", []) => EditRequest::SetEnabled(true),
        ("disable", []) => EditRequest::SetEnabled(false),
        (other, _) => bail!("Unknown command or wrong arguments: {}", other),
    };
    Ok(Some(request))
}

fn parse_select_type(value: &str) -> Result<SelectType> {
    match value.to_ascii_lowercase().as_str() {
        "single" => Ok(SelectType::Single),
        "multi" => Ok(SelectType::Multi),
        _ => bail!("Selection type must be 'single' or 'multi', got '{}'", value),
    }
}

fn parse_index(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("'{}' is not a valid index", value))
}

fn report_changes(changes: &[EditorChange]) {
    for change in changes {
        match change {
            EditorChange::SaveFailed { message } => println!("Save failed: {}", message),
            EditorChange::ReloadFailed { message } => println!("Reload failed: {}", message),
            other => println!("- {:?}", other),
        }
    }
}

fn print_summary(mod_id: &str, meta: &ModMeta, settings: &ModSettings) {
    let title = if meta.name.is_empty() { mod_id } else { meta.name.as_str() };
    println!();
    println!("{} ({})", title, if settings.enabled { "enabled" } else { "disabled" });
    println!("Priority: {}", settings.priority);

    for (name, group) in &meta.groups {
        let active = group.active_indices(settings.get(name));
        println!("[{}] {}", group.selection_type, name);
        for (index, option) in group.options.iter().enumerate() {
            let marker = match (group.selection_type, active.contains(&index)) {
                (SelectType::Single, true) => "(*)",
                (SelectType::Single, false) => "( )",
                (SelectType::Multi, true) => "[x]",
                (SelectType::Multi, false) => "[ ]",
            };
            println!("  {} {}: {}", marker, index, option.name);
        }
    }

    if !meta.file_swaps.is_empty() {
        println!("File swaps:");
        for (row, (from, to)) in meta.file_swaps.iter().enumerate() {
            println!("  {}: {} -> {}", row, from, to);
        }
    }
}
