//! Integration tests for EditorSession with real and instrumented collaborators
//!
//! These tests verify that the EditorSession correctly:
//! - Persists accepted edits and skips no-ops
//! - Reloads only enabled mods
//! - Keeps the in-memory edit when saving fails
//! - Emits change events to subscribers

use camino::Utf8PathBuf;
use modopt::{
    EditRequest, EditorChange, EditorSession, GamePath, MappingReloader, ModMeta, ModReloader,
    ModSettings, ModStore, OptionGroup, SelectType, StoreError, YamlModStore,
};
use tempfile::TempDir;
use tokio::time::{Duration, timeout};

/// In-memory store that counts saves and can be told to fail
#[derive(Default)]
struct CountingStore {
    meta: ModMeta,
    settings: ModSettings,
    saves: usize,
    fail: bool,
}

impl ModStore for CountingStore {
    fn load_mod(&self, _mod_id: &str) -> Result<(ModMeta, ModSettings), StoreError> {
        Ok((self.meta.clone(), self.settings.clone()))
    }

    fn save_mod(
        &mut self,
        mod_id: &str,
        meta: &ModMeta,
        settings: &ModSettings,
    ) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Io {
                action: "write",
                path: Utf8PathBuf::from(mod_id).join("meta.yaml"),
                source: std::io::Error::other("disk full"),
            });
        }
        self.meta = meta.clone();
        self.settings = settings.clone();
        self.saves += 1;
        Ok(())
    }
}

fn swap_store(enabled: bool) -> CountingStore {
    let mut store = CountingStore::default();
    store.meta.file_swaps.insert(
        GamePath::new("a/b.png").unwrap(),
        GamePath::new("c/d.png").unwrap(),
    );
    store.settings.enabled = enabled;
    store
}

fn temp_store() -> (YamlModStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().join("mods")).unwrap();
    (YamlModStore::new(&root).unwrap(), temp_dir)
}

#[test]
fn test_swap_edit_on_enabled_mod_reloads_once() {
    let mut session =
        EditorSession::open("glow", swap_store(true), MappingReloader::new(), 16).unwrap();

    session.apply(EditRequest::EditSwapSource {
        row: 0,
        input: "a/e.png".to_string(),
    });

    let (store, reloader) = session.close();
    assert_eq!(store.saves, 1);
    assert_eq!(reloader.reload_count(), 1);

    let resolved = reloader.resolved("glow").unwrap();
    assert_eq!(
        resolved.swaps.get(&GamePath::new("a/e.png").unwrap()),
        Some(&GamePath::new("c/d.png").unwrap())
    );
    assert!(!resolved.swaps.contains_key(&GamePath::new("a/b.png").unwrap()));
}

#[test]
fn test_swap_edit_on_disabled_mod_does_not_reload() {
    let mut session =
        EditorSession::open("glow", swap_store(false), MappingReloader::new(), 16).unwrap();

    session.apply(EditRequest::EditSwapTarget {
        row: 0,
        input: "c/e.png".to_string(),
    });

    let (store, reloader) = session.close();
    assert_eq!(store.saves, 1);
    assert_eq!(reloader.reload_count(), 0);
}

#[test]
fn test_no_op_edits_do_not_save() {
    let mut store = swap_store(true);
    store
        .meta
        .groups
        .insert("Body".to_string(), OptionGroup::new("Body", SelectType::Single));
    store.settings.set("Body", 0);
    let mut session = EditorSession::open("glow", store, MappingReloader::new(), 16).unwrap();

    assert!(session.rename_group("Body", "Body").is_empty());
    assert!(
        session
            .apply(EditRequest::EditSwapSource {
                row: 0,
                input: "A\\B.png".to_string(),
            })
            .is_empty()
    );
    // Rejected: duplicate name
    assert!(session.add_group("Body", SelectType::Multi).is_empty());

    let (store, reloader) = session.close();
    assert_eq!(store.saves, 0);
    assert_eq!(reloader.reload_count(), 0);
}

#[test]
fn test_save_failure_is_reported_without_rollback() {
    let mut store = swap_store(true);
    store.fail = true;
    let mut session = EditorSession::open("glow", store, MappingReloader::new(), 16).unwrap();

    let changes = session.add_group("Body", SelectType::Single);

    assert!(
        changes
            .iter()
            .any(|c| matches!(c, EditorChange::SaveFailed { message } if message.contains("disk full")))
    );
    assert!(session.meta().has_group("Body"));
}

#[test]
fn test_reload_failure_is_reported() {
    struct BrokenReloader;

    impl ModReloader for BrokenReloader {
        fn reload_mod(
            &mut self,
            mod_id: &str,
            _meta: &ModMeta,
            _settings: &ModSettings,
        ) -> Result<(), StoreError> {
            Err(StoreError::Reload {
                mod_id: mod_id.to_string(),
                message: "host not running".to_string(),
            })
        }
    }

    let mut session = EditorSession::open("glow", swap_store(true), BrokenReloader, 16).unwrap();
    let changes = session.apply(EditRequest::EditSwapTarget {
        row: 0,
        input: "x/y.png".to_string(),
    });

    assert_eq!(changes[changes.len() - 2], EditorChange::Saved);
    assert!(matches!(
        changes.last(),
        Some(EditorChange::ReloadFailed { .. })
    ));
}

#[test]
fn test_edits_round_trip_through_yaml_store() {
    let (store, _temp_dir) = temp_store();
    let mut session = EditorSession::open("glow", store, MappingReloader::new(), 16).unwrap();

    session.add_group("Body", SelectType::Single);
    session.add_option("Body", "Slim");
    session.add_option("Body", "Curvy");
    session.add_group("Extras", SelectType::Multi);
    session.add_option("Extras", "Tattoo");
    session.add_option("Extras", "Scar");
    session.choose_option("Extras", 1);
    session.apply(EditRequest::SetEnabled(true));

    let (store, reloader) = session.close();
    assert_eq!(reloader.reload_count(), 1);

    let (meta, settings) = store.load_mod("glow").unwrap();
    assert_eq!(meta.group_names(), vec!["Body", "Extras"]);
    assert_eq!(settings.get("Body"), 1);
    assert_eq!(settings.get("Extras"), 0b10);
    assert!(settings.enabled);
}

#[tokio::test]
async fn test_change_events_emitted() {
    let mut session =
        EditorSession::open("glow", swap_store(true), MappingReloader::new(), 16).unwrap();
    let mut rx = session.subscribe();

    session.apply(EditRequest::EditSwapSource {
        row: 0,
        input: "a/e.png".to_string(),
    });

    let mut events = Vec::new();
    for _ in 0..3 {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            EditorChange::FileSwapsChanged,
            EditorChange::Saved,
            EditorChange::Reloaded
        ]
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let mut session =
        EditorSession::open("glow", CountingStore::default(), MappingReloader::new(), 16).unwrap();
    let mut rx1 = session.subscribe();
    let mut rx2 = session.subscribe();

    session.add_group("Body", SelectType::Single);

    for rx in [&mut rx1, &mut rx2] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout waiting for event")
            .expect("Channel closed");
        assert_eq!(event, EditorChange::GroupsChanged);
    }
}

#[tokio::test]
async fn test_rejected_edit_emits_nothing() {
    let mut session =
        EditorSession::open("glow", CountingStore::default(), MappingReloader::new(), 16).unwrap();
    let mut rx = session.subscribe();

    session.rename_group("Missing", "Other");

    let result = timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(result.is_err(), "No event expected, got {:?}", result);
}
