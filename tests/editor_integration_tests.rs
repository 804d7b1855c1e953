//! Integration tests for GroupEditor through the public API
//!
//! These tests verify that edits keep the meta and settings consistent:
//! - Rejected edits leave both stores untouched
//! - Selections and bitmasks follow option deletions
//! - Group renames carry their settings along
//! - File swap rows can be retargeted and re-keyed

use modopt::models::ModInfoField;
use modopt::{
    EditRejection, GamePath, GroupEditor, ModMeta, ModOption, ModSettings, OptionGroup, RelPath,
    SelectType,
};
use proptest::prelude::*;

fn group(name: &str, selection_type: SelectType, options: &[&str]) -> OptionGroup {
    let mut group = OptionGroup::new(name, selection_type);
    group.options = options.iter().map(|o| ModOption::new(*o)).collect();
    group
}

fn meta_with(groups: Vec<OptionGroup>) -> ModMeta {
    let mut meta = ModMeta::default();
    for group in groups {
        meta.groups.insert(group.name.clone(), group);
    }
    meta
}

fn option_names(meta: &ModMeta, group: &str) -> Vec<String> {
    meta.group(group)
        .unwrap()
        .options
        .iter()
        .map(|o| o.name.clone())
        .collect()
}

#[test]
fn test_second_add_group_is_rejected() {
    let mut meta = ModMeta::default();
    let mut settings = ModSettings::default();
    let mut editor = GroupEditor::new(&mut meta, &mut settings);
    editor.add_group("Body", SelectType::Single).unwrap();
    editor.add_option("Body", "Slim").unwrap();
    let (meta_before, settings_before) = (meta.clone(), settings.clone());

    let mut editor = GroupEditor::new(&mut meta, &mut settings);
    assert_eq!(
        editor.add_group("Body", SelectType::Multi),
        Err(EditRejection::DuplicateGroup("Body".to_string()))
    );

    assert!(meta.group("Body").unwrap().is_single());
    assert_eq!(meta, meta_before);
    assert_eq!(settings, settings_before);
}

#[test]
fn test_identity_rename_after_add_option() {
    let mut meta = meta_with(vec![group("Extras", SelectType::Multi, &[])]);
    let mut settings = ModSettings::default();
    let mut editor = GroupEditor::new(&mut meta, &mut settings);

    editor.add_option("Extras", "Foo").unwrap();
    let outcome = editor.rename_option("Extras", 0, "Foo").unwrap();

    assert!(outcome.is_unchanged());
    assert!(!outcome.needs_save());
}

#[test]
fn test_rename_group_to_empty_removes_group_and_setting() {
    let mut meta = meta_with(vec![
        group("Body", SelectType::Single, &["Slim", "Curvy"]),
        group("Hair", SelectType::Single, &["Long"]),
    ]);
    let mut settings = ModSettings::default();
    settings.set("Body", 1);
    settings.set("Hair", 0);

    GroupEditor::new(&mut meta, &mut settings)
        .rename_group("Body", "")
        .unwrap();

    assert_eq!(meta.group_names(), vec!["Hair"]);
    assert_eq!(settings.settings.keys().collect::<Vec<_>>(), vec!["Hair"]);
}

#[test]
fn test_pure_rename_keeps_selection() {
    let mut meta = meta_with(vec![
        group("Body", SelectType::Single, &["Slim", "Curvy", "Athletic"]),
        group("Extras", SelectType::Multi, &["Tattoo", "Scar", "Freckles"]),
    ]);
    let mut settings = ModSettings::default();
    settings.set("Body", 2);
    settings.set("Extras", 0b110);
    let mut editor = GroupEditor::new(&mut meta, &mut settings);

    editor.rename_group("Body", "Shape").unwrap();
    editor.rename_group("Extras", "Details").unwrap();

    assert_eq!(settings.get("Shape"), 2);
    assert_eq!(settings.get("Details"), 0b110);
}

#[test]
fn test_multi_delete_middle_option() {
    let mut meta = meta_with(vec![group("G", SelectType::Multi, &["A", "B", "C"])]);
    let mut settings = ModSettings::default();
    settings.set("G", 0b101);

    GroupEditor::new(&mut meta, &mut settings)
        .rename_option("G", 1, "")
        .unwrap();

    assert_eq!(option_names(&meta, "G"), vec!["A", "C"]);
    assert_eq!(settings.get("G"), 0b011);
}

#[test]
fn test_single_delete_below_selection() {
    let mut meta = meta_with(vec![group("G", SelectType::Single, &["X", "Y", "Z"])]);
    let mut settings = ModSettings::default();
    settings.set("G", 2);

    GroupEditor::new(&mut meta, &mut settings)
        .rename_option("G", 0, "")
        .unwrap();

    assert_eq!(option_names(&meta, "G"), vec!["Y", "Z"]);
    assert_eq!(settings.get("G"), 1);
}

#[test]
fn test_swap_source_edit() {
    let mut meta = ModMeta::default();
    meta.file_swaps.insert(
        GamePath::new("a/b.png").unwrap(),
        GamePath::new("c/d.png").unwrap(),
    );
    let mut settings = ModSettings::default();
    let mut editor = GroupEditor::new(&mut meta, &mut settings);

    // Case-insensitive match is a no-op
    assert!(editor.edit_swap_source(0, "A/B.PNG").unwrap().is_unchanged());

    let outcome = editor.edit_swap_source(0, "a/e.png").unwrap();
    assert!(outcome.needs_reload());

    assert_eq!(
        meta.swap_rows(),
        vec![(
            GamePath::new("a/e.png").unwrap(),
            GamePath::new("c/d.png").unwrap()
        )]
    );
}

#[test]
fn test_blank_swap_row_appends() {
    let mut meta = ModMeta::default();
    let mut settings = ModSettings::default();
    let mut editor = GroupEditor::new(&mut meta, &mut settings);

    editor.edit_swap_source(0, "ui/icon.tex").unwrap();
    editor.edit_swap_target(0, "ui/icon_alt.tex").unwrap();

    assert_eq!(
        meta.file_swaps.get(&GamePath::new("ui/icon.tex").unwrap()),
        Some(&GamePath::new("ui/icon_alt.tex").unwrap())
    );
}

#[test]
fn test_option_files_with_default_shorthand() {
    let mut meta = meta_with(vec![group("Body", SelectType::Single, &["Slim"])]);
    let mut settings = ModSettings::default();
    let files = vec![RelPath::new("Slim/chara/body.tex").unwrap()];

    GroupEditor::new(&mut meta, &mut settings)
        .add_option_files("Body", 0, &files, "default-1")
        .unwrap();

    let paths = &meta.group("Body").unwrap().options[0].files[&files[0]];
    assert!(paths.contains(&GamePath::new("chara/body.tex").unwrap()));
}

#[test]
fn test_mod_info_edit() {
    let mut meta = ModMeta::default();
    let mut settings = ModSettings::default();

    GroupEditor::new(&mut meta, &mut settings)
        .set_mod_info(ModInfoField::Website, "https://example.org")
        .unwrap();

    assert_eq!(meta.info(ModInfoField::Website), "https://example.org");
}

proptest! {
    #[test]
    fn prop_multi_delete_keeps_mask_in_range(
        count in 1usize..=32,
        raw_mask in any::<u32>(),
        index_seed in any::<usize>(),
    ) {
        let index = index_seed % count;
        let names: Vec<String> = (0..count).map(|i| format!("o{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut meta = meta_with(vec![group("G", SelectType::Multi, refs.as_slice())]);
        let mask = if count == 32 { raw_mask } else { raw_mask & ((1u32 << count) - 1) };
        let mut settings = ModSettings::default();
        settings.set("G", mask);

        GroupEditor::new(&mut meta, &mut settings).remove_option("G", index).unwrap();

        let low = (1u64 << index) - 1;
        let high = !((1u64 << (index + 1)) - 1);
        let expected = ((mask as u64 & low) | ((mask as u64 & high) >> 1)) as u32;
        prop_assert_eq!(settings.get("G"), expected);
        prop_assert!((settings.get("G") as u64) < (1u64 << (count - 1)));
    }

    #[test]
    fn prop_single_delete_keeps_index_valid(
        count in 1usize..8,
        selected_seed in any::<usize>(),
        removed_seed in any::<usize>(),
    ) {
        let selected = selected_seed % count;
        let removed = removed_seed % count;
        let names: Vec<String> = (0..count).map(|i| format!("o{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut meta = meta_with(vec![group("G", SelectType::Single, refs.as_slice())]);
        let mut settings = ModSettings::default();
        settings.set("G", selected as u32);

        GroupEditor::new(&mut meta, &mut settings).remove_option("G", removed).unwrap();

        let value = settings.get("G") as usize;
        let remaining = count - 1;
        if remaining == 0 {
            prop_assert_eq!(value, 0);
        } else {
            prop_assert!(value < remaining);
            if selected != removed {
                // The same option stays selected
                prop_assert_eq!(meta.group("G").unwrap().options[value].name.clone(), names[selected].clone());
            }
        }
    }
}
