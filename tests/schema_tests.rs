mod common;

use std::collections::HashMap;

use screen_schema::ScreenError;
use screen_schema::schema::builder::discover_schema;
use screen_schema::schema::catalog::WellKnownButton;
use screen_schema::schema::tree_model::{ControlKind, ObjectTree, TypeMap};

use crate::common::fixtures::*;
use crate::common::mock_session::MockSession;

fn keys(tree: ObjectTree) -> Vec<String> {
    let mut session = MockSession::new().with_tree(0, tree);
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();
    schema.catalog.keys().map(str::to_string).collect()
}

// =========================================================================
// Catalog construction
// =========================================================================

#[test]
fn selection_screen_keys_follow_discovery_order() {
    assert_eq!(
        keys(selection_screen()),
        vec![
            "material_TEXT",
            "material_BUTTON",
            "plant_TEXT",
            "posting_date_TEXT",
            "layout_TEXT",
            "incl_all_items_FLAG",
            "database_SELECT",
            "archive_SELECT",
            "more_settings_MORE",
        ]
    );
}

#[test]
fn range_fields_group_under_one_key() {
    let mut session = MockSession::new().with_tree(0, selection_screen());
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(
        schema.catalog.get("material_TEXT").unwrap(),
        &[MATERIAL_LOW.to_string(), MATERIAL_HIGH.to_string()]
    );
    assert_eq!(
        schema.catalog.get("posting_date_TEXT").unwrap(),
        &[DATE_LOW.to_string(), DATE_HIGH.to_string()]
    );
    assert_eq!(schema.catalog.get("plant_TEXT").unwrap(), &[PLANT_LOW.to_string()]);
    assert_eq!(
        schema.catalog.get("material_BUTTON").unwrap(),
        &[MATERIAL_MORE.to_string()]
    );
    assert_eq!(
        schema.catalog.get("more_settings_MORE").unwrap(),
        &[MORE_SETTINGS.to_string()]
    );
}

#[test]
fn control_ids_are_window_relative() {
    let mut session = MockSession::new().with_tree(0, selection_screen());
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    for entry in schema.catalog.entries() {
        for id in &entry.control_ids {
            assert!(id.starts_with("wnd[0]/"), "{} is not window relative", id);
        }
    }
}

#[test]
fn toolbar_icons_become_virtual_keys() {
    let mut session = MockSession::new().with_tree(0, selection_screen());
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(schema.virtual_key(WellKnownButton::Execute), Some(8));
    assert_eq!(schema.virtual_key(WellKnownButton::Variant), Some(17));
    assert!(
        schema.catalog.keys().all(|k| !k.starts_with('_')),
        "well-known buttons are not catalog fields"
    );
}

#[test]
fn repeated_labels_are_numbered() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            label("wnd[0]/usr/lblA", "Amount"),
            field("wnd[0]/usr/txtA"),
            label("wnd[0]/usr/lblB", "Amount"),
            field("wnd[0]/usr/txtB"),
            checkbox("wnd[0]/usr/chkA", "Amount"),
        ],
    )]);

    assert_eq!(keys(screen), vec!["amount_TEXT", "amount_2_TEXT", "amount_3_FLAG"]);
}

#[test]
fn labelled_display_field_is_not_a_left_label() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            label("wnd[0]/usr/lblWERKS", "Plant"),
            field("wnd[0]/usr/ctxtWERKS-LOW"),
            display_field("wnd[0]/usr/txtWERKS_NAME", "Hamburg"),
            field("wnd[0]/usr/ctxtWERKS-HIGH"),
        ],
    )]);
    let mut session = MockSession::new()
        .with_tree(0, screen)
        .with_left_label("wnd[0]/usr/txtWERKS_NAME", "Plant");

    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(schema.catalog.keys().collect::<Vec<_>>(), vec!["plant_TEXT"]);
    assert_eq!(schema.catalog.get("plant_TEXT").unwrap().len(), 2);
}

#[test]
fn unlabelled_display_field_names_the_next_field() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            display_field("wnd[0]/usr/txtCAPTION", "Company Code"),
            field("wnd[0]/usr/ctxtBUKRS"),
        ],
    )]);

    assert_eq!(keys(screen), vec!["company_code_TEXT"]);
}

#[test]
fn editable_field_without_label_stays_unbound() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            field("wnd[0]/usr/ctxtORPHAN"),
            label("wnd[0]/usr/lblNAME", "Name"),
            field("wnd[0]/usr/ctxtNAME"),
        ],
    )]);

    assert_eq!(keys(screen), vec!["name_TEXT"]);
}

#[test]
fn text_buttons_without_label_text_are_skipped() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            button("wnd[0]/usr/btnEMPTY", "", None),
            button("wnd[0]/usr/btnOPT", "Options", None),
            button("wnd[0]/usr/btnOPT2", "Options", None),
        ],
    )]);
    let mut session = MockSession::new().with_tree(0, screen);
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(schema.catalog.keys().collect::<Vec<_>>(), vec!["options_MORE"]);
    assert_eq!(schema.catalog.get("options_MORE").unwrap().len(), 2);
}

// =========================================================================
// Export targets
// =========================================================================

#[test]
fn export_menu_items_are_collected() {
    let mut session = with_menu_parents(MockSession::new().with_tree(0, result_list_with_menu()));
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(schema.export_option("spreadsheet"), Some(EXPORT_SPREADSHEET));
    assert_eq!(schema.export_option("local_file"), Some(EXPORT_LOCAL_FILE));
    assert_eq!(schema.export_option("save"), None);
    assert_eq!(schema.export_options.len(), 2);
    assert!(schema.catalog.is_empty());
    assert_eq!(schema.shell_id, None);
}

#[test]
fn result_grid_shell_is_recorded() {
    let mut session = MockSession::new().with_tree(0, result_grid());
    let schema = discover_schema(&mut session, 0, &TypeMap::default()).unwrap();

    assert_eq!(schema.shell_id.as_deref(), Some(GRID_SHELL));
    assert!(schema.export_options.is_empty());
}

// =========================================================================
// Determinism and host errors
// =========================================================================

#[test]
fn rediscovery_of_unchanged_screen_is_identical() {
    let mut session = MockSession::new().with_tree(0, selection_screen());
    let types = TypeMap::default();

    let first = discover_schema(&mut session, 0, &types).unwrap();
    let second = discover_schema(&mut session, 0, &types).unwrap();

    assert_eq!(first.catalog, second.catalog);
    assert_eq!(first.catalog.fingerprint(), second.catalog.fingerprint());
    assert_eq!(first.catalog.fingerprint().len(), 40);
    assert_eq!(session.discoveries(), vec![0, 0]);
}

#[test]
fn different_screens_have_different_fingerprints() {
    let mut session = MockSession::new()
        .with_tree(0, selection_screen())
        .with_tree(1, variant_dialog());
    let types = TypeMap::default();

    let main = discover_schema(&mut session, 0, &types).unwrap();
    let dialog = discover_schema(&mut session, 1, &types).unwrap();

    assert_ne!(main.catalog.fingerprint(), dialog.catalog.fingerprint());
    assert_eq!(dialog.window, 1);
}

#[test]
fn denied_tree_access_is_reported() {
    let mut session = MockSession::new().with_tree(0, selection_screen());
    session.deny_tree = true;

    let err = discover_schema(&mut session, 0, &TypeMap::default()).unwrap_err();
    assert!(matches!(err, ScreenError::SchemaAccessDenied { window: 0, .. }));
}

#[test]
fn missing_window_is_reported() {
    let mut session = MockSession::new().with_tree(0, selection_screen());

    let err = discover_schema(&mut session, 3, &TypeMap::default()).unwrap_err();
    assert!(matches!(err, ScreenError::SchemaAccessDenied { window: 3, .. }));
}

// =========================================================================
// Type map
// =========================================================================

#[test]
fn unknown_type_codes_are_ignored() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            label("wnd[0]/usr/lblOK", "Command"),
            node("wnd[0]/tbar[0]/okcd", "GuiOkCodeField", "", true),
        ],
    )]);

    assert!(keys(screen).is_empty());
}

#[test]
fn type_map_overrides_add_control_kinds() {
    let screen = tree(vec![container(
        "wnd[0]/usr",
        vec![
            label("wnd[0]/usr/lblOK", "Command"),
            node("wnd[0]/tbar[0]/okcd", "GuiOkCodeField", "", true),
        ],
    )]);
    let mut overrides = HashMap::new();
    overrides.insert("GuiOkCodeField".to_string(), ControlKind::TextEditable);

    let mut session = MockSession::new().with_tree(0, screen);
    let schema = discover_schema(&mut session, 0, &TypeMap::with_overrides(&overrides)).unwrap();

    assert_eq!(
        schema.catalog.get("command_TEXT").unwrap(),
        &["wnd[0]/tbar[0]/okcd".to_string()]
    );
}
