use screen_schema::schema::tree_model::{NodeProperties, ObjectTree, TreeNode};

use super::mock_session::MockSession;

const SESSION_PREFIX: &str = "/app/con[0]/ses[0]/";

pub fn node(id: &str, type_code: &str, text: &str, changeable: bool) -> TreeNode {
    TreeNode {
        properties: NodeProperties {
            id: format!("{}{}", SESSION_PREFIX, id),
            text: Some(text.to_string()),
            type_code: type_code.to_string(),
            changeable,
            name: id.rsplit('/').next().unwrap_or_default().to_string(),
            icon_name: None,
        },
        children: vec![],
    }
}

pub fn container(id: &str, children: Vec<TreeNode>) -> TreeNode {
    let mut n = node(id, "GuiUserArea", "", false);
    n.children = children;
    n
}

pub fn label(id: &str, text: &str) -> TreeNode {
    node(id, "GuiLabel", text, false)
}

pub fn display_field(id: &str, text: &str) -> TreeNode {
    node(id, "GuiTextField", text, false)
}

pub fn field(id: &str) -> TreeNode {
    node(id, "GuiCTextField", "", true)
}

pub fn button(id: &str, text: &str, icon: Option<&str>) -> TreeNode {
    let mut n = node(id, "GuiButton", text, true);
    n.properties.icon_name = icon.map(str::to_string);
    n
}

pub fn toolbar_button(id: &str, icon: &str) -> TreeNode {
    button(id, "", Some(icon))
}

pub fn radio(id: &str, text: &str) -> TreeNode {
    node(id, "GuiRadioButton", text, true)
}

pub fn checkbox(id: &str, text: &str) -> TreeNode {
    node(id, "GuiCheckBox", text, true)
}

pub fn menu(id: &str, text: &str, children: Vec<TreeNode>) -> TreeNode {
    let mut n = node(id, "GuiMenu", text, true);
    n.children = children;
    n
}

pub fn shell(id: &str) -> TreeNode {
    node(id, "GuiShell", "", true)
}

pub fn tree(children: Vec<TreeNode>) -> ObjectTree {
    ObjectTree { children }
}

// ============================================================================
// Screens
// ============================================================================

pub const MATERIAL_LOW: &str = "wnd[0]/usr/ctxtMATNR-LOW";
pub const MATERIAL_HIGH: &str = "wnd[0]/usr/ctxtMATNR-HIGH";
pub const MATERIAL_MORE: &str = "wnd[0]/usr/btn%_MATNR_%_APP_%-VALU_PUSH";
pub const PLANT_LOW: &str = "wnd[0]/usr/ctxtWERKS-LOW";
pub const DATE_LOW: &str = "wnd[0]/usr/ctxtBUDAT-LOW";
pub const DATE_HIGH: &str = "wnd[0]/usr/ctxtBUDAT-HIGH";
pub const LAYOUT: &str = "wnd[0]/usr/ctxtALV_DEF";
pub const ALL_ITEMS: &str = "wnd[0]/usr/chkALL_ITEMS";
pub const DATABASE: &str = "wnd[0]/usr/radRFLAT_L";
pub const ARCHIVE: &str = "wnd[0]/usr/radARCHIVE";
pub const MORE_SETTINGS: &str = "wnd[0]/usr/btnMORE_SETTINGS";

/// Parameter screen of a material document report.
pub fn selection_screen() -> ObjectTree {
    tree(vec![
        container(
            "wnd[0]/tbar[1]",
            vec![
                toolbar_button("wnd[0]/tbar[1]/btn[8]", "B_EXEC"),
                toolbar_button("wnd[0]/tbar[1]/btn[17]", "B_VARI"),
            ],
        ),
        container(
            "wnd[0]/usr",
            vec![
                label("wnd[0]/usr/txt%_MATNR_%_APP_%-TEXT", "Máterial"),
                field(MATERIAL_LOW),
                field(MATERIAL_HIGH),
                button(MATERIAL_MORE, "", Some("B_MORE")),
                label("wnd[0]/usr/txt%_WERKS_%_APP_%-TEXT", "Plant"),
                field(PLANT_LOW),
                label("wnd[0]/usr/txt%_BUDAT_%_APP_%-TEXT", "Posting Date"),
                field(DATE_LOW),
                field(DATE_HIGH),
                label("wnd[0]/usr/txt%_ALV_DEF_%_APP_%-TEXT", "Layout"),
                field(LAYOUT),
                checkbox(ALL_ITEMS, "Incl. all items"),
                radio(DATABASE, "Database"),
                radio(ARCHIVE, "Archive"),
                button(MORE_SETTINGS, "Morè Settings", None),
                label("wnd[0]/usr/lblDECOR", ""),
                node("wnd[0]/usr/boxFRAME", "GuiBox", "Frame", false),
            ],
        ),
    ])
}

pub const MAX_HITS: &str = "wnd[1]/usr/txtMAX_HITS";
pub const ALV_GRID: &str = "wnd[1]/usr/chkALV_GRID";

/// Dialog opened by the "More Settings" button.
pub fn more_settings_dialog() -> ObjectTree {
    tree(vec![container(
        "wnd[1]/usr",
        vec![
            label("wnd[1]/usr/lblMAX_HITS", "Maximum No. of Hits"),
            field(MAX_HITS),
            checkbox(ALV_GRID, "Output in ALV grid"),
        ],
    )])
}

pub const VARIANT_NAME: &str = "wnd[1]/usr/ctxtV-LOW";
pub const VARIANT_CREATOR: &str = "wnd[1]/usr/ctxtENAME-LOW";

/// "Find Variant" dialog.
pub fn variant_dialog() -> ObjectTree {
    tree(vec![container(
        "wnd[1]/usr",
        vec![
            label("wnd[1]/usr/lblVARIANT", "Variant"),
            field(VARIANT_NAME),
            label("wnd[1]/usr/lblCREATED_BY", "Created by"),
            field(VARIANT_CREATOR),
        ],
    )])
}

pub const SAVE_DIRECTORY: &str = "wnd[1]/usr/ctxtDY_PATH";
pub const SAVE_FILE_NAME: &str = "wnd[1]/usr/ctxtDY_FILENAME";

/// Save-as dialog shown by an export.
pub fn save_dialog() -> ObjectTree {
    tree(vec![container(
        "wnd[1]/usr",
        vec![
            label("wnd[1]/usr/lblDY_PATH", "Directory"),
            field(SAVE_DIRECTORY),
            label("wnd[1]/usr/lblDY_FILENAME", "File Name"),
            field(SAVE_FILE_NAME),
        ],
    )])
}

pub const EXPORT_MENU: &str = "wnd[0]/mbar/menu[0]/menu[3]";
pub const EXPORT_SPREADSHEET: &str = "wnd[0]/mbar/menu[0]/menu[3]/menu[1]";
pub const EXPORT_LOCAL_FILE: &str = "wnd[0]/mbar/menu[0]/menu[3]/menu[2]";

/// Result list with a List > Export menu.
pub fn result_list_with_menu() -> ObjectTree {
    tree(vec![container(
        "wnd[0]/mbar",
        vec![menu(
            "wnd[0]/mbar/menu[0]",
            "List",
            vec![
                menu("wnd[0]/mbar/menu[0]/menu[0]", "Save", vec![]),
                menu(
                    EXPORT_MENU,
                    "Export",
                    vec![
                        menu(EXPORT_SPREADSHEET, "Spreadsheet...", vec![]),
                        menu(EXPORT_LOCAL_FILE, "Local File...", vec![]),
                    ],
                ),
            ],
        )],
    )])
}

/// Parent texts the host reports for the result list's menu items.
pub fn with_menu_parents(session: MockSession) -> MockSession {
    session
        .with_parent("wnd[0]/mbar/menu[0]", "")
        .with_parent("wnd[0]/mbar/menu[0]/menu[0]", "List")
        .with_parent(EXPORT_MENU, "List")
        .with_parent(EXPORT_SPREADSHEET, "Export")
        .with_parent(EXPORT_LOCAL_FILE, "Export")
}

pub const GRID_SHELL: &str = "wnd[0]/usr/cntlGRID1/shellcont/shell";

/// Result grid without a menu bar export.
pub fn result_grid() -> ObjectTree {
    tree(vec![container(
        "wnd[0]/usr",
        vec![container(
            "wnd[0]/usr/cntlGRID1",
            vec![container("wnd[0]/usr/cntlGRID1/shellcont", vec![shell(GRID_SHELL)])],
        )],
    )])
}
