use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Properties requested from the host for every node of the object tree.
pub const TREE_PROPERTIES: [&str; 6] = ["Id", "Text", "Type", "Changeable", "Name", "IconName"];

/// Object tree as returned by the host for one window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectTree {
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeNode {
    pub properties: NodeProperties,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeProperties {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "Type")]
    pub type_code: String,
    #[serde(default, deserialize_with = "flag_or_string")]
    pub changeable: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon_name: Option<String>,
}

/// The host reports `Changeable` either as a JSON boolean or as "true"/"false".
fn flag_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(b)) => b,
        Some(Raw::Text(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// Classification of a raw control type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlKind {
    /// Text kinds are re-decided per node by its `Changeable` flag.
    TextEditable,
    TextStatic,
    Button,
    Radio,
    Checkbox,
    Menu,
    Shell,
    /// Decorative and structural nodes
    Ignored,
}

/// Raw type code to control kind. Unknown codes map to `Ignored`.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: HashMap<String, ControlKind>,
}

impl TypeMap {
    pub fn with_overrides(overrides: &HashMap<String, ControlKind>) -> Self {
        let mut map = Self::default();
        for (code, kind) in overrides {
            map.entries.insert(code.clone(), *kind);
        }
        map
    }

    pub fn kind_of(&self, type_code: &str) -> ControlKind {
        self.entries
            .get(type_code)
            .copied()
            .unwrap_or(ControlKind::Ignored)
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        let entries = [
            ("GuiTextField", ControlKind::TextEditable),
            ("GuiCTextField", ControlKind::TextEditable),
            ("GuiLabel", ControlKind::TextStatic),
            ("GuiButton", ControlKind::Button),
            ("GuiRadioButton", ControlKind::Radio),
            ("GuiCheckBox", ControlKind::Checkbox),
            ("GuiMenu", ControlKind::Menu),
            ("GuiShell", ControlKind::Shell),
        ]
        .into_iter()
        .map(|(code, kind)| (code.to_string(), kind))
        .collect();

        TypeMap { entries }
    }
}

/// Snapshot of one control taken during a discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDescriptor {
    pub id: String,
    pub label_text: String,
    pub kind: ControlKind,
    pub name: String,
    pub icon_name: Option<String>,
}

impl ControlDescriptor {
    pub fn from_node(props: &NodeProperties, types: &TypeMap) -> Self {
        let kind = match types.kind_of(&props.type_code) {
            ControlKind::TextEditable | ControlKind::TextStatic if props.changeable => {
                ControlKind::TextEditable
            }
            ControlKind::TextEditable | ControlKind::TextStatic => ControlKind::TextStatic,
            other => other,
        };

        ControlDescriptor {
            id: window_relative_id(&props.id),
            label_text: props.text.clone().unwrap_or_default(),
            kind,
            name: props.name.clone(),
            icon_name: props.icon_name.clone().filter(|i| !i.is_empty()),
        }
    }
}

/// `/app/con[0]/ses[0]/wnd[0]/usr/txtX` becomes `wnd[0]/usr/txtX`.
pub fn window_relative_id(raw: &str) -> String {
    match raw.find("wnd[") {
        Some(idx) => raw[idx..].to_string(),
        None => raw.to_string(),
    }
}
