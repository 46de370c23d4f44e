use std::collections::{HashMap, HashSet, VecDeque};

use screen_schema::schema::tree_model::ObjectTree;
use screen_schema::{GuiSession, ScreenError};

/// Facade calls that change host state, in the order they were made.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    StartTransaction(String),
    EndTransaction,
    DiscoverTree(usize),
    SetText(String, String),
    SetSelected(String, bool),
    Press(String),
    Select(String),
    VirtualKey(usize, u32),
    ToolbarButton(String, String),
    ContextMenuItem(String, String),
    Clipboard(Vec<String>),
}

/// In-memory host. Each window serves a queue of trees; the last tree of a
/// queue keeps being served once the others are used up.
#[derive(Default)]
pub struct MockSession {
    pub trees: HashMap<usize, VecDeque<ObjectTree>>,
    pub texts: HashMap<String, String>,
    pub selected: HashMap<String, bool>,
    pub left_labels: HashMap<String, String>,
    pub parents: HashMap<String, String>,
    pub calls: Vec<Call>,
    pub rejected_codes: HashSet<String>,
    pub deny_tree: bool,
    pub failing_tokens: HashSet<String>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(mut self, window: usize, tree: ObjectTree) -> Self {
        self.push_tree(window, tree);
        self
    }

    pub fn push_tree(&mut self, window: usize, tree: ObjectTree) {
        self.trees.entry(window).or_default().push_back(tree);
    }

    pub fn with_text(mut self, id: &str, text: &str) -> Self {
        self.texts.insert(id.to_string(), text.to_string());
        self
    }

    pub fn with_left_label(mut self, id: &str, label: &str) -> Self {
        self.left_labels.insert(id.to_string(), label.to_string());
        self
    }

    pub fn with_parent(mut self, id: &str, parent: &str) -> Self {
        self.parents.insert(id.to_string(), parent.to_string());
        self
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    /// Calls that wrote into a control or sent a key.
    pub fn writes(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::DiscoverTree(_)))
            .collect()
    }

    pub fn discoveries(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::DiscoverTree(w) => Some(*w),
                _ => None,
            })
            .collect()
    }

    pub fn virtual_keys(&self) -> Vec<(usize, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::VirtualKey(w, k) => Some((*w, *k)),
                _ => None,
            })
            .collect()
    }

    pub fn set_text_calls(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetText(id, v) => Some((id.clone(), v.clone())),
                _ => None,
            })
            .collect()
    }
}

impl GuiSession for MockSession {
    fn start_transaction(&mut self, code: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::StartTransaction(code.to_string()));
        if self.rejected_codes.contains(code) {
            return Err(ScreenError::InvalidTransactionCode(code.to_string()));
        }
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), ScreenError> {
        self.calls.push(Call::EndTransaction);
        Ok(())
    }

    fn discover_tree(&mut self, window: usize, _properties: &[&str]) -> Result<ObjectTree, ScreenError> {
        self.calls.push(Call::DiscoverTree(window));
        if self.deny_tree {
            return Err(ScreenError::SchemaAccessDenied {
                window,
                message: "scripting not permitted".into(),
            });
        }

        let queue = self.trees.get_mut(&window).ok_or_else(|| ScreenError::SchemaAccessDenied {
            window,
            message: "no such window".into(),
        })?;
        match queue.len() {
            0 => Err(ScreenError::SchemaAccessDenied {
                window,
                message: "no such window".into(),
            }),
            1 => Ok(queue[0].clone()),
            _ => Ok(queue.pop_front().unwrap()),
        }
    }

    fn get_text(&mut self, id: &str) -> Result<String, ScreenError> {
        Ok(self.texts.get(id).cloned().unwrap_or_default())
    }

    fn set_text(&mut self, id: &str, value: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::SetText(id.to_string(), value.to_string()));
        self.texts.insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn get_selected(&mut self, id: &str) -> Result<bool, ScreenError> {
        Ok(self.selected.get(id).copied().unwrap_or(false))
    }

    fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), ScreenError> {
        self.calls.push(Call::SetSelected(id.to_string(), selected));
        self.selected.insert(id.to_string(), selected);
        Ok(())
    }

    fn press(&mut self, id: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::Press(id.to_string()));
        Ok(())
    }

    fn select(&mut self, id: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::Select(id.to_string()));
        self.selected.insert(id.to_string(), true);
        Ok(())
    }

    fn left_label(&mut self, id: &str) -> Result<Option<String>, ScreenError> {
        Ok(self.left_labels.get(id).cloned())
    }

    fn parent_text(&mut self, id: &str) -> Result<String, ScreenError> {
        Ok(self.parents.get(id).cloned().unwrap_or_default())
    }

    fn send_virtual_key(&mut self, window: usize, code: u32) -> Result<(), ScreenError> {
        self.calls.push(Call::VirtualKey(window, code));
        Ok(())
    }

    fn press_toolbar_context_button(&mut self, id: &str, token: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::ToolbarButton(id.to_string(), token.to_string()));
        if self.failing_tokens.contains(token) {
            return Err(ScreenError::remote("pressToolbarContextButton", token));
        }
        Ok(())
    }

    fn select_context_menu_item(&mut self, id: &str, token: &str) -> Result<(), ScreenError> {
        self.calls.push(Call::ContextMenuItem(id.to_string(), token.to_string()));
        if self.failing_tokens.contains(token) {
            return Err(ScreenError::remote("selectContextMenuItem", token));
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, values: &[String]) -> Result<(), ScreenError> {
        self.calls.push(Call::Clipboard(values.to_vec()));
        Ok(())
    }
}
