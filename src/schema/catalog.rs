use std::collections::HashMap;

use serde::Serialize;
use sha1::{Digest, Sha1};

/// Field key to the ids of the controls bound under it, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldCatalog {
    fields: Vec<CatalogEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub key: String,
    pub control_ids: Vec<String>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `control_id` to the group under `key`, creating the group at
    /// the end of the catalog on first use.
    pub fn bind(&mut self, key: String, control_id: String) {
        match self.index.get(&key) {
            Some(&pos) => self.fields[pos].control_ids.push(control_id),
            None => {
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push(CatalogEntry {
                    key,
                    control_ids: vec![control_id],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&pos| self.fields[pos].control_ids.as_slice())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// SHA-1 over the ordered keys and control ids. Two discoveries of an
    /// unchanged screen produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha1::new();
        for entry in &self.fields {
            hasher.update(entry.key.as_bytes());
            hasher.update([0u8]);
            for id in &entry.control_ids {
                hasher.update(id.as_bytes());
                hasher.update([1u8]);
            }
            hasher.update([2u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Buttons whose action is reached through a virtual key instead of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WellKnownButton {
    Execute,
    Variant,
}

impl WellKnownButton {
    pub fn from_icon(icon: &str) -> Option<Self> {
        match icon {
            "B_EXEC" => Some(WellKnownButton::Execute),
            "B_VARI" => Some(WellKnownButton::Variant),
            _ => None,
        }
    }
}

pub type VirtualKeyMap = HashMap<WellKnownButton, u32>;

/// Everything one discovery pass learns about a window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScreenSchema {
    pub window: usize,
    pub catalog: FieldCatalog,
    pub virtual_keys: VirtualKeyMap,
    /// Cleaned export-menu label to menu item id
    pub export_options: Vec<(String, String)>,
    /// Result grid used for export when no export menu exists
    pub shell_id: Option<String>,
}

impl ScreenSchema {
    pub fn new(window: usize) -> Self {
        ScreenSchema {
            window,
            ..Default::default()
        }
    }

    pub fn virtual_key(&self, button: WellKnownButton) -> Option<u32> {
        self.virtual_keys.get(&button).copied()
    }

    pub fn export_option(&self, method: &str) -> Option<&str> {
        self.export_options
            .iter()
            .find(|(label, _)| label == method)
            .map(|(_, id)| id.as_str())
    }

    /// First binding of a label wins.
    pub fn add_export_option(&mut self, label: String, id: String) {
        if self.export_option(&label).is_none() {
            self.export_options.push((label, id));
        }
    }
}
