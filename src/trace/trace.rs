use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One control mutation, as written to the JSONL audit trail.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WriteEvent {
    pub timestamp_ms: u128,
    pub window: usize,

    /// Field key the write belongs to; `None` for navigation keys
    pub field: Option<String>,
    pub control: Option<String>,

    pub action: WriteAction,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    SetText,
    SetSelected,
    Select,
    Press,
    Paste,
    VirtualKey,
}

impl WriteEvent {
    pub fn now(window: usize, action: WriteAction) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            window,
            field: None,
            control: None,
            action,
            value: None,
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_control(mut self, control: &str) -> Self {
        self.control = Some(control.to_string());
        self
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }
}
