use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::tree_model::ObjectTree;
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;

/// Request sent to the scripting bridge over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BridgeRequest<'a> {
    StartTransaction { code: &'a str },
    EndTransaction,
    ObjectTree { window: usize, properties: &'a [&'a str] },
    GetText { id: &'a str },
    SetText { id: &'a str, value: &'a str },
    GetSelected { id: &'a str },
    SetSelected { id: &'a str, selected: bool },
    Press { id: &'a str },
    Select { id: &'a str },
    LeftLabel { id: &'a str },
    ParentText { id: &'a str },
    SendVkey { window: usize, code: u32 },
    PressToolbarContextButton { id: &'a str, token: &'a str },
    SelectContextMenuItem { id: &'a str, token: &'a str },
    Quit,
}

impl BridgeRequest<'_> {
    fn command(&self) -> &'static str {
        match self {
            BridgeRequest::StartTransaction { .. } => "start_transaction",
            BridgeRequest::EndTransaction => "end_transaction",
            BridgeRequest::ObjectTree { .. } => "object_tree",
            BridgeRequest::GetText { .. } => "get_text",
            BridgeRequest::SetText { .. } => "set_text",
            BridgeRequest::GetSelected { .. } => "get_selected",
            BridgeRequest::SetSelected { .. } => "set_selected",
            BridgeRequest::Press { .. } => "press",
            BridgeRequest::Select { .. } => "select",
            BridgeRequest::LeftLabel { .. } => "left_label",
            BridgeRequest::ParentText { .. } => "parent_text",
            BridgeRequest::SendVkey { .. } => "send_vkey",
            BridgeRequest::PressToolbarContextButton { .. } => "press_toolbar_context_button",
            BridgeRequest::SelectContextMenuItem { .. } => "select_context_menu_item",
            BridgeRequest::Quit => "quit",
        }
    }
}

/// Response read from the bridge's stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BridgeResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub selected: Option<bool>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A live host session reached through a long-running bridge process.
///
/// The bridge owns the connection to the host's scripting engine; this side
/// only speaks NDJSON over the child's stdin/stdout.
pub struct BridgeSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl BridgeSession {
    /// Spawn `program` and wait for its ready signal.
    pub fn launch(program: &str, args: &[String]) -> Result<Self, ScreenError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScreenError::SubprocessSpawn {
                program: program.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ScreenError::SessionIO(format!("Failed to capture stdin of {}", program))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ScreenError::SessionIO(format!("Failed to capture stdout of {}", program))
        })?;

        let mut session = BridgeSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
        };

        let response = session.read_response("ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(ScreenError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", program),
            });
        }

        debug!(program = %program, "Bridge ready");
        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<BridgeResponse, ScreenError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| ScreenError::SessionIO(format!("Failed to read {}: {}", context, e)))?;

        if line.trim().is_empty() {
            return Err(ScreenError::SessionIO(
                "Empty response from bridge (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| ScreenError::JsonParse {
            context: format!("bridge {}", context),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BridgeRequest<'_>) -> Result<BridgeResponse, ScreenError> {
        let json = serde_json::to_string(request).map_err(|e| ScreenError::JsonSerialize {
            context: "BridgeRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| ScreenError::SessionIO(format!("Failed to write to bridge stdin: {}", e)))?;

        self.read_response(request.command())
    }

    /// Send a request; a host rejection becomes the error built by `rejected`.
    fn send_ok(
        &mut self,
        request: &BridgeRequest<'_>,
        rejected: impl FnOnce(String) -> ScreenError,
    ) -> Result<BridgeResponse, ScreenError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(rejected(
                response.error.unwrap_or_else(|| "Unknown error".into()),
            ));
        }
        Ok(response)
    }

    fn call(&mut self, request: &BridgeRequest<'_>) -> Result<BridgeResponse, ScreenError> {
        let command = request.command();
        self.send_ok(request, |message| ScreenError::remote(command, message))
    }

    /// Stop the bridge. Best-effort: the process may already be gone.
    pub fn quit(&mut self) -> Result<(), ScreenError> {
        let _ = self.send(&BridgeRequest::Quit);
        let _ = self.child.wait();
        Ok(())
    }
}

impl GuiSession for BridgeSession {
    fn start_transaction(&mut self, code: &str) -> Result<(), ScreenError> {
        self.send_ok(&BridgeRequest::StartTransaction { code }, |_| {
            ScreenError::InvalidTransactionCode(code.to_string())
        })?;
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::EndTransaction)?;
        Ok(())
    }

    fn discover_tree(&mut self, window: usize, properties: &[&str]) -> Result<ObjectTree, ScreenError> {
        let response = self.send_ok(&BridgeRequest::ObjectTree { window, properties }, |message| {
            ScreenError::SchemaAccessDenied { window, message }
        })?;

        // Some bridges forward the host's tree as a JSON string.
        let data = match response.data {
            Some(Value::String(raw)) => {
                serde_json::from_str(&raw).map_err(|e| ScreenError::JsonParse {
                    context: "object tree".into(),
                    source: e,
                })?
            }
            Some(value) => value,
            None => {
                return Err(ScreenError::SessionProtocol {
                    command: "object_tree".into(),
                    error: "No data in object_tree response".into(),
                });
            }
        };

        serde_json::from_value(data).map_err(|e| ScreenError::JsonParse {
            context: "object tree".into(),
            source: e,
        })
    }

    fn get_text(&mut self, id: &str) -> Result<String, ScreenError> {
        let response = self.call(&BridgeRequest::GetText { id })?;
        Ok(response.text.unwrap_or_default())
    }

    fn set_text(&mut self, id: &str, value: &str) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::SetText { id, value })?;
        Ok(())
    }

    fn get_selected(&mut self, id: &str) -> Result<bool, ScreenError> {
        let response = self.call(&BridgeRequest::GetSelected { id })?;
        Ok(response.selected.unwrap_or(false))
    }

    fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::SetSelected { id, selected })?;
        Ok(())
    }

    fn press(&mut self, id: &str) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::Press { id })?;
        Ok(())
    }

    fn select(&mut self, id: &str) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::Select { id })?;
        Ok(())
    }

    fn left_label(&mut self, id: &str) -> Result<Option<String>, ScreenError> {
        let response = self.call(&BridgeRequest::LeftLabel { id })?;
        Ok(response.label)
    }

    fn parent_text(&mut self, id: &str) -> Result<String, ScreenError> {
        let response = self.call(&BridgeRequest::ParentText { id })?;
        Ok(response.text.unwrap_or_default())
    }

    fn send_virtual_key(&mut self, window: usize, code: u32) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::SendVkey { window, code })?;
        Ok(())
    }

    fn press_toolbar_context_button(&mut self, id: &str, token: &str) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::PressToolbarContextButton { id, token })?;
        Ok(())
    }

    fn select_context_menu_item(&mut self, id: &str, token: &str) -> Result<(), ScreenError> {
        self.call(&BridgeRequest::SelectContextMenuItem { id, token })?;
        Ok(())
    }

    /// The host reads the local clipboard, so the copy happens on this side.
    fn copy_to_clipboard(&mut self, values: &[String]) -> Result<(), ScreenError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ScreenError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(clipboard_text(values))
            .map_err(|e| ScreenError::Clipboard(e.to_string()))
    }
}

impl Drop for BridgeSession {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!("Bridge shutdown failed: {}", e);
        }
    }
}

/// One value per row, as a spreadsheet column.
pub fn clipboard_text(values: &[String]) -> String {
    let mut text = values.join("\r\n");
    text.push_str("\r\n");
    text
}
