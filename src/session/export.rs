use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::value::{ParamMap, ParamValue};
use crate::dispatch::vkey;
use crate::schema::builder::discover_schema;
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;
use crate::session::screen::ScreenSession;

const EXPAND_TOOLBAR: &str = "&NAVIGATION_PROFILE_TOOLBAR_EXPAND";
const EXPORT_BUTTON: &str = "&MB_EXPORT";
const SPREADSHEET_ITEM: &str = "&XXL";

const SPREADSHEET_METHOD: &str = "spreadsheet";
const EXCEL_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

impl<S: GuiSession> ScreenSession<S> {
    /// Export the result screen through `method` (a cleaned export menu
    /// label such as `spreadsheet`) into `directory/file_name`.
    ///
    /// Uses the export menu discovered on the current screen, falling back
    /// to the result grid's toolbar. An existing file is replaced.
    pub fn export(
        &mut self,
        method: &str,
        directory: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<PathBuf, ScreenError> {
        let (directory, file_exists) = check_export_target(method, directory.as_ref(), file_name)?;
        let schema = self.schema.as_ref().ok_or(ScreenError::NoCatalog)?;
        let dialog = schema.window + 1;

        if !schema.export_options.is_empty() {
            let option = schema
                .export_option(method)
                .ok_or_else(|| ScreenError::ExportOptionNotFound(method.to_string()))?;
            debug!(option = %option, "Selecting export option");
            self.session.select(option)?;
        } else if let Some(shell) = schema.shell_id.as_deref() {
            open_grid_export(&mut self.session, shell)?;
        } else {
            return Err(ScreenError::ExportOptionNotFound(method.to_string()));
        }

        self.session.send_virtual_key(dialog, vkey::CONFIRM)?;

        let mut values = ParamMap::new();
        values.insert(
            "directory_TEXT".to_string(),
            ParamValue::text(directory.display()),
        );
        values.insert("file_name_TEXT".to_string(), ParamValue::text(file_name));

        let save_dialog = discover_schema(&mut self.session, dialog, &self.types)?;
        Dispatcher::new(&mut self.session, &self.types, &self.date_format, &self.tracer)
            .apply(&save_dialog, "", &values)?;

        let finish = if file_exists { vkey::REPLACE } else { vkey::CONFIRM };
        self.session.send_virtual_key(dialog, finish)?;

        let path = directory.join(file_name);
        info!(path = %path.display(), replaced = file_exists, "Exported");
        Ok(path)
    }
}

/// Validate the destination and report whether the file already exists.
/// Returns the absolute directory.
pub fn check_export_target(
    method: &str,
    directory: &Path,
    file_name: &str,
) -> Result<(PathBuf, bool), ScreenError> {
    if !directory.is_dir() {
        return Err(ScreenError::DirectoryNotFound(directory.display().to_string()));
    }
    let directory = std::path::absolute(directory)
        .map_err(|_| ScreenError::DirectoryNotFound(directory.display().to_string()))?;

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !EXCEL_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ScreenError::UnsupportedExportFormat(format!(
            "{}: only .xlsx and .xls exports are supported",
            file_name
        )));
    }
    if method == SPREADSHEET_METHOD && extension != "xlsx" {
        return Err(ScreenError::UnsupportedExportFormat(format!(
            "{}: spreadsheet export writes .xlsx",
            file_name
        )));
    }

    let exists = directory.join(file_name).exists();
    Ok((directory, exists))
}

/// Open the spreadsheet export from a result grid's toolbar.
fn open_grid_export<S: GuiSession + ?Sized>(session: &mut S, shell: &str) -> Result<(), ScreenError> {
    // Toolbar may already be expanded or have no expander.
    if let Err(e) = session.press_toolbar_context_button(shell, EXPAND_TOOLBAR) {
        debug!(error = %e, "Toolbar expand skipped");
    }

    session
        .press_toolbar_context_button(shell, EXPORT_BUTTON)
        .and_then(|_| session.select_context_menu_item(shell, SPREADSHEET_ITEM))
        .map_err(|_| ScreenError::ExportOptionNotFound(SPREADSHEET_METHOD.to_string()))
}
