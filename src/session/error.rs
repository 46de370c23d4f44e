use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    /// Host refused to open the transaction (or the code was empty)
    #[error("Invalid transaction code '{0}'")]
    InvalidTransactionCode(String),

    /// Host refused to hand out its object tree
    #[error("Object tree access denied for window {window}: {message}")]
    SchemaAccessDenied { window: usize, message: String },

    /// Field key carries a suffix the dispatcher does not know
    #[error("Unknown field type in key '{0}'")]
    UnknownFieldType(String),

    #[error("Too many values for '{field}': expected at most {expected}, got {got}")]
    TooManyValues {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid value for '{0}': text fields take a string or a list of strings")]
    InvalidTextValue(String),

    #[error("Invalid value for '{0}': button fields take a list of values")]
    InvalidButtonValue(String),

    #[error("Invalid value for '{0}': flag and selection fields take a boolean")]
    InvalidFlagValue(String),

    #[error("Invalid value for '{0}': more fields take a mapping of nested fields")]
    InvalidMoreValue(String),

    #[error("Invalid date '{value}'. Please use {format}")]
    InvalidDateFormat { value: String, format: String },

    #[error("Invalid month {0}. Must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}. Must be between 1900 and the current year")]
    InvalidYear(i32),

    #[error("Export option '{0}' not found")]
    ExportOptionNotFound(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    #[error("Directory '{0}' does not exist")]
    DirectoryNotFound(String),

    /// Dispatch or export requested without a current field catalog
    #[error("No field catalog for the current screen; discover the schema first")]
    NoCatalog,

    #[error("Virtual key for '{0}' was not discovered on this screen")]
    VirtualKeyNotFound(String),

    /// A facade call was rejected by the host
    #[error("{operation} failed: {message}")]
    Remote { operation: String, message: String },

    #[error("Failed to spawn {program}: {source}")]
    SubprocessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Session I/O error: {0}")]
    SessionIO(String),

    #[error("Protocol error on '{command}': {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Clipboard access failed: {0}")]
    Clipboard(String),
}

impl ScreenError {
    pub fn remote(operation: &str, message: impl ToString) -> Self {
        ScreenError::Remote {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}
