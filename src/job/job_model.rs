use serde::{Deserialize, Serialize};

use crate::dispatch::value::ParamMap;

/// One end-to-end run against a transaction, usually loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSpec {
    /// Human-readable name for this job
    pub name: String,

    /// Transaction code to start
    pub transaction: String,

    /// Variant to load before applying parameters (empty = none)
    #[serde(default)]
    pub variant: String,

    /// Window holding the parameter screen
    #[serde(default)]
    pub window: usize,

    /// Field key to value
    #[serde(default)]
    pub parameters: ParamMap,

    /// Run the report after filling in parameters
    #[serde(default = "default_true")]
    pub execute: bool,

    /// Virtual key to execute with instead of the discovered one
    #[serde(default)]
    pub vkey: Option<u32>,

    /// Export the result screen
    #[serde(default)]
    pub export: Option<ExportSpec>,

    /// Leave the transaction when done (also after a failure)
    #[serde(default = "default_true")]
    pub end_transaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpec {
    /// Cleaned export menu label, e.g. `spreadsheet`
    pub method: String,
    pub directory: String,
    pub file_name: String,
}

fn default_true() -> bool {
    true
}

/// Outcome of running a job.
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub job_name: String,

    pub passed: bool,

    /// Steps completed before the job stopped
    pub steps_run: usize,

    pub export_path: Option<String>,

    /// Error that stopped the job
    pub error: Option<String>,
}
