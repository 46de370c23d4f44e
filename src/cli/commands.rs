use std::path::Path;

use tracing::{info, warn};

use crate::cli::config::Settings;
use crate::job::job_model::{JobResult, JobSpec};
use crate::job::runner::JobRunner;
use crate::schema::catalog::ScreenSchema;
use crate::session::bridge::BridgeSession;
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;
use crate::session::screen::ScreenSession;
use crate::trace::logger::TraceLogger;

// ============================================================================
// discover subcommand
// ============================================================================

pub fn cmd_discover(
    settings: &Settings,
    transaction: &str,
    window: usize,
    format: &str,
    keep_open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = open_session(settings)?;
    let output = discover_report(&mut screen, transaction, window, format, keep_open)?;
    print!("{}", output);
    Ok(())
}

/// Start `transaction` and render the schema of `window`. The transaction
/// is ended afterwards unless `keep_open`, and always after a failure.
pub fn discover_report<S: GuiSession>(
    screen: &mut ScreenSession<S>,
    transaction: &str,
    window: usize,
    format: &str,
    keep_open: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = render_discovery(screen, transaction, window, format);

    if !keep_open || output.is_err() {
        if let Err(e) = screen.end_transaction() {
            warn!(transaction = %transaction, "Failed to end transaction: {}", e);
            if output.is_ok() {
                return Err(e.into());
            }
        }
    }
    output
}

fn render_discovery<S: GuiSession>(
    screen: &mut ScreenSession<S>,
    transaction: &str,
    window: usize,
    format: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    screen.start_transaction(transaction)?;
    let schema = screen.discover(window)?;
    Ok(match format {
        "json" => serde_json::to_string_pretty(schema)?,
        _ => format_schema_table(schema),
    })
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run job files and return whether all passed.
pub fn cmd_run(
    settings: &Settings,
    job_path: &str,
    format: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let jobs = load_jobs(job_path)?;

    if jobs.is_empty() {
        eprintln!("No jobs found at: {}", job_path);
        return Ok(true);
    }

    info!(count = jobs.len(), "Running jobs");
    let mut screen = open_session(settings)?;

    let results: Vec<JobResult> = jobs
        .iter()
        .map(|job| JobRunner::run(job, &mut screen))
        .collect();
    let all_passed = results.iter().all(|r| r.passed);

    let output = match format {
        "json" => serde_json::to_string_pretty(&results)?,
        _ => format_job_report(&results),
    };
    println!("{}", output);

    Ok(all_passed)
}

/// Load jobs from a single YAML file or a directory of YAML files.
pub fn load_jobs(path: &str) -> Result<Vec<JobSpec>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut jobs = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let p = entry.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                jobs.push(load_job(&p)?);
            }
        }
        // Sort by name for deterministic order
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(jobs)
    } else {
        Ok(vec![load_job(Path::new(path))?])
    }
}

fn load_job(path: &Path) -> Result<JobSpec, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let job: JobSpec = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid job file {}: {}", path.display(), e))?;
    Ok(job)
}

// ============================================================================
// Output
// ============================================================================

/// Field keys with their control ids, then virtual keys and export options.
pub fn format_schema_table(schema: &ScreenSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Window {} ({} fields, {}) ===\n",
        schema.window,
        schema.catalog.len(),
        schema.catalog.fingerprint()
    ));

    let width = schema.catalog.keys().map(str::len).max().unwrap_or(0);
    for entry in schema.catalog.entries() {
        out.push_str(&format!(
            "{:width$}  {}\n",
            entry.key,
            entry.control_ids.join(", "),
            width = width
        ));
    }

    let mut vkeys: Vec<_> = schema.virtual_keys.iter().collect();
    vkeys.sort_by_key(|(_, code)| **code);
    for (button, code) in vkeys {
        out.push_str(&format!("[vkey] {:?} = {}\n", button, code));
    }

    for (label, id) in &schema.export_options {
        out.push_str(&format!("[export] {}  {}\n", label, id));
    }
    if let Some(shell) = &schema.shell_id {
        out.push_str(&format!("[grid] {}\n", shell));
    }

    out
}

/// One line per job plus a summary.
pub fn format_job_report(results: &[JobResult]) -> String {
    let mut out = String::new();

    for result in results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };
        out.push_str(&format!(
            "{}  {} ({} steps)\n",
            marker, result.job_name, result.steps_run
        ));
        if let Some(ref path) = result.export_path {
            out.push_str(&format!("    [EXPORT] {}\n", path));
        }
        if let Some(ref error) = result.error {
            out.push_str(&format!("    [ERROR] {}\n", error));
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total) ===",
        passed,
        results.len() - passed,
        results.len()
    ));
    out
}

fn open_session(settings: &Settings) -> Result<ScreenSession<BridgeSession>, ScreenError> {
    let bridge = BridgeSession::launch(&settings.bridge_program, &settings.bridge_args)?;
    let tracer = match &settings.trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    Ok(ScreenSession::new(bridge)
        .with_date_format(&settings.date_format)?
        .with_type_map(settings.type_map.clone())
        .with_tracer(tracer))
}
