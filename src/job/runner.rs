use tracing::{info, warn};

use crate::job::job_model::{JobResult, JobSpec};
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;
use crate::session::screen::ScreenSession;

/// Steps of a job, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStep {
    StartTransaction,
    Discover,
    ApplyParameters,
    Execute,
    Export,
}

impl JobStep {
    fn describe(self) -> &'static str {
        match self {
            JobStep::StartTransaction => "start transaction",
            JobStep::Discover => "discover schema",
            JobStep::ApplyParameters => "apply parameters",
            JobStep::Execute => "execute",
            JobStep::Export => "export",
        }
    }
}

/// Runs a `JobSpec` step by step against a screen session.
pub struct JobRunner;

impl JobRunner {
    /// Steps the job will take, given its settings.
    pub fn plan(job: &JobSpec) -> Vec<JobStep> {
        let mut steps = vec![
            JobStep::StartTransaction,
            JobStep::Discover,
            JobStep::ApplyParameters,
        ];
        if job.execute {
            steps.push(JobStep::Execute);
        }
        if job.export.is_some() {
            steps.push(JobStep::Export);
        }
        steps
    }

    /// Run a complete job. The first failing step stops the job; the
    /// transaction is still ended when the job asks for it.
    pub fn run<S: GuiSession>(job: &JobSpec, screen: &mut ScreenSession<S>) -> JobResult {
        info!(job = %job.name, transaction = %job.transaction, "Running job");

        let mut result = JobResult {
            job_name: job.name.clone(),
            passed: false,
            steps_run: 0,
            export_path: None,
            error: None,
        };

        for step in Self::plan(job) {
            match Self::execute_step(step, job, screen, &mut result) {
                Ok(()) => result.steps_run += 1,
                Err(e) => {
                    result.error = Some(format!("Step '{}' failed: {}", step.describe(), e));
                    break;
                }
            }
        }

        if job.end_transaction {
            if let Err(e) = screen.end_transaction() {
                warn!(job = %job.name, "Failed to end transaction: {}", e);
                if result.error.is_none() {
                    result.error = Some(format!("Failed to end transaction: {}", e));
                }
            }
        }

        result.passed = result.error.is_none();
        result
    }

    fn execute_step<S: GuiSession>(
        step: JobStep,
        job: &JobSpec,
        screen: &mut ScreenSession<S>,
        result: &mut JobResult,
    ) -> Result<(), ScreenError> {
        match step {
            JobStep::StartTransaction => screen.start_transaction(&job.transaction),
            JobStep::Discover => screen.discover(job.window).map(|_| ()),
            JobStep::ApplyParameters => screen.apply_parameters(&job.variant, &job.parameters),
            JobStep::Execute => screen.execute(job.vkey),
            JobStep::Export => {
                let Some(export) = &job.export else {
                    return Ok(());
                };
                // Execution replaced the screen; read the result screen first.
                if screen.schema().is_none() {
                    screen.discover(job.window)?;
                }
                let path = screen.export(&export.method, &export.directory, &export.file_name)?;
                result.export_path = Some(path.display().to_string());
                Ok(())
            }
        }
    }
}
