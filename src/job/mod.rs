pub mod job_model;
pub mod runner;
