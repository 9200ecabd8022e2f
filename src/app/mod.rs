// Application layer: site extractors and the job wiring that runs them.

pub mod extractors;
pub mod jobs;

pub use jobs::{describe_plan, run_job, run_job_to, RunReport};
