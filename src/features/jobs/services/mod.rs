mod job_service;

pub use job_service::{rank_for_student, JobService};
