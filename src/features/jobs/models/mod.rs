mod job_posting;

pub use job_posting::{JobListing, JobType, LISTING_SELECT};
