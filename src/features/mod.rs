pub mod admin;
pub mod applications;
pub mod auth;
pub mod branches;
pub mod companies;
pub mod dashboard;
pub mod drives;
pub mod jobs;
pub mod students;
