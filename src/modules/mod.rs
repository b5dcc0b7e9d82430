//! Adapters for services outside the database.
//!
//! Only object storage for resumes lives here for now.

pub mod storage;
