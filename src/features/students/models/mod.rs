mod student_profile;

pub use student_profile::{Gender, StudentProfile, PROFILE_COLUMNS};
