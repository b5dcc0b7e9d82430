//! Application status rules.
//!
//! Recruiters move applications between pending, shortlisted, accepted and
//! rejected. Withdrawal belongs to the student, is only possible while the
//! application is pending and the deadline has not passed, and is final.

use crate::core::error::{AppError, Result};
use crate::features::applications::models::ApplicationStatus;
use crate::features::jobs::eligibility::Eligibility;

pub const ALREADY_APPLIED: &str = "You have already applied for this job.";

/// Check a new application: duplicate, then eligibility, then the open window
pub fn check_application(
    already_applied: bool,
    eligibility: &Eligibility,
    is_open: bool,
) -> Result<()> {
    if already_applied {
        return Err(AppError::Conflict(ALREADY_APPLIED.to_string()));
    }

    if !eligibility.is_eligible {
        return Err(AppError::BadRequest(format!(
            "You are not eligible: {}",
            eligibility.eligibility_message
        )));
    }

    if !is_open {
        return Err(AppError::BadRequest(
            "This job is no longer accepting applications.".to_string(),
        ));
    }

    Ok(())
}

/// Check a recruiter-driven status change
pub fn check_recruiter_update(current: ApplicationStatus, target: ApplicationStatus) -> Result<()> {
    if current == ApplicationStatus::Withdrawn {
        return Err(AppError::BadRequest(
            "This application was withdrawn by the student and cannot be changed.".to_string(),
        ));
    }

    if target == ApplicationStatus::Withdrawn {
        return Err(AppError::BadRequest("Invalid status.".to_string()));
    }

    Ok(())
}

/// Check a student's request to withdraw
pub fn check_withdrawal(current: ApplicationStatus, before_deadline: bool) -> Result<()> {
    if current != ApplicationStatus::Pending {
        return Err(AppError::BadRequest(format!(
            "Only pending applications can be withdrawn (current status: {}).",
            current
        )));
    }

    if !before_deadline {
        return Err(AppError::BadRequest(
            "The deadline for this job has passed.".to_string(),
        ));
    }

    Ok(())
}
