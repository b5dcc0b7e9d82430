//! Role-based authorization guards.
//!
//! Each guard extracts the authenticated user placed in the request
//! extensions by `auth_middleware` and checks the account role.
//!
//! Roles do not nest: a student cannot act as a recruiter and a recruiter
//! cannot use the admin back office. The only shared gate is
//! [`RequireStaff`], which admits both recruiters and administrators for
//! read access to student records such as resumes.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Please login to access this page.".to_string()))
}

/// Guard for student-only endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStudent(user): RequireStudent) { ... }
/// ```
pub struct RequireStudent(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStudent
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_student() {
            return Err(AppError::Forbidden(
                "Access denied. Students only.".to_string(),
            ));
        }

        Ok(RequireStudent(user))
    }
}

/// Guard for recruiter-only endpoints.
pub struct RequireRecruiter(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireRecruiter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_recruiter() {
            return Err(AppError::Forbidden(
                "Access denied. Recruiters only.".to_string(),
            ));
        }

        Ok(RequireRecruiter(user))
    }
}

/// Guard for the placement office (admin) back office.
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Access denied. Admins only.".to_string()));
        }

        Ok(RequireAdmin(user))
    }
}

/// Guard admitting recruiters and administrators.
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;

        if !user.is_staff() {
            return Err(AppError::Forbidden("Access denied.".to_string()));
        }

        Ok(RequireStaff(user))
    }
}
