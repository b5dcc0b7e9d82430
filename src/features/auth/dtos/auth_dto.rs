use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::UserRole;
use crate::features::auth::models::User;
use crate::shared::validation::{PHONE_REGEX, USERNAME_REGEX};

/// Roles that can be chosen at public registration.
///
/// Administrator accounts are provisioned by the placement office only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationRole {
    #[default]
    Student,
    Recruiter,
}

impl From<RegistrationRole> for UserRole {
    fn from(role: RegistrationRole) -> Self {
        match role {
            RegistrationRole::Student => UserRole::Student,
            RegistrationRole::Recruiter => UserRole::Recruiter,
        }
    }
}

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        length(min = 3, max = 150, message = "Username must be 3-150 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may contain letters, digits, '.', '_' and '-' and must start with a letter")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 30, message = "First name must be 1-30 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 30, message = "Last name must be 1-30 characters"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[serde(default)]
    pub role: RegistrationRole,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, max = 150, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    /// Authenticated user info
    pub user: AuthUserDto,
}

/// Account info returned by auth endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl From<User> for AuthUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterRequestDto {
        RegisterRequestDto {
            username: "asha.k".to_string(),
            email: "asha@college.edu".to_string(),
            first_name: "Asha".to_string(),
            last_name: "K".to_string(),
            phone: None,
            role: RegistrationRole::Student,
            password: "correct horse".to_string(),
            password_confirm: "correct horse".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn test_password_mismatch_is_rejected() {
        let mut dto = valid_registration();
        dto.password_confirm = "something else".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));
    }

    #[test]
    fn test_bad_username_and_email_are_rejected() {
        let mut dto = valid_registration();
        dto.username = "9lives".to_string();
        dto.email = "not-an-email".to_string();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_admin_role_cannot_be_requested() {
        let body = serde_json::json!({
            "username": "mallory",
            "email": "m@x.io",
            "first_name": "M",
            "last_name": "X",
            "role": "admin",
            "password": "password123",
            "password_confirm": "password123"
        });
        assert!(serde_json::from_value::<RegisterRequestDto>(body).is_err());
    }

    #[test]
    fn test_role_defaults_to_student() {
        let body = serde_json::json!({
            "username": "ravi",
            "email": "ravi@college.edu",
            "first_name": "Ravi",
            "last_name": "S",
            "password": "password123",
            "password_confirm": "password123"
        });
        let dto: RegisterRequestDto = serde_json::from_value(body).unwrap();
        assert_eq!(UserRole::from(dto.role), UserRole::Student);
    }
}
