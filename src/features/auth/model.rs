use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role, matching the `user_role` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Recruiter,
    /// Placement officer / administrator
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Recruiter => write!(f, "recruiter"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Identity attached to every request that passed `auth_middleware`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    pub fn is_student(&self) -> bool {
        self.has_role(UserRole::Student)
    }

    pub fn is_recruiter(&self) -> bool {
        self.has_role(UserRole::Recruiter)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    /// Recruiters and administrators may look at student records
    pub fn is_staff(&self) -> bool {
        self.is_recruiter() || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_role_checks() {
        assert!(user(UserRole::Student).is_student());
        assert!(!user(UserRole::Student).is_staff());
        assert!(user(UserRole::Recruiter).is_staff());
        assert!(user(UserRole::Admin).is_staff());
        assert!(!user(UserRole::Recruiter).is_admin());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::Recruiter).unwrap(),
            "\"recruiter\""
        );
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(UserRole::Student.to_string(), "student");
    }
}
