use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::branches::models::Branch;
use crate::shared::validation::BRANCH_CODE_REGEX;

/// Branch as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BranchDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<Branch> for BranchDto {
    fn from(branch: Branch) -> Self {
        Self {
            id: branch.id,
            code: branch.code,
            name: branch.name,
            description: branch.description,
        }
    }
}

/// Request DTO for adding a branch
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBranchDto {
    #[validate(
        length(min = 2, max = 10, message = "Code must be 2-10 characters"),
        regex(path = *BRANCH_CODE_REGEX, message = "Code must be uppercase letters and digits")
    )]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_code_is_rejected() {
        let dto = CreateBranchDto {
            code: "aiml".to_string(),
            name: "AI & ML".to_string(),
            description: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_valid_branch() {
        let dto = CreateBranchDto {
            code: "AIML".to_string(),
            name: "Artificial Intelligence and Machine Learning".to_string(),
            description: Some("Started 2023".to_string()),
        };
        assert!(dto.validate().is_ok());
    }
}
