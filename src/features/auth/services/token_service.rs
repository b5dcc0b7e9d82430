use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::models::User;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: UserRole,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Access token handed back to a client after register/login
#[derive(Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and validates HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: i64,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs() as i64,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign access token: {:?}", e);
                AppError::Internal("Failed to issue access token".to_string())
            })?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs,
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(secret: &str, ttl_secs: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "campus-placement".to_string(),
            token_ttl: Duration::from_secs(ttl_secs),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    fn recruiter() -> User {
        User {
            id: Uuid::new_v4(),
            username: "hr.acme".to_string(),
            email: "hr@acme.example".to_string(),
            password_hash: String::new(),
            first_name: "Hema".to_string(),
            last_name: "R".to_string(),
            phone: None,
            role: UserRole::Recruiter,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_token_validates_back_to_same_identity() {
        let service = TokenService::new(&config("a-very-long-secret-used-only-in-tests", 3600));
        let user = recruiter();

        let issued = service.issue_token(&user).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let authenticated = service.validate_token(&issued.access_token).unwrap();
        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.username, "hr.acme");
        assert_eq!(authenticated.role, UserRole::Recruiter);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(&config("first-secret-first-secret-first-secret", 3600));
        let verifier = TokenService::new(&config("second-secret-second-secret-second-sec", 3600));

        let issued = issuer.issue_token(&recruiter()).unwrap();
        assert!(matches!(
            verifier.validate_token(&issued.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&config("a-very-long-secret-used-only-in-tests", 3600));
        assert!(service.validate_token("not.a.jwt").is_err());
    }
}
