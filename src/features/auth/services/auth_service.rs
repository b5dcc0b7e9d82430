use crate::core::config::AdminBootstrapConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::{AuthenticatedUser, UserRole};
use crate::features::auth::models::{CreateUser, User};
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::token_service::TokenService;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, phone, \
                            role, is_active, created_at, updated_at";

/// Service for account operations (register, login, bootstrap)
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Register a new student or recruiter account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let password_hash = hash_blocking(dto.password).await?;

        let user = self
            .insert_user(CreateUser {
                username: dto.username.trim().to_string(),
                email: dto.email.trim().to_lowercase(),
                password_hash,
                first_name: dto.first_name.trim().to_string(),
                last_name: dto.last_name.trim().to_string(),
                phone: dto.phone,
                role: dto.role.into(),
            })
            .await?;

        tracing::info!(
            "Account registered: id={}, username={}, role={}",
            user.id,
            user.username,
            user.role
        );

        self.respond_with_token(user)
    }

    /// Login with username and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .find_by_username(dto.username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let stored_hash = user.password_hash.clone();
        let password = dto.password;
        let password_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AppError::Internal(format!("Password check failed: {}", e)))?;

        if !password_valid {
            tracing::debug!("Rejected login for username={}", user.username);
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is disabled".to_string()));
        }

        self.respond_with_token(user)
    }

    /// Get current user info (for /me endpoint)
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        self.find_by_id(user.user_id)
            .await?
            .map(AuthUserDto::from)
            .ok_or_else(|| AppError::NotFound("Account no longer exists".to_string()))
    }

    /// Create the configured administrator account if it does not exist yet
    pub async fn ensure_admin(&self, config: &AdminBootstrapConfig) -> Result<()> {
        let Some((username, password, email)) = config.credentials() else {
            tracing::debug!("No administrator bootstrap configured");
            return Ok(());
        };

        if self.find_by_username(username).await?.is_some() {
            tracing::debug!("Administrator '{}' already present", username);
            return Ok(());
        }

        let password_hash = hash_blocking(password.to_string()).await?;
        let user = self
            .insert_user(CreateUser {
                username: username.to_string(),
                email,
                password_hash,
                first_name: "Placement".to_string(),
                last_name: "Office".to_string(),
                phone: None,
                role: UserRole::Admin,
            })
            .await?;

        tracing::info!("Administrator account created: {}", user.username);
        Ok(())
    }

    async fn insert_user(&self, new_user: CreateUser) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, phone, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone)
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Username or email is already registered"))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by username: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up user by id: {:?}", e);
                AppError::Database(e)
            })
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponseDto> {
        let token = self.token_service.issue_token(&user)?;
        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user: user.into(),
        })
    }
}

/// Argon2 is CPU-bound; keep it off the async workers
async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::dtos::RegistrationRole;
    use std::time::Duration;

    fn service(pool: PgPool) -> AuthService {
        let tokens = TokenService::new(&AuthConfig {
            jwt_secret: "an-hs256-test-secret-of-at-least-32-bytes".to_string(),
            issuer: "campus-placement".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        });
        AuthService::new(pool, Arc::new(tokens))
    }

    fn registration(username: &str, email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            username: username.to_string(),
            email: email.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Rao".to_string(),
            phone: None,
            role: RegistrationRole::Student,
            password: "correct-horse".to_string(),
            password_confirm: "correct-horse".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_username_differing_only_in_case_is_taken(pool: PgPool) {
        let service = service(pool);
        service
            .register(registration("Alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .register(registration("alice", "alice.rao@example.com"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_ignores_username_case(pool: PgPool) {
        let service = service(pool);
        service
            .register(registration("Alice", "alice@example.com"))
            .await
            .unwrap();

        let response = service
            .login(LoginRequestDto {
                username: "ALICE".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.username, "Alice");

        let wrong = service
            .login(LoginRequestDto {
                username: "alice".to_string(),
                password: "wrong-horse".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
    }
}
