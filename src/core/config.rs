use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
    pub admin: AdminBootstrapConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Settings for the locally issued access tokens
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl: Duration,
    pub jwt_leeway: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_ttl", &self.token_ttl)
            .field("jwt_leeway", &self.jwt_leeway)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for resume uploads
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing resumes
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Key prefix under which resumes are stored
    pub resume_prefix: String,
}

/// Optional administrator account created at start-up.
///
/// Administrators cannot self-register, so this is the only way to obtain
/// the first admin login on a fresh database.
#[derive(Clone, Default)]
pub struct AdminBootstrapConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl std::fmt::Debug for AdminBootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrapConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            admin: AdminBootstrapConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = parse_csv(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative defaults, a single campus is a small workload
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const MIN_SECRET_LEN: usize = 32;
    const DEFAULT_ISSUER: &'static str = "campus-placement";
    const DEFAULT_TOKEN_TTL_SECS: u64 = 86400; // 1 day
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET environment variable is required".to_string())?;

        if jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} bytes long",
                Self::MIN_SECRET_LEN
            ));
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| Self::DEFAULT_ISSUER.to_string());

        let token_ttl_secs = env::var("JWT_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_TTL_SECS must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            issuer,
            token_ttl: Duration::from_secs(token_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Campus Placement API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for the campus placement service".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("MINIO_BUCKET").unwrap_or_else(|_| "placement-uploads".to_string());

        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let resume_prefix = env::var("MINIO_RESUME_PREFIX")
            .unwrap_or_else(|_| "resumes".to_string())
            .trim_matches('/')
            .to_string();

        if resume_prefix.is_empty() {
            return Err("MINIO_RESUME_PREFIX must not be empty".to_string());
        }

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            resume_prefix,
        })
    }
}

impl AdminBootstrapConfig {
    pub fn from_env() -> Self {
        Self {
            username: env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            email: env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Returns (username, password, email) when an admin account should be ensured
    pub fn credentials(&self) -> Option<(&str, &str, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => {
                let email = self
                    .email
                    .clone()
                    .unwrap_or_else(|| format!("{}@placement.local", user));
                Some((user.as_str(), pass.as_str(), email))
            }
            _ => None,
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_trims_and_drops_empty() {
        assert_eq!(
            parse_csv(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn test_admin_bootstrap_requires_both_username_and_password() {
        let config = AdminBootstrapConfig {
            username: Some("tpo".to_string()),
            password: None,
            email: None,
        };
        assert!(config.credentials().is_none());

        let config = AdminBootstrapConfig {
            username: Some("tpo".to_string()),
            password: Some("s3cret-pass".to_string()),
            email: None,
        };
        let (user, pass, email) = config.credentials().unwrap();
        assert_eq!(user, "tpo");
        assert_eq!(pass, "s3cret-pass");
        assert_eq!(email, "tpo@placement.local");
    }
}
