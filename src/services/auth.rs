//! Registration, login and token verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::{Claims, RegisterUser, TokenResponse, User},
        validation_error,
    },
    repository::Repository,
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";
const INVALID_TOKEN: &str = "Could not validate credentials";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    algorithm: Algorithm,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> AppResult<Self> {
        let algorithm = config
            .algorithm()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Self { repository, config, algorithm })
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        request.validate().map_err(validation_error)?;

        if self.repository.users_username_exists(&request.username).await? {
            return Err(AppError::AlreadyExists("Username already registered".to_string()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user = self
            .repository
            .users_create(&request.username, &hashed_password)
            .await
            .map_err(|e| super::unique_violation_as(e, "Username already registered"))?;

        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self
            .repository
            .users_get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(BAD_CREDENTIALS.to_string()))?;

        if !verify_password(&user.hashed_password, password)? {
            tracing::debug!("Rejected login for {}", username);
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        let access_token = self.issue_token(&user.username)?;
        Ok(TokenResponse {
            access_token,
            token_type: self.config.token_type.clone(),
        })
    }

    /// Create a signed token for `username`
    pub fn issue_token(&self, username: &str) -> AppResult<String> {
        let claims = Claims::new(
            username,
            Duration::minutes(self.config.access_token_expire_minutes),
        );
        claims
            .create_token(&self.config.jwt_secret, self.algorithm)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        Claims::from_token(token, &self.config.jwt_secret, self.algorithm).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Authentication(INVALID_TOKEN.to_string())
        })
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
