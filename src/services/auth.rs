//! Authentication and registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{normalize_email, Credentials, User},
    repository::Repository,
    services::sessions::Session,
};

/// Message shown on the registration form when the email is taken
pub const USER_EXISTS: &str = "User exists, login";

/// Result of a credential check. Only `Authenticated` lets a session start;
/// callers must not tell the client which failure occurred.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(User),
    UnknownUser,
    BadPassword,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check an email/password pair against the stored hash
    pub async fn verify(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let email = normalize_email(email);
        let Some(user) = self.repository.users.get_by_email(&email).await? else {
            tracing::debug!("Login rejected: unknown user");
            return Ok(AuthOutcome::UnknownUser);
        };

        if verify_password(&user.password, password).await? {
            tracing::info!(user_id = user.id, "User authenticated");
            Ok(AuthOutcome::Authenticated(user))
        } else {
            tracing::debug!(user_id = user.id, "Login rejected: bad password");
            Ok(AuthOutcome::BadPassword)
        }
    }

    /// Create an account. Fails with `Conflict` if the email is already registered.
    pub async fn register(&self, credentials: Credentials) -> AppResult<User> {
        let credentials = credentials.normalized();
        credentials.validate()?;

        if self.repository.users.email_exists(&credentials.username).await? {
            return Err(AppError::Conflict(USER_EXISTS.to_string()));
        }

        let hash = self.hash_password(credentials.password).await?;

        // A concurrent registration may win between the check and the insert
        let user = self
            .repository
            .users
            .create(&credentials.username, &hash)
            .await?
            .ok_or_else(|| AppError::Conflict(USER_EXISTS.to_string()))?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Load the full user behind a session
    pub async fn current_user(&self, session: &Session) -> AppResult<User> {
        self.repository.users.get_by_id(session.user_id).await
    }

    /// Hash a password with Argon2id using the configured work factor
    pub async fn hash_password(&self, password: String) -> AppResult<String> {
        let params = Params::new(
            self.config.hash_memory_kib,
            self.config.hash_iterations,
            self.config.hash_parallelism,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Invalid Argon2 parameters: {}", e)))?;

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }
}

/// `Ok(false)` means the password does not match; `Err` means the check
/// itself could not run (corrupt hash, task failure).
pub async fn verify_password(stored_hash: &str, password: &str) -> AppResult<bool> {
    let stored_hash = stored_hash.to_string();
    let password = password.to_string();

    tokio::task::spawn_blocking(move || -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&stored_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        // Parameters come from the PHC string, not from the current config
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}
