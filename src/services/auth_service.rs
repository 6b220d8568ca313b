use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::{verify_password, AuthError, Claims, JwtCodec};
use crate::database::models::User;
use crate::database::UserRepository;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Issues, validates and revokes bearer tokens.
///
/// A token is honoured only while its session row exists, so logout takes
/// effect even though the signature stays valid until `exp`.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtCodec,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtCodec) -> Self {
        Self { users, jwt }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = match self.users.find_active_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown user '{}'", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        // bcrypt blocks for tens of milliseconds
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::TokenGeneration(format!("password check aborted: {}", e)))??;

        if !valid {
            warn!("Login failed: bad password for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let (token, claims) = self.jwt.issue(user.id, &user.username, &user.role)?;
        let expires_at = claims.expires_at();
        self.users.create_session(user.id, &token, expires_at).await?;

        info!("User logged in: {} ({})", user.username, user.role);
        Ok(LoginOutcome {
            token,
            expires_at,
            user,
        })
    }

    /// Signature, expiry and a live session are all required.
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.jwt.decode(token)?;

        match self.users.find_live_session(token).await? {
            Some(session) if session.user_id == claims.sub => Ok(claims),
            Some(_) => Err(AuthError::InvalidToken("session belongs to another user".to_string())),
            None => Err(AuthError::SessionNotFound),
        }
    }

    /// Returns whether a session was removed
    pub async fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self.users.delete_session(token).await?;
        Ok(removed)
    }

    pub async fn profile(&self, user_id: i32) -> Result<User, AuthError> {
        self.users
            .find_active_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        Ok(self.users.purge_expired_sessions().await?)
    }
}
