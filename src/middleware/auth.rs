use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::auth::{AuthError, Claims};
use crate::error::ApiError;
use crate::services::AuthService;

/// Authenticated caller, extracted from a bearer token with a live session.
///
/// Handlers take this as an argument and pass `user_id` on to whatever
/// records the acting user.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub token: String,
}

impl AuthUser {
    fn from_claims(claims: Claims, token: String) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
            token,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == crate::database::models::user::ADMIN_ROLE
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let auth = Arc::<AuthService>::from_ref(state);

        let claims = auth.validate(&token).await?;
        Ok(AuthUser::from_claims(claims, token))
    }
}

/// An [`AuthUser`] whose role is `admin`
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("Admin route refused for '{}' ({})", user.username, user.role);
            return Err(AuthError::AdminRequired.into());
        }
        Ok(AdminUser(user))
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::MalformedHeader),
    }
}
