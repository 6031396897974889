//! Session resolution: maps the `ba_session` cookie or a bearer token to a user.
//!
//! Verification is mocked. [`DemoSessionVerifier`] accepts any non-empty credential and
//! answers with the configured demo user.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{user, UserRole};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn demo() -> Self {
        SessionUser {
            id: "demo-user-id".to_string(),
            email: "demo@example.com".to_string(),
            role: UserRole::Investor,
        }
    }
}

/// Turns a raw session credential into a user. `None` means the credential is not valid.
pub trait SessionVerifier: Send + Sync {
    fn verify_session(&self, token: &str) -> Option<SessionUser>;

    fn verify_token(&self, token: &str) -> Option<SessionUser> {
        self.verify_session(token)
    }
}

#[derive(Debug, Clone)]
pub struct DemoSessionVerifier {
    user: SessionUser,
}

impl DemoSessionVerifier {
    pub fn new(user: SessionUser) -> Self {
        DemoSessionVerifier { user }
    }
}

impl SessionVerifier for DemoSessionVerifier {
    fn verify_session(&self, token: &str) -> Option<SessionUser> {
        if token.trim().is_empty() {
            return None;
        }
        Some(self.user.clone())
    }
}

/// Looks for `name` in the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Cookie first (browser flow), then the bearer header (API calls).
pub fn resolve_session(
    headers: &HeaderMap,
    cookie_name: &str,
    verifier: &dyn SessionVerifier,
) -> Option<SessionUser> {
    if let Some(cookie) = cookie_value(headers, cookie_name) {
        if let Some(user) = verifier.verify_session(cookie) {
            return Some(user);
        }
        tracing::debug!("session cookie rejected, trying bearer token");
    }

    bearer_token(headers).and_then(|token| verifier.verify_token(token))
}

/// Extractor for handlers that require a signed-in user. Rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_session(&parts.headers, &state.session_cookie, state.sessions.as_ref())
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Inserts the session user's row if it does not exist yet, so writes referencing it
/// satisfy the foreign keys.
pub async fn ensure_user<C: ConnectionTrait>(db: &C, session_user: &SessionUser) -> Result<(), AppError> {
    let row = user::ActiveModel {
        id: Set(session_user.id.clone()),
        email: Set(session_user.email.clone()),
        name: Set(None),
        role: Set(session_user.role),
        created_at: Set(chrono::Utc::now()),
    };

    user::Entity::insert(row)
        .on_conflict(OnConflict::column(user::Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(())
}
