use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{waitlist_entry, WaitlistEntry};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct WaitlistRequest {
    pub email: String,
    pub name: String,
}

impl WaitlistRequest {
    /// Trims both fields and lowercases the e-mail.
    fn normalized(self) -> AppResult<WaitlistRequest> {
        let email = self.email.trim().to_lowercase();
        let name = self.name.trim().to_string();

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(AppError::InvalidRequest("a valid email is required".to_string())),
        }
        if name.is_empty() {
            return Err(AppError::InvalidRequest("name must not be empty".to_string()));
        }
        Ok(WaitlistRequest { email, name })
    }
}

/// Join the waitlist. Signing up twice with the same e-mail is accepted.
#[utoipa::path(
    post,
    path = "/waitlist",
    request_body = WaitlistRequest,
    responses(
        (status = 201, description = "On the waitlist", body = WaitlistRequest),
        (status = 400, description = "Missing name or invalid e-mail")
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(request): Json<WaitlistRequest>,
) -> AppResult<(StatusCode, Json<WaitlistRequest>)> {
    let request = request.normalized()?;

    let entry = waitlist_entry::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(request.email.clone()),
        name: Set(request.name.clone()),
        created_at: Set(Utc::now()),
    };

    WaitlistEntry::insert(entry)
        .on_conflict(
            OnConflict::column(waitlist_entry::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    tracing::info!("Waitlist signup recorded");
    Ok((StatusCode::CREATED, Json(request)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, name: &str) -> WaitlistRequest {
        WaitlistRequest {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn normalizes_email_and_name() {
        let normalized = request("  Ada@Example.COM ", " Ada ").normalized().unwrap();
        assert_eq!(normalized.email, "ada@example.com");
        assert_eq!(normalized.name, "Ada");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(request("not-an-email", "Ada").normalized().is_err());
        assert!(request("@example.com", "Ada").normalized().is_err());
        assert!(request("ada@example.com", "   ").normalized().is_err());
    }
}
