use axum::Json;

use crate::session::{CurrentUser, SessionUser};

/// The user resolved from the session cookie or bearer token
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Signed-in user", body = SessionUser),
        (status = 401, description = "No session")
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}
