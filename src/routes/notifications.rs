use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{notification, Notification};
use crate::error::{AppError, AppResult};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notification::Model> for NotificationView {
    fn from(model: notification::Model) -> Self {
        NotificationView {
            id: model.id,
            kind: model.kind,
            message: model.message,
            read: model.read,
            created_at: model.created_at,
        }
    }
}

/// All notifications of the signed-in user, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications of the current user", body = Vec<NotificationView>),
        (status = 401, description = "No session")
    )
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<NotificationView>>> {
    let notifications = Notification::find()
        .filter(notification::Column::UserId.eq(user.id.as_str()))
        .order_by_desc(notification::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(notifications.into_iter().map(NotificationView::from).collect()))
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationView),
        (status = 401, description = "No session"),
        (status = 404, description = "No such notification for this user")
    )
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationView>> {
    // someone else's notification is reported as missing
    let existing = Notification::find_by_id(id.clone())
        .filter(notification::Column::UserId.eq(user.id.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("notification {}", id)))?;

    if existing.read {
        return Ok(Json(existing.into()));
    }

    let mut active = existing.into_active_model();
    active.read = Set(true);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}
