//! Notification routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use pesabank_db::repositories::notification::{NotificationError, NotificationRepository};

use super::internal_error;

/// Creates the notification routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/{notification_id}/read", post(mark_read))
}

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    /// Only return unread notifications.
    #[serde(default)]
    pub unread: bool,
}

/// GET `/notifications` - The caller's notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NotificationsQuery>,
) -> impl IntoResponse {
    let repo = NotificationRepository::new((*state.db).clone());

    match repo.list(auth.owner_id(), query.unread).await {
        Ok(notifications) => {
            (StatusCode::OK, Json(json!({ "notifications": notifications }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list notifications");
            internal_error()
        }
    }
}

/// POST `/notifications/{notification_id}/read` - Mark a notification read.
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = NotificationRepository::new((*state.db).clone());

    match repo.mark_read(auth.owner_id(), notification_id).await {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(NotificationError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "notification_not_found",
                "message": "Notification not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to mark notification read");
            internal_error()
        }
    }
}
