use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use futures::stream::{self, Stream};

use crate::{
    dto::common::NotificationQuery,
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("since" = Option<u64>, Query, description = "Only notifications with a greater id")
    ),
    responses(
        (status = 200, description = "Recent notifications, oldest first")
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.notifications.recent(query.since)))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = u64, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification dismissed"),
        (status = 404, description = "Unknown or already dismissed")
    )
)]
#[axum::debug_handler]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse> {
    if !state.notifications.dismiss(id) {
        return Err(Error::NotFound("Notification not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    responses(
        (status = 200, description = "Server-sent events, one `notification` event per alert", content_type = "text/event-stream")
    )
)]
#[axum::debug_handler]
pub async fn stream_notifications(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let subscription = state.notifications.subscribe();
    tracing::debug!(
        subscribers = state.notifications.subscriber_count(),
        "notification stream opened"
    );

    let events = stream::unfold(subscription, |mut subscription| async move {
        let notification = subscription.recv().await?;
        let event = match Event::default()
            .event("notification")
            .id(notification.id.to_string())
            .json_data(&notification)
        {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(id = notification.id, error = %e, "notification not encodable");
                Event::default().comment("unencodable notification")
            }
        };
        Some((Ok::<_, Infallible>(event), subscription))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
