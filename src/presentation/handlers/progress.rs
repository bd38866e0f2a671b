use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use uuid::Uuid;

use crate::domain::SessionId;
use crate::presentation::state::AppState;

/// Live progress for one session as server-sent events. The stream is finite:
/// it closes right after the terminal `completed`/`failed` event.
#[tracing::instrument(skip(state))]
pub async fn progress_events_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = SessionId::from_uuid(session_id);

    let stream = state.broadcaster.subscribe(&session).map(|status| {
        let event = Event::default()
            .event(status.step.as_str())
            .json_data(&status)
            .unwrap_or_else(|_| Event::default().data("serialization error"));
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
