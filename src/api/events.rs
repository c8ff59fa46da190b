use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::warn;

use crate::api::AppState;
use crate::services::SearchState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/events", get(sse_handler))
}

/// Streams every published search state, starting with the current one.
async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.search().subscribe();
    rx.mark_changed();

    let stream = stream::unfold(rx, |mut rx: watch::Receiver<SearchState>| async move {
        if rx.changed().await.is_err() {
            return None;
        }

        let snapshot = rx.borrow_and_update().clone();
        let event = match Event::default().event("state").json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Failed to serialize search state");
                Event::default().event("warning").data("Unserializable state")
            }
        };
        Some((Ok(event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
