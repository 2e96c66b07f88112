//! SSE streaming endpoint.
//!
//! GET /api/streams/heat-map
//!
//! Sends `connected`, then the current view as a `heat_map` event, then one
//! `heat_map` event per recomputed view. A subscriber that falls more than the
//! hub capacity behind gets a `lagged` event with the number of missed views;
//! the next `heat_map` event is always a complete view, so nothing needs to be
//! replayed.

use std::convert::Infallible;

use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, StreamExt};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::domains::heat_map::{HEAT_MAP_EVENT, HEAT_MAP_TOPIC};
use crate::server::app::AppState;

pub async fn heat_map_stream_handler(
    Extension(state): Extension<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before rendering the current view so no update is lost in between
    let rx = state.stream_hub.subscribe(HEAT_MAP_TOPIC).await;

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let current = serde_json::to_value(state.heat_map.current_view())
        .ok()
        .and_then(|data| {
            Event::default()
                .event(HEAT_MAP_EVENT)
                .json_data(serde_json::json!({"type": HEAT_MAP_EVENT, "data": data}))
                .ok()
        })
        .map(Ok);

    let events = BroadcastStream::new(rx).filter_map(|result| async {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message");
                Event::default()
                    .event(event_name)
                    .json_data(&value)
                    .ok()
                    .map(Ok)
            }
            Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
                .event("lagged")
                .json_data(serde_json::json!({"missed": n}))
                .ok()
                .map(Ok),
        }
    });

    Sse::new(connected.chain(stream::iter(current)).chain(events)).keep_alive(KeepAlive::default())
}
