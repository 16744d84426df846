//! Server-Sent Events support

use crate::protocol::StreamEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

/// Stream a turn's events until the turn finishes.
///
/// Dropping the response drops the receiver, which abandons the turn.
pub fn sse_stream(
    rx: mpsc::UnboundedReceiver<StreamEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = UnboundedReceiverStream::new(rx).filter_map(|event| match to_sse_event(&event) {
        Ok(sse) => Some(Ok(sse)),
        Err(e) => {
            tracing::error!(error = %e, kind = event.kind(), "Failed to serialize stream event");
            None
        }
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn to_sse_event(event: &StreamEvent) -> Result<Event, serde_json::Error> {
    Ok(Event::default()
        .event(event.kind())
        .data(serde_json::to_string(event)?))
}
