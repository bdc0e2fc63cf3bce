//! Bridges the Coordinator's synchronous [`EventSink`] callback to an SSE
//! response stream, and injects the periodic `ping` events the adapter is
//! responsible for (§6: "expected to send periodic ping events every ~15s" —
//! the Coordinator itself never emits one).

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::Utc;
use futures_util::Stream;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::events::{EventSink, PipelineEvent};

const PING_INTERVAL: Duration = Duration::from_secs(15);

/// An [`EventSink`] that forwards every event onto an unbounded channel.
/// `send` returns `false` once the receiving end (the disconnected HTTP
/// client, or the relay task below) has been dropped, signalling the
/// Coordinator to stop emitting.
pub struct ChannelSink {
    tx: UnboundedSender<PipelineEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<PipelineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn send(&mut self, event: PipelineEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

fn to_sse_event(event: &PipelineEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.kind()).data(data)
}

/// Spawns `run` on its own task, wired to a [`ChannelSink`], and returns the
/// `Sse` response that streams its events plus periodic pings back to the
/// caller. The stream ends right after the pipeline's `final` event.
pub fn stream_coordinator_run<F, Fut>(
    run: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send>
where
    F: FnOnce(ChannelSink) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let (pipeline_tx, mut pipeline_rx) = mpsc::unbounded_channel::<PipelineEvent>();
    let sink = ChannelSink::new(pipeline_tx);

    tokio::spawn(async move {
        run(sink).await;
    });

    let (out_tx, out_rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        loop {
            match tokio::time::timeout(PING_INTERVAL, pipeline_rx.recv()).await {
                Ok(Some(event)) => {
                    let terminal = event.is_terminal();
                    if out_tx.send(to_sse_event(&event)).is_err() {
                        return;
                    }
                    if terminal {
                        return;
                    }
                }
                Ok(None) => return,
                Err(_elapsed) => {
                    let ping = PipelineEvent::Ping { ts: Utc::now().timestamp_millis() };
                    if out_tx.send(to_sse_event(&ping)).is_err() {
                        return;
                    }
                }
            }
        }
    });

    let stream = UnboundedReceiverStream::new(out_rx).map(Ok);
    Sse::new(stream).keep_alive(KeepAlive::default())
}
