//! Host-side events and the listener seam the notifier plugs into.
//!
//! The host adapter translates whatever its application emits into
//! `HostEvent`s and hands each one to `dispatch`. Only `StreamingStarted`
//! reaches the listener.

use async_trait::async_trait;
use tracing::trace;

/// Frontend events a broadcasting host can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    StreamingStarting,
    StreamingStarted,
    StreamingStopping,
    StreamingStopped,
    RecordingStarted,
    RecordingStopped,
    Exit,
}

impl HostEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            HostEvent::StreamingStarting => "streaming.starting",
            HostEvent::StreamingStarted => "streaming.started",
            HostEvent::StreamingStopping => "streaming.stopping",
            HostEvent::StreamingStopped => "streaming.stopped",
            HostEvent::RecordingStarted => "recording.started",
            HostEvent::RecordingStopped => "recording.stopped",
            HostEvent::Exit => "exit",
        }
    }
}

#[async_trait]
pub trait StreamListener: Send {
    async fn on_streaming_started(&mut self);
}

/// Forwards `event` to `listener` when it is a stream start.
/// Returns whether the listener was invoked.
pub async fn dispatch(event: &HostEvent, listener: &mut dyn StreamListener) -> bool {
    match event {
        HostEvent::StreamingStarted => {
            listener.on_streaming_started().await;
            true
        }
        other => {
            trace!("Ignoring host event {}", other.event_type());
            false
        }
    }
}
