use crate::{models::*, ObsError};
use crate::error::Result;
use autoskeet_core::HostEvent;
use futures_util::{future, Stream, StreamExt};
use obws::events::{Event, OutputState};
use obws::Client;
use tracing::{debug, info};

/// obs-websocket connection acting as the notifier's host.
pub struct ObsClient {
    instance: ObsInstance,
    client: Option<Client>,
}

impl ObsClient {
    pub fn new(instance: ObsInstance) -> Self {
        Self {
            instance,
            client: None,
        }
    }

    pub fn instance(&self) -> &ObsInstance {
        &self.instance
    }

    pub async fn connect(&mut self) -> Result<()> {
        info!("Connecting to OBS at {}:{}", self.instance.host, self.instance.port);

        let client = Client::connect(
            self.instance.host.as_str(),
            self.instance.port,
            self.instance.password.as_deref(),
        )
        .await
        .map_err(|e| ObsError::ConnectionError(e.to_string()))?;

        self.client = Some(client);
        info!("Successfully connected to OBS at {}:{}", self.instance.host, self.instance.port);
        Ok(())
    }

    pub async fn disconnect(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.disconnect().await;
            info!("Disconnected from OBS at {}:{}", self.instance.host, self.instance.port);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn connected(&self) -> Result<&Client> {
        self.client.as_ref().ok_or_else(|| {
            ObsError::InstanceNotConnected(self.instance.host.clone(), self.instance.port)
        })
    }

    pub async fn get_version(&self) -> Result<String> {
        let version = self
            .connected()?
            .general()
            .version()
            .await
            .map_err(|e| ObsError::WebSocketError(e.to_string()))?;
        Ok(format!("OBS: {} WebSocket: {}", version.obs_version, version.obs_web_socket_version))
    }

    /// OBS events translated into host events. Events without a
    /// `HostEvent` counterpart are dropped.
    pub fn host_events(&self) -> Result<impl Stream<Item = HostEvent> + '_> {
        let events = self
            .connected()?
            .events()
            .map_err(|e| ObsError::WebSocketError(e.to_string()))?;

        Ok(events.filter_map(|event| future::ready(map_event(event))))
    }
}

pub fn map_event(event: Event) -> Option<HostEvent> {
    match event {
        Event::StreamStateChanged { state, .. } => stream_state_event(state),
        Event::RecordStateChanged { state, .. } => record_state_event(state),
        Event::ExitStarted => Some(HostEvent::Exit),
        other => {
            debug!("Unhandled OBS event: {:?}", other);
            None
        }
    }
}

pub fn stream_state_event(state: OutputState) -> Option<HostEvent> {
    match state {
        OutputState::Starting => Some(HostEvent::StreamingStarting),
        OutputState::Started => Some(HostEvent::StreamingStarted),
        OutputState::Stopping => Some(HostEvent::StreamingStopping),
        OutputState::Stopped => Some(HostEvent::StreamingStopped),
        _ => None,
    }
}

pub fn record_state_event(state: OutputState) -> Option<HostEvent> {
    match state {
        OutputState::Started => Some(HostEvent::RecordingStarted),
        OutputState::Stopped => Some(HostEvent::RecordingStopped),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_output_states() {
        assert_eq!(stream_state_event(OutputState::Started), Some(HostEvent::StreamingStarted));
        assert_eq!(stream_state_event(OutputState::Starting), Some(HostEvent::StreamingStarting));
        assert_eq!(stream_state_event(OutputState::Stopped), Some(HostEvent::StreamingStopped));
        assert_eq!(stream_state_event(OutputState::Reconnecting), None);
    }

    #[test]
    fn test_record_output_states() {
        assert_eq!(record_state_event(OutputState::Started), Some(HostEvent::RecordingStarted));
        assert_eq!(record_state_event(OutputState::Starting), None);
    }

    #[test]
    fn test_exit_maps_to_exit() {
        assert_eq!(map_event(Event::ExitStarted), Some(HostEvent::Exit));
    }

    #[tokio::test]
    async fn test_requires_connection() {
        let client = ObsClient::new(ObsInstance::default());
        assert!(!client.is_connected());
        assert!(matches!(
            client.get_version().await,
            Err(ObsError::InstanceNotConnected(ref host, 4455)) if host == "127.0.0.1"
        ));
        assert!(client.host_events().is_err());
    }
}
