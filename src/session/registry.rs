use std::{fmt, sync::Arc};

use config::ConfigError;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::{FormSession, ResponseOutcome};
use crate::{
    config::FormsConfig,
    transport::{FormResponse, FormTransport},
};

/// Identifies one client connection.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Form sessions of all open connections.
///
/// A session lives from [open][Self::open] until [close][Self::close];
/// closing drops every form still pending on that connection.
pub struct SessionRegistry<T: FormTransport> {
    sessions: DashMap<ConnectionId, Arc<FormSession<T>>>,
    config: FormsConfig,
}

impl<T: FormTransport> SessionRegistry<T> {
    /// Creates an empty registry; fails if `config` is not usable.
    pub fn new(config: FormsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sessions: DashMap::new(),
            config,
        })
    }

    /// Starts tracking forms for a newly established connection.
    pub fn open(&self, transport: T) -> (ConnectionId, Arc<FormSession<T>>) {
        let id = ConnectionId::new();
        let session = Arc::new(FormSession::from_config(transport, &self.config));
        self.sessions.insert(id, session.clone());
        info!("Opened form session for connection {id}");
        (id, session)
    }

    pub fn get(&self, id: ConnectionId) -> Option<Arc<FormSession<T>>> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Forgets the connection's session. Returns false if it was not open.
    pub fn close(&self, id: ConnectionId) -> bool {
        match self.sessions.remove(&id) {
            Some((_, session)) => {
                info!(
                    "Closed form session for connection {id}, discarding {} pending forms",
                    session.pending_len()
                );
                true
            }
            None => false,
        }
    }

    /// Routes a response to the session of the connection it arrived on.
    pub fn dispatch(&self, id: ConnectionId, response: &FormResponse) -> ResponseOutcome {
        // Clone out of the map so the shard lock is not held while submitting
        match self.get(id) {
            Some(session) => session.handle_response(response),
            None => ResponseOutcome::NotFound,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form::ModalForm, transport::ChannelTransport};

    fn confirm() -> ModalForm {
        ModalForm::new("Confirm", "Are you sure?", "Yes", "No", |_| Ok(()))
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new(FormsConfig::default()).unwrap();
        let (first_transport, _first_rx) = ChannelTransport::new();
        let (second_transport, _second_rx) = ChannelTransport::new();

        let (first, first_session) = registry.open(first_transport);
        let (second, second_session) = registry.open(second_transport);
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);

        first_session.send(confirm()).unwrap();
        let request = second_session.send(confirm()).unwrap();
        // Each connection has its own id space
        assert_eq!(request.form_id, 1);

        let response = FormResponse {
            form_id: 1,
            response_data: b"true\n".to_vec(),
        };
        assert!(registry.dispatch(first, &response).handled_locally());
        assert_eq!(first_session.pending_len(), 0);
        assert_eq!(second_session.pending_len(), 1);
    }

    #[test]
    fn test_close_discards_session() {
        let registry = SessionRegistry::new(FormsConfig::default()).unwrap();
        let (transport, _rx) = ChannelTransport::new();
        let (id, session) = registry.open(transport);
        session.send(confirm()).unwrap();

        assert!(registry.close(id));
        assert!(!registry.close(id));
        assert!(registry.is_empty());
        assert!(registry.get(id).is_none());

        let response = FormResponse {
            form_id: 1,
            response_data: b"true\n".to_vec(),
        };
        assert!(matches!(
            registry.dispatch(id, &response),
            ResponseOutcome::NotFound
        ));
    }

    #[test]
    fn test_open_applies_config() {
        let config = FormsConfig {
            max_pending: 3,
            ..FormsConfig::default()
        };
        let registry = SessionRegistry::new(config).unwrap();
        let (transport, _rx) = ChannelTransport::new();
        let (_, session) = registry.open(transport);

        assert_eq!(session.capacity().get(), 3);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = FormsConfig {
            max_pending: 0,
            ..FormsConfig::default()
        };

        let result = SessionRegistry::<ChannelTransport>::new(config);
        assert!(matches!(result, Err(ConfigError::Message(_))));
    }
}
