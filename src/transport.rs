//! Packets exchanged with the client and the primitive used to send them.

use thiserror::Error;
use tokio::sync::mpsc;

/// Outbound request asking the client to display a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub form_id: u32,
    /// JSON document describing the form.
    pub form_data: Vec<u8>,
}

/// Inbound answer to a previously sent form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub form_id: u32,
    /// `null\n` or empty when the client closed the form, JSON otherwise.
    pub response_data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes form requests onto the client connection.
pub trait FormTransport: Send + Sync {
    fn write_packet(&self, packet: &FormRequest) -> Result<(), TransportError>;
}

/// Hands requests to the task that owns the connection writer.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<FormRequest>,
}

impl ChannelTransport {
    /// Creates the transport along with the receiving end for the writer task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FormRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl FormTransport for ChannelTransport {
    fn write_packet(&self, packet: &FormRequest) -> Result<(), TransportError> {
        self.sender
            .send(packet.clone())
            .map_err(|_| TransportError::Closed)
    }
}
