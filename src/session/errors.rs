use crate::transport::TransportError;

/// Form session errors.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Failed to encode form: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to send form {form_id}: {source}")]
    Transport {
        form_id: u32,
        #[source]
        source: TransportError,
    },
}
