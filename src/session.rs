mod errors;
mod registry;

pub use errors::SessionError;
pub use registry::{ConnectionId, SessionRegistry};

use std::{
    num::NonZeroUsize,
    result,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU32, Ordering},
    },
};

use lru::LruCache;
use tracing::{debug, warn};

use crate::{
    config::{FormsConfig, SendFailurePolicy},
    encoder,
    form::{Form, SubmitError},
    transport::{FormRequest, FormResponse, FormTransport},
};

pub(crate) const DEFAULT_MAX_PENDING: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Response sent by the client when the player closed the form.
const NULL_RESPONSE: &[u8] = b"null\n";

type Result<T> = result::Result<T, SessionError>;

/// How an inbound form response was dealt with.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// No pending form has this id; another handler may own it.
    NotFound,
    /// The client closed the form without answering.
    Cancelled,
    /// The form's handler accepted the response.
    Submitted,
    /// The response reached its form but could not be submitted.
    SubmitFailed(SubmitError),
}

impl ResponseOutcome {
    /// Whether this session consumed the response without error.
    pub fn handled_locally(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Submitted)
    }
}

/// Tracks the forms sent over one client connection until they are answered.
///
/// Ids are assigned from a wrapping counter starting at 1. At most
/// [capacity][cap] forms are kept pending; sending another one first drops
/// the oldest pending form without notifying it.
///
/// [cap]: Self::capacity
///
/// # Examples
///
/// ```
/// # use form_bridge::form::ModalForm;
/// # use form_bridge::session::FormSession;
/// # use form_bridge::transport::ChannelTransport;
/// let (transport, _requests) = ChannelTransport::new();
/// let session = FormSession::new(transport);
///
/// let request = session
///     .send(ModalForm::new("Confirm", "Are you sure?", "Yes", "No", |_| Ok(())))
///     .unwrap();
/// assert_eq!(request.form_id, 1);
/// assert_eq!(session.local(), 1);
/// ```
pub struct FormSession<T: FormTransport> {
    transport: Arc<T>,
    pending: Mutex<LruCache<u32, Form>>,
    local_id: AtomicU32,
    remote_id: AtomicU32,
    send_failure: SendFailurePolicy,
}

impl<T: FormTransport> FormSession<T> {
    /// Creates a session holding up to 10 pending forms and propagating send failures.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            pending: Mutex::new(LruCache::new(DEFAULT_MAX_PENDING)),
            local_id: AtomicU32::new(0),
            remote_id: AtomicU32::new(0),
            send_failure: SendFailurePolicy::default(),
        }
    }

    /// Creates a session from the `forms` configuration section.
    ///
    /// A `max_pending` of 0 falls back to the default of 10; use
    /// [FormsConfig::validate] to reject it instead.
    pub fn from_config(transport: T, config: &FormsConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_pending).unwrap_or(DEFAULT_MAX_PENDING);
        Self::new(transport)
            .with_max_pending(capacity)
            .with_send_failure(config.on_send_failure)
    }

    /// Configures the maximum number of forms awaiting a response.
    pub fn with_max_pending(self, max_pending: NonZeroUsize) -> Self {
        self.lock_pending().resize(max_pending);
        self
    }

    /// Configures how transport failures in [send][Self::send] are reported.
    pub fn with_send_failure(mut self, policy: SendFailurePolicy) -> Self {
        self.send_failure = policy;
        self
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// The id assigned to the most recently sent form.
    pub fn local(&self) -> u32 {
        self.local_id.load(Ordering::Acquire)
    }

    /// The last form id assigned by the peer for forms it sends to us.
    pub fn remote(&self) -> u32 {
        self.remote_id.load(Ordering::Acquire)
    }

    pub fn set_remote(&self, form_id: u32) {
        self.remote_id.store(form_id, Ordering::Release);
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.lock_pending().cap()
    }

    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    /// Ids of the forms still awaiting a response, in ascending order.
    pub fn pending_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.lock_pending().iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }

    /// Encodes `form`, registers it under a fresh id and writes it to the client.
    ///
    /// Returns the request that was written.
    pub fn send(&self, form: impl Into<Form>) -> Result<FormRequest> {
        let form = form.into();
        let form_data = encoder::to_payload(&form)?;
        let title = form.title().to_owned();

        let (form_id, displaced) = {
            let mut pending = self.lock_pending();
            let form_id = self.local_id.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
            let displaced = pending.push(form_id, form);
            match &displaced {
                Some((dropped, _)) if *dropped == form_id => {
                    warn!(form_id, "Form id wrapped around onto a pending form, replacing it");
                }
                Some((dropped, _)) => {
                    debug!(form_id = dropped, "Pending form table full, evicted oldest form");
                }
                None => {}
            }
            (form_id, displaced)
        };

        let request = FormRequest { form_id, form_data };
        if let Err(source) = self.transport.write_packet(&request) {
            match self.send_failure {
                SendFailurePolicy::Propagate => {
                    self.forget_unsent(form_id, displaced);
                    return Err(SessionError::Transport { form_id, source });
                }
                SendFailurePolicy::Ignore => {
                    warn!(form_id, %title, error = %source, "Failed to write form request");
                }
            }
        }

        debug!(form_id, %title, "Sent form");
        Ok(request)
    }

    /// Removes a form whose request never reached the client and puts back
    /// the entry its insertion displaced.
    fn forget_unsent(&self, form_id: u32, displaced: Option<(u32, Form)>) {
        let mut pending = self.lock_pending();
        // Already evicted by concurrent sends, which also outrank the displaced entry
        if pending.pop(&form_id).is_none() {
            return;
        }
        if let Some((dropped, form)) = displaced {
            pending.push(dropped, form);
            if dropped != form_id {
                // An evicted form was the oldest one and stays first in line
                pending.demote(&dropped);
            }
        }
    }

    /// Correlates a client response with its pending form and submits it.
    ///
    /// The pending entry is consumed whatever the outcome, so each form sees
    /// at most one response.
    pub fn handle_response(&self, response: &FormResponse) -> ResponseOutcome {
        let form_id = response.form_id;
        let form = self.lock_pending().pop(&form_id);
        let Some(form) = form else {
            return ResponseOutcome::NotFound;
        };

        let data = response.response_data.as_slice();
        if data.is_empty() || data == NULL_RESPONSE {
            debug!(form_id, "Form closed by client");
            return ResponseOutcome::Cancelled;
        }

        match form.submit(data) {
            Ok(()) => {
                debug!(form_id, title = form.title(), "Form submitted");
                ResponseOutcome::Submitted
            }
            Err(e) => {
                warn!(form_id, title = form.title(), error = %e, "Failed to submit form response");
                ResponseOutcome::SubmitFailed(e)
            }
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, LruCache<u32, Form>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
