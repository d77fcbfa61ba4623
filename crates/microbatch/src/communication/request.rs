use std::time::Instant;

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::Result;

/// # PendingRequest
///
/// One queued unit of work: the opaque payload to process, the instant it
/// arrived at ingress, and the sending half of the caller's result slot.
///
/// Created at ingress, consumed exactly once by the scheduler, never mutated
/// after creation apart from resolution.
///
/// ## Type Parameters
///
/// * `P` - The payload to be processed
/// * `R` - The response delivered through the result handle
pub struct PendingRequest<P, R> {
    id: Uuid,
    submitted_at: Instant,
    payload: P,
    sender: Option<oneshot::Sender<Result<R>>>,
}

impl<P, R> PendingRequest<P, R> {
    pub fn new(payload: P, sender: oneshot::Sender<Result<R>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Instant::now(),
            payload,
            sender: Some(sender),
        }
    }

    /// Identifier carried for log correlation only.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The instant this request entered the queue. Latency is measured from
    /// here, so queueing and formation delay are part of what the caller
    /// observes.
    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Delivers the outcome to the caller.
    ///
    /// Exactly one resolution wins: the sender is taken out on first use, so
    /// a second call is a silent no-op. A caller that dropped its handle
    /// (cancellation, hedged-request loser) makes the send fail; that error
    /// is ignored as well.
    pub fn resolve(&mut self, outcome: Result<R>) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(outcome);
        }
    }

    /// Whether the request still has an unresolved slot.
    pub fn is_pending(&self) -> bool {
        self.sender.is_some()
    }
}
