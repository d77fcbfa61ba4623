use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::error::{GatewayError, Result};

/// # ResultHandle
///
/// A single-assignment, awaitable result slot returned to the caller of a
/// submit operation.
///
/// The handle wraps a Tokio oneshot receiver. Awaiting it yields the value
/// the scheduler resolved the request with, or [`GatewayError::Cancelled`]
/// when the sending side was dropped without ever resolving (for example
/// because the gateway shut down mid-flight).
///
/// Dropping an unawaited handle is the caller-side cancellation path: the
/// scheduler's later attempt to resolve it is a checked no-op.
#[derive(Debug)]
pub struct ResultHandle<R> {
    receiver: oneshot::Receiver<Result<R>>,
}

impl<R> ResultHandle<R> {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<R>>) -> Self {
        Self { receiver }
    }
}

impl<R> Future for ResultHandle<R> {
    type Output = Result<R>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().receiver).poll(cx) {
            Poll::Ready(Ok(resolved)) => Poll::Ready(resolved),
            Poll::Ready(Err(_)) => Poll::Ready(Err(GatewayError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_with_sent_value() {
        let (tx, rx) = oneshot::channel();
        let handle: ResultHandle<u32> = ResultHandle::new(rx);
        tx.send(Ok(7)).unwrap();
        assert_eq!(handle.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn propagates_resolved_failure() {
        let (tx, rx) = oneshot::channel();
        let handle: ResultHandle<u32> = ResultHandle::new(rx);
        tx.send(Err(GatewayError::compute("boom"))).unwrap();
        assert_eq!(handle.await, Err(GatewayError::Compute("boom".into())));
    }

    #[tokio::test]
    async fn dropped_sender_surfaces_as_cancelled() {
        let (tx, rx) = oneshot::channel::<Result<u32>>();
        let handle = ResultHandle::new(rx);
        drop(tx);
        assert_eq!(handle.await, Err(GatewayError::Cancelled));
    }
}
