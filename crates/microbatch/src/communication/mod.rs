//! Request/response plumbing between ingress and the scheduler.

mod handle;
mod pill;
mod request;

pub use handle::ResultHandle;
pub(crate) use pill::Pill;
pub use request::PendingRequest;
