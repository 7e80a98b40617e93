// Timing collaborator: cancellable one-shot timeouts plus a deferred
// continuation that runs at the host's next visual-update opportunity.

use std::time::Duration;

/// Opaque handle for a pending timeout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerId(pub u64);

pub trait Scheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timeout. Unknown or already-fired handles are a
    /// no-op.
    fn clear_timeout(&self, id: TimerId);

    /// Queue `callback` for the next rendering opportunity. Callbacks run
    /// FIFO-by-registration, coalesced per frame by the host.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}
