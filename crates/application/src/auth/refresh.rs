//! Single-flight coordination of token refreshes.
//!
//! The first caller to observe an expired token becomes the leader and
//! performs the refresh. Everyone arriving while it runs becomes a follower
//! and receives the leader's outcome through a oneshot channel.
//!
//! Settling resets the in-flight flag and takes the waiter queue under the
//! lock, then notifies waiters outside it. A caller arriving after settlement
//! therefore starts a fresh cycle instead of joining a finished one.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::ApiError;
use crate::ports::TransportError;

/// Result of a refresh: the new access token or the failure every waiter
/// receives.
pub type RefreshOutcome = Result<String, ApiError>;

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Owner of the refresh state: the in-flight flag and the waiter queue.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Role handed out by [`RefreshCoordinator::acquire`].
#[derive(Debug)]
pub enum Acquire<'a> {
    /// No refresh was running; the caller must perform it and settle the
    /// lease.
    Leader(RefreshLease<'a>),
    /// A refresh is running; await the receiver for its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Becomes the leader of a new refresh, or joins the running one.
    pub fn acquire(&self) -> Acquire<'_> {
        let mut state = self.state.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Acquire::Follower(rx)
        } else {
            state.in_flight = true;
            Acquire::Leader(RefreshLease {
                coordinator: self,
                settled: false,
            })
        }
    }

    /// Whether a refresh is currently running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Number of callers waiting on the running refresh.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            // A waiter whose caller went away has nobody to notify.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Proof of leadership over a running refresh.
///
/// Dropping a lease without settling it (the leader's future was cancelled)
/// rejects all waiters so none of them is left hanging.
#[derive(Debug)]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Ends the refresh and hands `outcome` to every waiter.
    pub fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.coordinator.settle(outcome);
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.settle(&Err(abandoned()));
        }
    }
}

/// Awaits a follower's receiver, treating a vanished leader as a failed
/// refresh.
pub(crate) async fn follow(receiver: oneshot::Receiver<RefreshOutcome>) -> RefreshOutcome {
    receiver.await.unwrap_or_else(|_| Err(abandoned()))
}

fn abandoned() -> ApiError {
    ApiError::RefreshFailed(Box::new(ApiError::Transport(TransportError::Other(
        "token refresh was abandoned".to_string(),
    ))))
}
