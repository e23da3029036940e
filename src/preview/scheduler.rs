//! Refresh Scheduling
//!
//! Decides when a requested preview refresh actually runs. Under the
//! debounced policy every request cancels the outstanding timer and starts
//! a new one, so a burst of edits produces a single refresh once the quiet
//! window has elapsed.
//!
//! The timer task owns nothing but a channel sender: when it fires it sends
//! a [`RefreshTicket`] to the event loop, which hands it back to
//! [`RefreshScheduler::claim`]. Only the most recent ticket is honoured.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// How often the preview is recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Recompute on every request
    Immediate,
    /// Recompute once a burst of requests has been quiet for the window
    Debounced(Duration),
}

impl RefreshPolicy {
    /// A zero window means no debouncing
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            RefreshPolicy::Immediate
        } else {
            RefreshPolicy::Debounced(Duration::from_millis(millis))
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        RefreshPolicy::Debounced(DEFAULT_DEBOUNCE)
    }
}

/// Proof that a scheduled refresh fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Outcome of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// The caller should refresh right away
    Now,
    /// A timer was started; its ticket arrives on the channel
    Deferred(RefreshTicket),
}

/// Single-slot cancellable refresh timer
#[derive(Debug)]
pub struct RefreshScheduler {
    policy: RefreshPolicy,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<RefreshTicket>,
}

impl RefreshScheduler {
    /// Create a scheduler and the receiver its tickets are delivered on
    pub fn new(policy: RefreshPolicy) -> (Self, mpsc::UnboundedReceiver<RefreshTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            policy,
            generation: 0,
            pending: None,
            tx,
        };
        (scheduler, rx)
    }

    /// Request a refresh according to the policy.
    ///
    /// Any pending timer is cancelled first. Debounced scheduling spawns a
    /// tokio task and must be called from within a runtime.
    pub fn schedule(&mut self) -> Schedule {
        self.cancel();

        match self.policy {
            RefreshPolicy::Immediate => Schedule::Now,
            RefreshPolicy::Debounced(window) => {
                let ticket = RefreshTicket(self.generation);
                let tx = self.tx.clone();
                self.pending = Some(tokio::spawn(async move {
                    tokio::time::sleep(window).await;
                    // The receiver is gone once the session shut down
                    let _ = tx.send(ticket);
                }));
                Schedule::Deferred(ticket)
            }
        }
    }

    /// Cancel any pending timer and ask for an immediate refresh
    pub fn schedule_now(&mut self) -> Schedule {
        self.cancel();
        Schedule::Now
    }

    /// Cancel the pending timer, if any. Tickets issued before this call
    /// are no longer claimable.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Accept a fired ticket. Returns `true` when it belongs to the latest
    /// scheduled timer, in which case the refresh should run now.
    pub fn claim(&mut self, ticket: RefreshTicket) -> bool {
        if self.pending.is_none() || ticket.0 != self.generation {
            log::trace!("Ignoring stale refresh ticket {:?}", ticket);
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
