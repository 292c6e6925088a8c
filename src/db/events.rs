//! Store change feed
//!
//! Repositories publish an event on a process-wide broadcast channel after
//! every successful create. Subscription resolvers turn a receiver into a
//! filtered stream; dropping the stream drops the receiver, which releases
//! the underlying subscription immediately.

use tokio::sync::broadcast;

use super::links::LinkRecord;
use super::votes::VoteRecord;

/// Capacity of the change-feed channel. A subscriber that falls more than
/// this far behind skips events instead of blocking writers.
const CHANGE_FEED_CAPACITY: usize = 256;

/// A create notification from the store
#[derive(Debug, Clone)]
pub enum StoreEvent {
    LinkCreated(LinkRecord),
    VoteCreated(VoteRecord),
}

/// Handle to the change-feed channel, cheap to clone
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { sender }
    }

    /// Publish a create event. A send error only means nobody is currently
    /// subscribed, which is not a failure.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    /// Open a new subscription to the change feed
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
