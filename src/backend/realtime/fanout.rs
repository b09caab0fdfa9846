//! Cross-Process Fanout Bus
//!
//! Horizontally-scaled gateway instances share one publish/subscribe bus:
//! after a message is persisted, the handling instance publishes a frame
//! scoped to the room, and every instance subscribed to the bus delivers it
//! to its locally-attached room members.
//!
//! `FanoutBus` is the seam for a real broker; `LocalFanoutBus` is the
//! in-process implementation backed by `tokio::sync::broadcast`, used by
//! single-node deployments and the test suite. Delivery is at-least-once:
//! a bus restart can drop frames, and clients recover through the paginated
//! history query, which is the source of truth.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::error::ChatError;
use crate::shared::message::Message;

/// Default broadcast channel capacity
pub const DEFAULT_FANOUT_CAPACITY: usize = 1024;

/// One persisted message published to a room's fanout channel
///
/// `origin` identifies the gateway instance that handled the send, so
/// instances can skip frames they already delivered locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FanoutFrame {
    pub origin: Uuid,
    pub room: Uuid,
    pub message: Message,
}

/// Publish/subscribe seam between gateway instances
#[async_trait]
pub trait FanoutBus: Send + Sync {
    /// Publish a frame; returns the number of subscribed instances reached
    async fn publish(&self, frame: FanoutFrame) -> Result<usize, ChatError>;

    /// Subscribe to all frames published after this call
    fn subscribe(&self) -> broadcast::Receiver<FanoutFrame>;
}

/// In-process fanout bus backed by a tokio broadcast channel
pub struct LocalFanoutBus {
    tx: broadcast::Sender<FanoutFrame>,
}

impl LocalFanoutBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for LocalFanoutBus {
    fn default() -> Self {
        Self::new(DEFAULT_FANOUT_CAPACITY)
    }
}

#[async_trait]
impl FanoutBus for LocalFanoutBus {
    async fn publish(&self, frame: FanoutFrame) -> Result<usize, ChatError> {
        match self.tx.send(frame) {
            Ok(subscriber_count) => Ok(subscriber_count),
            // No subscribers, that's okay
            Err(_) => Ok(0),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<FanoutFrame> {
        self.tx.subscribe()
    }
}
