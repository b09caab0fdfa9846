//! Room Table
//!
//! Maps chat ids to the connections attached to this process. This is the
//! only in-process mutable shared structure in the gateway; it supports
//! concurrent add/remove/iterate, and delivery always enumerates a snapshot
//! of senders so the lock is never held across a send.
//!
//! Connections on other server instances are reached through the fanout
//! bus, not this table.

use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::event::ServerEvent;

/// Gateway-local identifier for one physical connection
pub type ConnectionId = Uuid;

type RoomMembers = HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>;

/// `chat id -> locally attached connections`
#[derive(Default)]
pub struct RoomTable {
    rooms: Mutex<HashMap<Uuid, RoomMembers>>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a room; re-joining replaces the sender
    pub fn join(
        &self,
        room: Uuid,
        connection: ConnectionId,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) {
        let mut rooms = self.rooms.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rooms.entry(room).or_default().insert(connection, sender);
    }

    /// Unsubscribe a connection from a room; no-op when not joined
    pub fn leave(&self, room: Uuid, connection: ConnectionId) {
        let mut rooms = self.rooms.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(members) = rooms.get_mut(&room) {
            members.remove(&connection);
            if members.is_empty() {
                rooms.remove(&room);
            }
        }
    }

    /// Release every room membership held by a connection
    pub fn leave_all(&self, connection: ConnectionId) {
        let mut rooms = self.rooms.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rooms.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }

    /// Number of local connections in a room
    pub fn occupancy(&self, room: Uuid) -> usize {
        self.rooms
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&room)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Deliver an event to every local member of a room
    ///
    /// Enumerates a snapshot and sends outside the critical section.
    /// Returns the number of successful deliveries; failures mean the
    /// receiving connection is tearing down and are logged, not propagated.
    pub fn deliver(&self, room: Uuid, event: &ServerEvent) -> usize {
        self.deliver_except(room, None, event)
    }

    /// Deliver to every local member except one connection (the sender,
    /// which gets an ack instead of the broadcast)
    pub fn deliver_except(
        &self,
        room: Uuid,
        skip: Option<ConnectionId>,
        event: &ServerEvent,
    ) -> usize {
        let targets: Vec<(ConnectionId, mpsc::UnboundedSender<ServerEvent>)> = {
            let rooms = self.rooms.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            match rooms.get(&room) {
                Some(members) => members
                    .iter()
                    .filter(|(id, _)| Some(**id) != skip)
                    .map(|(id, tx)| (*id, tx.clone()))
                    .collect(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        for (connection, tx) in targets {
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(
                    "[Rooms] Dropping event for closed connection {} in room {}",
                    connection,
                    room
                );
            }
        }
        delivered
    }
}
