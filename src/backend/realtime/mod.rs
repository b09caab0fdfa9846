//! Realtime Delivery
//!
//! The socket gateway and its two supporting structures: the room table
//! (chat id to locally-attached connections) and the fanout bus (the
//! cross-process publish/subscribe seam).

/// Cross-process fanout bus
pub mod fanout;

/// WebSocket gateway
pub mod gateway;

/// Local room membership table
pub mod rooms;

pub use fanout::{FanoutBus, FanoutFrame, LocalFanoutBus};
pub use gateway::{handle_socket_upgrade, spawn_fanout_pump};
pub use rooms::{ConnectionId, RoomTable};
