//! Socket Gateway
//!
//! Accepts real-time WebSocket connections, authenticates them, maps them
//! into chat rooms, and moves messages: membership check through the chat
//! directory, persist through the message store, then fanout.
//!
//! Per-connection state machine:
//! `Connecting -> Authenticated -> {Idle, InRoom(s)} -> Disconnected`.
//!
//! Design decisions the rest of the flow hangs on:
//!
//! - Authentication happens at upgrade time and is terminal on failure; a
//!   rejected connection is never retried in place.
//! - `join` is cheap and advisory; membership is authoritatively enforced
//!   at `message:send` time via `ChatDirectory::get_by_id`.
//! - Persist precedes broadcast. A message that reaches any client is
//!   durable; a store failure aborts the send with an error ack and nothing
//!   is broadcast.
//! - A disconnect mid-send never rolls back a completed persist.
//! - Concurrent sends to the same room are not serialized; whichever
//!   persist completes first is broadcast first.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::auth::revocation::is_revoked_fail_open;
use crate::backend::auth::sessions::verify_token;
use crate::backend::realtime::fanout::FanoutFrame;
use crate::backend::realtime::rooms::ConnectionId;
use crate::backend::server::state::AppState;
use crate::shared::chat::ChatType;
use crate::shared::error::ChatError;
use crate::shared::event::{ClientEvent, MessageAck, SendMessage, ServerEvent};
use crate::shared::message::{Message, NewMessage};

/// Query-string portion of the connection handshake
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Handshake auth payload, highest priority
    pub auth: Option<String>,
    /// Plain query-parameter token
    pub token: Option<String>,
}

/// Extract the bearer token from the handshake
///
/// Priority order: handshake auth payload, then the `token` query
/// parameter, then the `Authorization` header.
pub fn extract_token(params: &ConnectParams, headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = &params.auth {
        return Some(auth.clone());
    }
    if let Some(token) = &params.token {
        return Some(token.clone());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Handle `GET /ws`
///
/// Authenticates the handshake and upgrades the connection. Failure here is
/// terminal for the connection: the client must reconnect with a valid
/// token.
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ChatError> {
    let token = extract_token(&params, &headers)
        .ok_or_else(|| ChatError::authentication("missing bearer token"))?;

    let claims = verify_token(&token)?;
    if is_revoked_fail_open(state.revocation.as_ref(), &token).await {
        return Err(ChatError::authentication("token has been revoked"));
    }
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ChatError::authentication("invalid user id in token"))?;

    Ok(ws.on_upgrade(move |socket| run_connection(state, socket, user_id)))
}

/// Drive one authenticated connection until it disconnects
async fn run_connection(state: AppState, socket: WebSocket, user_id: Uuid) {
    let connection_id: ConnectionId = Uuid::new_v4();
    tracing::info!(
        "[Gateway] Connection {} established for user {}",
        connection_id,
        user_id
    );

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: everything addressed to this connection funnels through
    // one channel, so room delivery never touches the socket directly.
    tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Gateway] Failed to serialize outbound event: {}", e);
                    continue;
                }
            };
            if ws_tx.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(incoming) = ws_rx.next().await {
        let frame = match incoming {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("[Gateway] Connection {} read error: {}", connection_id, e);
                break;
            }
        };

        handle_frame(&state, user_id, connection_id, &outbound_tx, &frame).await;
    }

    // Disconnect releases room memberships only; nothing persisted changes.
    state.rooms.leave_all(connection_id);
    tracing::info!("[Gateway] Connection {} closed", connection_id);
}

/// Parse and dispatch one raw text frame
///
/// A frame that fails to deserialize is answered with an error ack when its
/// raw JSON still carries a `temp_id`; without one there is nothing to
/// correlate the failure to and the frame is only logged.
pub async fn handle_frame(
    state: &AppState,
    user_id: Uuid,
    connection_id: ConnectionId,
    outbound: &mpsc::UnboundedSender<ServerEvent>,
    raw: &str,
) {
    match serde_json::from_str::<ClientEvent>(raw) {
        Ok(event) => {
            handle_event(state, user_id, connection_id, outbound, event).await;
        }
        Err(e) => {
            let error = ChatError::from(e);
            tracing::warn!(
                "[Gateway] Connection {} sent a malformed frame: {}",
                connection_id,
                error
            );
            if let Some(temp_id) = extract_temp_id(raw) {
                let _ = outbound.send(ServerEvent::Ack(MessageAck::rejected(
                    temp_id,
                    error.to_string(),
                )));
            }
        }
    }
}

/// Recover the correlation id from a frame that failed to deserialize
fn extract_temp_id(raw: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()?
        .get("temp_id")?
        .as_str()
        .map(str::to_string)
}

/// Dispatch one parsed client frame
pub async fn handle_event(
    state: &AppState,
    user_id: Uuid,
    connection_id: ConnectionId,
    outbound: &mpsc::UnboundedSender<ServerEvent>,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Join { room } => {
            state.rooms.join(room, connection_id, outbound.clone());
            tracing::debug!(
                "[Gateway] Connection {} joined room {} ({} local)",
                connection_id,
                room,
                state.rooms.occupancy(room)
            );
        }
        ClientEvent::Leave { room } => {
            state.rooms.leave(room, connection_id);
            tracing::debug!(
                "[Gateway] Connection {} left room {} ({} local)",
                connection_id,
                room,
                state.rooms.occupancy(room)
            );
        }
        ClientEvent::Send(frame) => {
            handle_send(state, user_id, connection_id, outbound, frame).await;
        }
    }
}

/// Process one `message:send` and always answer with exactly one ack
pub async fn handle_send(
    state: &AppState,
    user_id: Uuid,
    origin: ConnectionId,
    outbound: &mpsc::UnboundedSender<ServerEvent>,
    frame: SendMessage,
) {
    let temp_id = frame.temp_id.clone();
    let ack = match accept_send(state, user_id, frame).await {
        Ok(message) => {
            broadcast_message(state, Some(origin), &message).await;
            MessageAck::accepted(temp_id, message)
        }
        Err(e) => {
            tracing::debug!("[Gateway] Send rejected for user {}: {}", user_id, e);
            MessageAck::rejected(temp_id, e.to_string())
        }
    };
    // A closed outbound channel means the sender is already gone; the
    // persisted message stays durable regardless.
    let _ = outbound.send(ServerEvent::Ack(ack));
}

/// Validate, authorize, and persist one send
///
/// Persistence is the last step; on any failure nothing has been broadcast
/// and nothing will be.
async fn accept_send(
    state: &AppState,
    user_id: Uuid,
    frame: SendMessage,
) -> Result<Message, ChatError> {
    let room = frame
        .room
        .ok_or_else(|| ChatError::validation("room", "room is required"))?;

    // Authoritative membership gate: existence and participant check in one.
    let chat = state.directory.get_by_id(room, user_id).await?;

    // Direct chats address the peer explicitly.
    let to = match chat.chat_type {
        ChatType::Direct => chat
            .participants
            .iter()
            .map(|p| p.user_id)
            .find(|&id| id != user_id),
        _ => None,
    };

    let input = NewMessage {
        chat_id: room,
        from: user_id,
        to,
        text: frame.content,
        attachments: frame.attachments,
        message_type: frame.message_type.unwrap_or_default(),
    };
    input.validate()?;

    state.messages.create(input).await
}

/// Deliver a persisted message locally and publish it to the fanout bus
///
/// Local delivery skips the originating connection (it receives the ack
/// instead). A publish failure is logged and does not block the ack: the
/// message is durable and readable through the history query.
pub async fn broadcast_message(state: &AppState, origin: Option<ConnectionId>, message: &Message) {
    let room = message.chat_id;
    let delivered = state.rooms.deliver_except(
        room,
        origin,
        &ServerEvent::MessageNew {
            message: message.clone(),
        },
    );
    tracing::debug!(
        "[Gateway] Message {} delivered to {} local connections in room {}",
        message.id,
        delivered,
        room
    );

    let frame = FanoutFrame {
        origin: state.instance_id,
        room,
        message: message.clone(),
    };
    if let Err(e) = state.fanout.publish(frame).await {
        tracing::warn!(
            "[Gateway] Fanout publish failed for room {}: {} (clients recover via history)",
            room,
            e
        );
    }
}

/// Subscribe this process to the fanout bus and deliver remote frames
///
/// Frames originating from this instance are skipped; their local delivery
/// already happened on the send path. Lagging is logged and skipped frames
/// are recovered by clients through the history query.
pub fn spawn_fanout_pump(state: AppState) -> JoinHandle<()> {
    let mut rx = state.fanout.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(frame) => {
                    if frame.origin == state.instance_id {
                        continue;
                    }
                    let delivered = state.rooms.deliver(
                        frame.room,
                        &ServerEvent::MessageNew {
                            message: frame.message,
                        },
                    );
                    tracing::debug!(
                        "[Fanout] Remote frame delivered to {} local connections in room {}",
                        delivered,
                        frame.room
                    );
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Fanout] Pump lagged, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("[Fanout] Bus closed, pump stopping");
                    break;
                }
            }
        }
    })
}
