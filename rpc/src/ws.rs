//! Admin live feed over WebSocket.
//!
//! Each connection subscribes to the [`AdminFeed`](evote_audit::AdminFeed)
//! broadcast and forwards vote notifications as JSON text frames. A client
//! that falls behind the broadcast buffer is disconnected; others are
//! unaffected.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use evote_audit::FeedMessage;
use evote_types::{Capability, Permission};

use crate::auth::AuthContext;
use crate::error::RpcError;
use crate::state::AppState;

pub async fn admin_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Response, RpcError> {
    auth.require(Capability::Permission(Permission::ViewResults))?;
    let feed = state
        .feed
        .as_ref()
        .ok_or_else(|| RpcError::NotFound("admin feed is disabled".to_string()))?;
    let rx = feed.subscribe();
    let subject = auth.subject;
    Ok(ws.on_upgrade(move |socket| forward_feed(socket, rx, subject)))
}

async fn forward_feed(socket: WebSocket, mut rx: broadcast::Receiver<FeedMessage>, subject: u64) {
    let (mut sender, mut receiver) = socket.split();
    debug!(subject, "admin feed client connected");

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Ok(message) => {
                    let text = match serde_json::to_string(&message) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "failed to encode feed message");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(subject, skipped, "admin feed client lagging, disconnecting");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    debug!(subject, "admin feed client disconnected");
}
