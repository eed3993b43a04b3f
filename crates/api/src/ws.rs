use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use session::{GameSession, SessionEvent};

use crate::state::AppState;

pub async fn session_events_socket(
    ws: WebSocketUpgrade,
    Path(session_id): Path<u64>,
    State(state): State<AppState>,
) -> Response {
    match state.session(session_id) {
        Some(session) => ws.on_upgrade(move |socket| stream_events(socket, session)),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stream_events(mut socket: WebSocket, session: GameSession) {
    let mut events = session.subscribe();

    if send_event(&mut socket, &SessionEvent::connected()).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return,
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut socket, &event).await.is_err() {
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
                }
            }
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &SessionEvent) -> Result<(), ()> {
    let payload = event_json(event)?;
    socket.send(Message::Text(payload)).await.map_err(|_| ())
}

fn event_json(event: &SessionEvent) -> Result<String, ()> {
    serde_json::to_string(event).map_err(|_| ())
}
