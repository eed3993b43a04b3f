use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use game_core::{AssetKind, Settlement, TradeExecution};
use session::SessionSnapshot;

use crate::rankings::{NewRanking, Ranking};
use crate::{state::AppState, ws};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(session_snapshot).delete(abandon_session))
        .route("/sessions/:id/buy", post(buy))
        .route("/sessions/:id/sell", post(sell))
        .route("/sessions/:id/end", post(end_session))
        .route("/sessions/:id/freeze", post(freeze_session))
        .route(
            "/rankings",
            post(create_ranking).get(list_rankings).delete(clear_rankings),
        )
        .route("/ws/sessions/:id/events", get(ws::session_events_socket))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    asset: AssetKind,
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    session_id: u64,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.into(),
        }),
    )
        .into_response()
}

async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let (session_id, _session) = state
        .create_session(request.asset)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let location = format!("/sessions/{session_id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateSessionResponse { session_id }),
    ))
}

async fn session_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SessionSnapshot>, StatusCode> {
    state
        .session(session_id)
        .map(|session| Json(session.snapshot()))
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Serialize)]
struct TradeResponse {
    executed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    trade: Option<TradeExecution>,
    cash: u64,
    holdings: u64,
    price: u64,
}

async fn buy(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<TradeResponse>, StatusCode> {
    trade_response(&state, session_id, |session| session.buy())
}

async fn sell(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<TradeResponse>, StatusCode> {
    trade_response(&state, session_id, |session| session.sell())
}

fn trade_response(
    state: &AppState,
    session_id: u64,
    op: impl FnOnce(&session::GameSession) -> Option<TradeExecution>,
) -> Result<Json<TradeResponse>, StatusCode> {
    let session = state.session(session_id).ok_or(StatusCode::NOT_FOUND)?;
    let trade = op(&session);
    let snapshot = session.snapshot();

    Ok(Json(TradeResponse {
        executed: trade.is_some(),
        trade,
        cash: snapshot.cash,
        holdings: snapshot.holdings,
        price: snapshot.price,
    }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<Settlement>, StatusCode> {
    let session = state.session(session_id).ok_or(StatusCode::NOT_FOUND)?;
    session.end();
    // end() is idempotent; the settlement is present whether this call ended
    // the session or an earlier trigger did.
    session
        .settlement()
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Deserialize)]
struct FreezeRequest {
    frozen: bool,
}

async fn freeze_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
    Json(request): Json<FreezeRequest>,
) -> Result<StatusCode, StatusCode> {
    let session = state.session(session_id).ok_or(StatusCode::NOT_FOUND)?;
    session.set_frozen(request.frozen);
    Ok(StatusCode::NO_CONTENT)
}

async fn abandon_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let session = state
        .remove_session(session_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    // Abandonment must cancel every pending timer, like a natural end.
    session.end();
    Ok(StatusCode::NO_CONTENT)
}

async fn create_ranking(
    State(state): State<AppState>,
    Json(new): Json<NewRanking>,
) -> Response {
    match state.rankings().create(new) {
        Ok(ranking) => Json(ranking).into_response(),
        Err(err) => message_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct RankingsQuery {
    limit: Option<usize>,
}

async fn list_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> Json<Vec<Ranking>> {
    Json(state.rankings().list(query.limit))
}

async fn clear_rankings(State(state): State<AppState>) -> Response {
    state.rankings().clear();
    message_response(StatusCode::OK, "rankings cleared")
}
