use axum::{routing::get, Router};

use api::state::AppState;

pub fn build_app(state: AppState) -> Router {
    api::app_with_state(state).route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
