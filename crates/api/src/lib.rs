//! HTTP and WebSocket surface for the trading game: session lifecycle,
//! trades, the event stream, and the rankings board.

pub mod rankings;
pub mod routes;
pub mod state;
mod ws;

use axum::Router;

use crate::state::AppState;

pub fn app() -> Router {
    app_with_state(AppState::new())
}

pub fn app_with_state(state: AppState) -> Router {
    routes::router(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::app;

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_session_returns_created_with_location() {
        let app = app();

        let response = app
            .oneshot(json_request("POST", "/sessions", json!({ "asset": "coin" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/sessions/1"
        );
        let body = body_json(response.into_body()).await;
        assert_eq!(body["session_id"], 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/sessions/404")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn buy_executes_on_a_fresh_session() {
        let app = app();

        let created = app
            .clone()
            .oneshot(json_request("POST", "/sessions", json!({ "asset": "stock" })))
            .await
            .unwrap();
        let session_id = body_json(created.into_body()).await["session_id"]
            .as_u64()
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/sessions/{session_id}/buy"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        // The starting capital always covers at least one unit at the start
        // price, so a first buy on a fresh session cannot be a no-op.
        assert_eq!(body["executed"], true);
        assert!(body["holdings"].as_u64().unwrap() >= 1);
        assert_eq!(body["trade"]["side"], "buy");
    }

    #[tokio::test]
    async fn ending_a_session_returns_the_settlement() {
        let app = app();

        let created = app
            .clone()
            .oneshot(json_request("POST", "/sessions", json!({ "asset": "coin" })))
            .await
            .unwrap();
        let session_id = body_json(created.into_body()).await["session_id"]
            .as_u64()
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/sessions/{session_id}/end"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert!(body["final_value"].as_u64().is_some());
        assert!(body["return_rate"].as_f64().is_some());
    }

    #[tokio::test]
    async fn abandoned_session_disappears() {
        let app = app();

        let created = app
            .clone()
            .oneshot(json_request("POST", "/sessions", json!({ "asset": "coin" })))
            .await
            .unwrap();
        let session_id = body_json(created.into_body()).await["session_id"]
            .as_u64()
            .unwrap();

        let deleted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/sessions/{session_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let lookup = app
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{session_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_ranking_is_rejected_with_a_message() {
        let app = app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/rankings",
                json!({ "name": "   ", "return_rate": 5.0, "final_value": 10500000.0 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn rankings_round_trip() {
        let app = app();

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/rankings",
                json!({ "name": "anna", "return_rate": 12.5, "final_value": 11250000.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::OK);

        let listed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/rankings?limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(listed.into_body()).await;
        assert_eq!(body[0]["name"], "anna");
        assert_eq!(body[0]["final_value"], 11_250_000);

        let cleared = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/rankings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(cleared.status(), StatusCode::OK);

        let empty = app
            .oneshot(
                Request::builder()
                    .uri("/rankings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(empty.into_body()).await;
        assert_eq!(body.as_array().unwrap().len(), 0);
    }
}
