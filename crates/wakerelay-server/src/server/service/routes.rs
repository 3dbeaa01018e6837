//! HTTP routes for the broker.
//!
//! A claim that finds nothing is answered with `204 No Content`; the worker
//! polls constantly, so this is the common case and is never reported as an
//! error.

use super::handler::BrokerService;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use wakerelay::{Claim, HealthResponse, RegisterRequest};

/// Builds the broker router over `service`.
pub fn router(service: BrokerService) -> Router {
    Router::new()
        .route("/id", post(register))
        .route("/id/{id}", get(claim))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(service)
}

async fn register(
    State(service): State<BrokerService>,
    Json(request): Json<RegisterRequest>,
) -> StatusCode {
    service.register(request.id, request.mac);
    StatusCode::CREATED
}

async fn claim(State(service): State<BrokerService>, Path(id): Path<String>) -> Response {
    match service.claim(&id) {
        Claim::Found(payload) => (StatusCode::CREATED, payload).into_response(),
        Claim::NotFound => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn health(State(service): State<BrokerService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "serving".to_string(),
        pending: service.pending(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use tower::ServiceExt;

    fn post_id(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/id")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn register_then_claim_then_empty() {
        let app = router(BrokerService::default());

        let response = app
            .clone()
            .oneshot(post_id(r#"{"id":"A","mac":"DE:AD:BE:EF:00:01"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.clone().oneshot(get("/id/A")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_text(response).await, "DE:AD:BE:EF:00:01");

        let response = app.oneshot(get("/id/A")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn claim_unknown_id_is_no_content() {
        let app = router(BrokerService::default());
        let response = app.oneshot(get("/id/nobody")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn id_may_be_a_hardware_address() {
        let app = router(BrokerService::default());
        app.clone()
            .oneshot(post_id(
                r#"{"id":"AA:BB:CC:DD:EE:FF","mac":"01:23:45:67:89:AB"}"#,
            ))
            .await
            .unwrap();

        let response = app.oneshot(get("/id/AA:BB:CC:DD:EE:FF")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_text(response).await, "01:23:45:67:89:AB");
    }

    #[tokio::test]
    async fn payload_is_relayed_unvalidated() {
        let app = router(BrokerService::default());
        app.clone()
            .oneshot(post_id(r#"{"id":"A","mac":"not a mac"}"#))
            .await
            .unwrap();

        let response = app.oneshot(get("/id/A")).await.unwrap();
        assert_eq!(body_text(response).await, "not a mac");
    }

    #[tokio::test]
    async fn malformed_registration_is_rejected() {
        let service = BrokerService::default();
        let app = router(service.clone());
        let response = app.oneshot(post_id(r#"{"id":"A"}"#)).await.unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(service.pending(), 0);
    }

    #[tokio::test]
    async fn health_reports_pending_count() {
        let service = BrokerService::default();
        service.register("A".to_string(), "x".to_string());
        let app = router(service);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health.pending, 1);
        assert_eq!(health.status, "serving");
    }

    #[tokio::test]
    async fn concurrent_claims_deliver_once() {
        let service = BrokerService::default();
        service.register("A".to_string(), "DE:AD:BE:EF:00:01".to_string());
        let app = router(service);

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { app.oneshot(get("/id/A")).await.unwrap().status() })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap() == StatusCode::CREATED {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
