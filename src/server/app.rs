use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::api_routes;
use crate::config::CorsConfig;

use super::AppState;

/// Cross-origin policy: explicit origin allow-list, JSON content type only.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.cors);

    Router::new()
        .merge(api_routes(&state))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tokio::sync::watch;
    use tower::ServiceExt;

    use crate::config::{DatabaseConfig, Settings};
    use crate::domain::message::MessageStore;
    use crate::postgres::{PostgresPool, SchemaStatus};

    /// App wired to a pool that can never connect.
    fn test_app(status: SchemaStatus, gate_until_ready: bool) -> Router {
        let mut settings = Settings::default();
        settings.server.gate_until_ready = gate_until_ready;
        settings.database = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            acquire_timeout_seconds: 1,
            ..DatabaseConfig::default()
        };

        let pool = PostgresPool::new(&settings.database).unwrap();
        let (_tx, rx) = watch::channel(status);
        let messages = MessageStore::new(pool.pool().clone());
        create_app(AppState::new(settings, messages, rx))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_info_without_origin() {
        let app = test_app(SchemaStatus::Pending, true);

        let response = app
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["client"], "unknown");
        assert_eq!(body["message"], "Hello from Backend with PostgreSQL!");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_info_echoes_origin() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api")
                    .header("origin", "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8080"
        );
        let body = json_body(response).await;
        assert_eq!(body["client"], "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_messages_gated_while_pending() {
        let app = test_app(SchemaStatus::Pending, true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Database is initializing");
    }

    #[tokio::test]
    async fn test_create_requires_content() {
        let app = test_app(SchemaStatus::Ready, true);

        for payload in [
            r#"{}"#,
            r#"{"content": ""}"#,
            r#"{"content": null}"#,
            r#"{"content": 0}"#,
            r#"[1, 2]"#,
            r#"["hi"]"#,
            r#""hi""#,
            "",
        ] {
            let response = app.clone().oneshot(post_json(payload)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);
            let body = json_body(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Content is required");
        }
    }

    #[tokio::test]
    async fn test_create_with_empty_json_body() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/messages")
                    .header("content-type", "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn test_create_without_json_content_type() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/messages")
                    .body(Body::from("content=hi"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Content is required");
    }

    #[tokio::test]
    async fn test_create_with_malformed_json() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app.oneshot(post_json(r#"{"content": "#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_reports_storage_failure() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app.oneshot(post_json(r#"{"content": "hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_ungated_reaches_storage() {
        let app = test_app(SchemaStatus::Pending, false);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/messages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_health_reports_disconnected() {
        let app = test_app(SchemaStatus::Pending, true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["database"], "disconnected");
        assert!(body["error"].is_string());
        assert!(body.get("timestamp").is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/messages")
                    .header("origin", "https://anisbaa.github.io")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "https://anisbaa.github.io"
        );
        let methods = headers
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("DELETE"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api")
                    .header("origin", "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_app(SchemaStatus::Ready, true);

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
