//! HTTP gateway for hashgate.
//!
//! Stores and serves blobs in a single object-store bucket, keyed by the
//! hash of their content. Every route except the liveness check requires
//! the shared secret in the `key` header.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AccessGate, SECRET_HEADER};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::HashgateServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use hashgate_store::{InMemoryObjectStore, ObjectStore, StoreError, StoreResult};
    use hashgate_store::{ObjectMeta, StoredObject};
    use hashgate_types::ObjectKey;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    const SECRET: &str = "s3cret";
    const HELLO_B64_KEY: &str =
        "333d6b3a3c1f5db6c9bdda5939b136986d170f4649172a68368d54ecb44c2ff2.txt";

    fn app_with(backend: Arc<dyn ObjectStore>) -> Router {
        let config = ServerConfig {
            bucket: "blobs".into(),
            secret_key: SECRET.into(),
            ..Default::default()
        };
        HashgateServer::new(config, backend).unwrap().router()
    }

    fn app() -> (Arc<InMemoryObjectStore>, Router) {
        let backend = Arc::new(InMemoryObjectStore::new());
        let app = app_with(backend.clone());
        (backend, app)
    }

    fn get(uri: &str, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post(body: &str, secret: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/post-object")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(secret) = secret {
            builder = builder.header(SECRET_HEADER, secret);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    const HELLO_BODY: &str = r#"{"data_base64": "aGVsbG8=", "ext": "txt"}"#;

    #[tokio::test]
    async fn home_is_open() {
        let (_, app) = app();
        let response = app.oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], handler::LIVENESS_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn post_creates_then_reports_exists() {
        let (backend, app) = app();

        let (status, body) = send(&app, post(HELLO_BODY, Some(SECRET))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "created", "data": HELLO_B64_KEY}));

        let (status, body) = send(&app, post(HELLO_BODY, Some(SECRET))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "exists", "data": HELLO_B64_KEY}));

        assert_eq!(backend.len(), 1);
        let meta = backend
            .head_object("blobs", &ObjectKey::parse(HELLO_B64_KEY).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn get_returns_posted_content() {
        let (_, app) = app();
        send(&app, post(HELLO_BODY, Some(SECRET))).await;

        let uri = format!("/get-object/{HELLO_B64_KEY}");
        let (status, body) = send(&app, get(&uri, Some(SECRET))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"content": "aGVsbG8="}));
    }

    #[tokio::test]
    async fn get_unknown_key_is_404() {
        let (_, app) = app();
        let (status, body) = send(&app, get("/get-object/doesnotexist.txt", Some(SECRET))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("doesnotexist.txt"));
    }

    #[tokio::test]
    async fn get_without_id_is_400() {
        let (_, app) = app();
        for uri in ["/get-object", "/get-object/"] {
            let (status, _) = send(&app, get(uri, Some(SECRET))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn protected_routes_require_secret() {
        let (backend, app) = app();
        for secret in [None, Some("wrong"), Some("")] {
            let (status, body) = send(&app, post(HELLO_BODY, secret)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body, json!({"error": "Invalid secret key"}));

            let (status, _) = send(&app, get("/get-object/doesnotexist.txt", secret)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);

            let (status, _) = send(&app, get("/get-object/", secret)).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn auth_runs_before_validation() {
        let (_, app) = app();
        let (status, _) = send(&app, post("garbage", None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn post_validation_errors() {
        let (backend, app) = app();

        let (status, body) = send(&app, post("", Some(SECRET))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "No JSON data provided"}));

        let (status, body) = send(&app, post(r#"{"ext": "txt"}"#, Some(SECRET))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required fields"}));

        let (status, _) = send(&app, post(r#"{"data_base64": "x", "ext": ""}"#, Some(SECRET))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn post_accepts_bodies_past_default_limit() {
        let (backend, app) = app();
        let body = json!({"data_base64": "A".repeat(3 * 1024 * 1024), "ext": "txt"}).to_string();

        let (status, body) = send(&app, post(&body, Some(SECRET))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "created");
        assert_eq!(backend.total_bytes(), 3 * 1024 * 1024);
    }

    #[tokio::test]
    async fn extension_changes_key_not_digest() {
        let (backend, app) = app();
        let (_, txt) = send(&app, post(HELLO_BODY, Some(SECRET))).await;
        let (_, md) = send(&app, post(r#"{"data_base64": "aGVsbG8=", "ext": "md"}"#, Some(SECRET))).await;
        assert_eq!(md["status"], "created");
        assert_ne!(txt["data"], md["data"]);
        assert_eq!(backend.len(), 2);
    }

    /// Backend whose every call fails.
    struct Unreachable;

    #[async_trait::async_trait]
    impl ObjectStore for Unreachable {
        async fn head_object(&self, _: &str, _: &ObjectKey) -> StoreResult<Option<ObjectMeta>> {
            Err(StoreError::Backend("connection refused".into()))
        }

        async fn get_object(&self, _: &str, _: &ObjectKey) -> StoreResult<Option<StoredObject>> {
            Err(StoreError::Backend("connection refused".into()))
        }

        async fn put_object(&self, _: &str, _: &StoredObject) -> StoreResult<()> {
            Err(StoreError::Backend("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn backend_failure_is_500_with_message() {
        let app = app_with(Arc::new(Unreachable));

        let (status, body) = send(&app, post(HELLO_BODY, Some(SECRET))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "connection refused"}));

        let (status, _) = send(&app, get("/get-object/a.txt", Some(SECRET))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Backend that never answers in time.
    struct Stalled;

    #[async_trait::async_trait]
    impl ObjectStore for Stalled {
        async fn head_object(&self, _: &str, _: &ObjectKey) -> StoreResult<Option<ObjectMeta>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(None)
        }

        async fn get_object(&self, _: &str, _: &ObjectKey) -> StoreResult<Option<StoredObject>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(None)
        }

        async fn put_object(&self, _: &str, _: &StoredObject) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn slow_request_times_out_with_json_error() {
        let config = ServerConfig {
            bucket: "blobs".into(),
            secret_key: SECRET.into(),
            ..Default::default()
        };
        let server = HashgateServer::new(config, Arc::new(Stalled)).unwrap();
        let app = router::with_limits(
            router::build_router(server.state().clone()),
            4,
            Duration::from_millis(50),
        );

        let (status, body) = send(&app, post(HELLO_BODY, Some(SECRET))).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body, json!({"error": "request timed out"}));

        let (status, body) = send(&app, get("/get-object/a.txt", Some(SECRET))).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error"], "request timed out");
    }

    #[tokio::test]
    async fn binary_object_read_is_500() {
        let (backend, app) = app();
        let key = ObjectKey::parse("raw.bin").unwrap();
        backend
            .put_object("blobs", &StoredObject::new(key, vec![0xffu8, 0xfe], "application/octet-stream"))
            .await
            .unwrap();
        let (status, _) = send(&app, get("/get-object/raw.bin", Some(SECRET))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
