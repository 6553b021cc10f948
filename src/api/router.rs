use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::categorize;
use super::health;
use super::state::AppState;

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/categorize", post(categorize::categorize))
        .route("/api/health", get(health::health_check))
        .route("/api/status", get(health::status_check))
        .route("/live", get(health::live_check))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::LlmProvider;
    use crate::infrastructure::cache::ResponseCache;
    use crate::infrastructure::quota::{IpRateLimiter, QuotaTracker};
    use crate::infrastructure::services::CategorizationService;
    use crate::infrastructure::storage::InMemoryKeyValueStore;

    const API_KEY: &str = "AIzaSyA1234567890abcdefXYZ";
    const RESPONSE: &str = r#"```json
{"categorizedProducts":[{"name":"Leche","category":"Lácteos y Huevos"},{"name":"Pan","category":"Panadería"}]}
```"#;

    struct Harness {
        clock: Arc<ManualClock>,
        provider: Option<Arc<MockLlmProvider>>,
        router: Router,
    }

    fn harness_with(provider: Option<MockLlmProvider>, timeout: Duration) -> Harness {
        let clock = Arc::new(ManualClock::at(2026, 10, 18, 12, 0));
        let provider = provider.map(Arc::new);
        let quota = Arc::new(QuotaTracker::new(
            Arc::new(InMemoryKeyValueStore::new()),
            clock.clone(),
        ));
        let cache = Arc::new(ResponseCache::new(clock.clone()));
        let categorization = CategorizationService::new(
            provider.clone().map(|p| p as Arc<dyn LlmProvider>),
            quota,
            cache,
        )
        .with_timeout(timeout);

        let api_key = provider.as_ref().map(|_| API_KEY.to_string());
        let state = AppState::new(
            Arc::new(categorization),
            Arc::new(IpRateLimiter::new(clock.clone())),
            clock.clone(),
            api_key,
        );

        Harness {
            clock,
            provider,
            router: create_router(state),
        }
    }

    fn harness() -> Harness {
        harness_with(
            Some(MockLlmProvider::new("mock").with_text(RESPONSE)),
            Duration::from_secs(30),
        )
    }

    fn categorize_request(body: &str, ip: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/categorize")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(ip) = ip {
            builder = builder.header("x-forwarded-for", ip);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn products_body(names: &[&str]) -> String {
        let products: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
        json!({ "products": products }).to_string()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_categorize_success() {
        let h = harness();

        let (status, body) = send(
            &h.router,
            categorize_request(&products_body(&["Leche", "Pan"]), Some("1.1.1.1")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"categorizedProducts": [
                {"name": "Leche", "category": "Lácteos y Huevos"},
                {"name": "Pan", "category": "Panadería"}
            ]})
        );
    }

    #[tokio::test]
    async fn test_rate_limited_per_ip() {
        let h = harness();
        let body = products_body(&["Leche", "Pan"]);

        let (status, _) = send(&h.router, categorize_request(&body, Some("1.1.1.1"))).await;
        assert_eq!(status, StatusCode::OK);

        h.clock.advance(chrono::Duration::seconds(3));
        let response = h
            .router
            .clone()
            .oneshot(categorize_request(&body, Some("1.1.1.1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "7");

        let (status, body_json) =
            send(&h.router, categorize_request(&body, Some("1.1.1.1"))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json,
            json!({"error": "Demasiadas solicitudes. Espera 10 segundos."})
        );

        let (status, _) = send(&h.router, categorize_request(&body, Some("2.2.2.2"))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_daily_cap_per_ip() {
        let h = harness();

        for i in 0..15 {
            let name = format!("producto {}", i);
            let body = products_body(&[name.as_str()]);
            let (status, _) = send(&h.router, categorize_request(&body, None)).await;
            assert_eq!(status, StatusCode::OK);
            h.clock.advance(chrono::Duration::seconds(11));
        }

        let (status, body) =
            send(&h.router, categorize_request(&products_body(&["otro"]), None)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body,
            json!({"error": "Límite diario alcanzado (15 categorizaciones)"})
        );
    }

    #[tokio::test]
    async fn test_cache_hit_not_counted() {
        let h = harness();
        let body = products_body(&["Leche", "Pan"]);

        send(&h.router, categorize_request(&body, Some("1.1.1.1"))).await;
        h.clock.advance(chrono::Duration::seconds(11));
        let (status, _) = send(&h.router, categorize_request(&body, Some("1.1.1.1"))).await;
        assert_eq!(status, StatusCode::OK);

        // The cached answer did not restart the interval
        let (status, _) = send(&h.router, categorize_request(&body, Some("1.1.1.1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.provider.as_ref().unwrap().call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_bodies() {
        let h = harness();

        for body in ["not json", "{}", r#"{"products":"Leche"}"#, r#"{"products":null}"#] {
            let (status, json_body) = send(&h.router, categorize_request(body, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json_body, json!({"error": "Productos inválidos"}));
        }
    }

    #[tokio::test]
    async fn test_too_many_products() {
        let h = harness();
        let names: Vec<String> = (0..51).map(|i| format!("p{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();

        let (status, body) = send(&h.router, categorize_request(&products_body(&refs), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Máximo 50 productos por categorización"}));
        assert_eq!(h.provider.as_ref().unwrap().call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_names() {
        let h = harness();
        let long = "x".repeat(101);

        for body in [
            products_body(&["Leche", "   "]),
            products_body(&["Leche", long.as_str()]),
            r#"{"products":[{"name":"Leche"},{"name":7}]}"#.to_string(),
            r#"{"products":[1,2]}"#.to_string(),
            r#"{"products":["Leche"]}"#.to_string(),
        ] {
            let (status, json_body) = send(&h.router, categorize_request(&body, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body,
                json!({"error": "Algunos productos tienen nombres inválidos"})
            );
        }
    }

    #[tokio::test]
    async fn test_empty_product_list() {
        let h = harness();

        let (status, body) = send(&h.router, categorize_request(r#"{"products":[]}"#, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"categorizedProducts": []}));
        assert_eq!(h.provider.as_ref().unwrap().call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let h = harness_with(None, Duration::from_secs(30));

        let (status, body) =
            send(&h.router, categorize_request(&products_body(&["Leche"]), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "API key no configurada"}));
    }

    #[tokio::test]
    async fn test_upstream_failure_hidden() {
        let h = harness_with(
            Some(MockLlmProvider::new("mock").with_error("quota exhausted upstream")),
            Duration::from_secs(30),
        );

        let (status, body) =
            send(&h.router, categorize_request(&products_body(&["Leche"]), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Error interno del servidor"}));

        // Failures do not count against the caller
        let (status, _) =
            send(&h.router, categorize_request(&products_body(&["Leche"]), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_model_output() {
        let h = harness_with(
            Some(MockLlmProvider::new("mock").with_text("Claro, aquí tienes tu lista")),
            Duration::from_secs(30),
        );

        let (status, body) =
            send(&h.router, categorize_request(&products_body(&["Leche"]), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Error interno del servidor"}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let h = harness_with(
            Some(
                MockLlmProvider::new("mock")
                    .with_text(RESPONSE)
                    .with_delay(Duration::from_secs(60)),
            ),
            Duration::from_secs(30),
        );

        let (status, body) =
            send(&h.router, categorize_request(&products_body(&["Leche"]), None)).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body,
            json!({"error": "Timeout: La categorización tardó demasiado"})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["hasApiKey"], true);
        assert_eq!(body["apiKeyLength"], API_KEY.len());
        assert_eq!(body["apiKeyPreview"], "AIzaSyA1...bcdefXYZ");
        assert_eq!(body["timestamp"], "2026-10-18T12:00:00.000Z");
    }

    #[tokio::test]
    async fn test_health_without_key() {
        let h = harness_with(None, Duration::from_secs(30));

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&h.router, request).await;

        assert_eq!(body["hasApiKey"], false);
        assert_eq!(body["apiKeyLength"], 0);
        assert_eq!(body["apiKeyPreview"], Value::Null);
    }

    #[tokio::test]
    async fn test_status() {
        let h = harness();

        let request = Request::builder()
            .uri("/api/status")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["apiKeyConfigured"], true);
        assert_eq!(body["dailyLimit"]["total"], 15);
        assert_eq!(body["dailyLimit"]["remaining"], 15);
        assert_eq!(body["limits"]["maxProductsPerRequest"], 50);
        assert_eq!(body["limits"]["requestTimeoutSeconds"], 30);
    }

    #[tokio::test]
    async fn test_status_counts_served_requests() {
        let h = harness();

        let (status, _) = send(
            &h.router,
            categorize_request(&products_body(&["Leche", "Pan"]), Some("203.0.113.7")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Cache hits are free
        let (status, _) = send(
            &h.router,
            categorize_request(&products_body(&["Leche", "Pan"]), Some("203.0.113.8")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .uri("/api/status")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&h.router, request).await;

        assert_eq!(body["dailyLimit"]["used"], 1);
        assert_eq!(body["dailyLimit"]["remaining"], 14);
    }

    #[tokio::test]
    async fn test_live() {
        let h = harness();

        let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
