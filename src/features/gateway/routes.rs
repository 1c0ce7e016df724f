use std::sync::Arc;

use axum::{
    routing::{any, post},
    Router,
};

use crate::core::middleware;
use crate::features::gateway::handlers;
use crate::features::gateway::services::{AuthService, TokenService};
use crate::modules::proxy::ReverseProxy;

/// Public gateway routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .with_state(service)
}

/// Driver routes, bearer token required, forwarded upstream
pub fn protected_routes(proxy: Arc<ReverseProxy>, tokens: Arc<TokenService>) -> Router {
    Router::new()
        .route("/drivers", any(handlers::proxy_to_driver_service))
        .route("/drivers/{*rest}", any(handlers::proxy_to_driver_service))
        .route_layer(axum::middleware::from_fn_with_state(
            tokens,
            middleware::auth_middleware,
        ))
        .with_state(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Request,
        http::{header, HeaderValue, StatusCode},
        Json,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    use crate::modules::proxy::RoundRobinBalancer;

    /// Upstream that echoes what it received
    async fn echo(req: Request) -> Json<Value> {
        let forwarded_user = req
            .headers()
            .get("x-forwarded-user")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let method = req.method().to_string();
        let uri = req.uri().to_string();
        let body = axum::body::to_bytes(req.into_body(), 1024 * 1024)
            .await
            .unwrap_or_default();

        Json(json!({
            "method": method,
            "uri": uri,
            "forwardedUser": forwarded_user,
            "body": String::from_utf8_lossy(&body),
        }))
    }

    async fn spawn_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(echo);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn gateway(upstreams: Vec<String>) -> TestServer {
        let tokens = Arc::new(TokenService::new("test-secret", Duration::from_secs(600)));
        let auth = Arc::new(AuthService::new(
            "admin".to_string(),
            "password123".to_string(),
            Arc::clone(&tokens),
        ));
        let proxy = Arc::new(
            ReverseProxy::new(
                RoundRobinBalancer::new(upstreams).unwrap(),
                Duration::from_secs(5),
            )
            .unwrap(),
        );

        let app = Router::new()
            .merge(public_routes(auth))
            .merge(protected_routes(proxy, tokens));
        TestServer::new(app).unwrap()
    }

    async fn login(server: &TestServer) -> String {
        let response = server
            .post("/login")
            .form(&[("username", "admin"), ("password", "password123")])
            .await;
        response.assert_status_ok();
        let payload: Value = response.json();
        payload["data"]["token"].as_str().unwrap().to_string()
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_token_in_envelope() {
        let server = gateway(vec!["http://127.0.0.1:1".to_string()]);
        let response = server
            .post("/login")
            .form(&[("username", "admin"), ("password", "password123")])
            .await;

        response.assert_status_ok();
        let payload: Value = response.json();
        assert_eq!(payload["success"], true);
        assert!(payload["data"]["token"].as_str().is_some());
        assert_eq!(payload["data"]["tokenType"], "Bearer");
        assert_eq!(payload["data"]["expiresIn"], 600);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let server = gateway(vec!["http://127.0.0.1:9".to_string()]);
        server
            .post("/login")
            .form(&[("username", "admin"), ("password", "wrong")])
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_drivers_require_token() {
        let server = gateway(vec!["http://127.0.0.1:9".to_string()]);

        server
            .get("/drivers")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/drivers/nearby")
            .add_header(header::AUTHORIZATION, bearer("forged.token.value"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .get("/drivers")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Token abc"))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticated_request_is_forwarded() {
        let upstream = spawn_upstream().await;
        let server = gateway(vec![upstream]);
        let token = login(&server).await;

        let response = server
            .get("/drivers/nearby")
            .add_query_param("lat", "40.0")
            .add_query_param("lon", "29.0")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;

        response.assert_status_ok();
        let payload: Value = response.json();
        assert_eq!(payload["method"], "GET");
        assert_eq!(payload["uri"], "/drivers/nearby?lat=40.0&lon=29.0");
        assert_eq!(payload["forwardedUser"], "Taxi Admin");

        let response = server
            .put("/drivers/abc")
            .json(&json!({ "firstName": "Ali" }))
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        let payload: Value = response.json();
        assert_eq!(payload["method"], "PUT");
        assert_eq!(payload["body"], r#"{"firstName":"Ali"}"#);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        // Grab a free port, then release it so nothing listens there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let server = gateway(vec![dead]);
        let token = login(&server).await;

        server
            .get("/drivers")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
    }
}
