use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::Response,
};

use super::RoundRobinBalancer;
use crate::core::error::AppError;

/// Largest request body the gateway will buffer
const MAX_PROXY_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Header naming the authenticated caller for the upstream
pub const FORWARDED_USER_HEADER: &str = "x-forwarded-user";

/// Connection-scoped headers that must not cross the proxy
const HOP_BY_HOP_HEADERS: [HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("No upstream targets configured")]
    NoTargets,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    #[error("Upstream {0} unreachable: {1}")]
    Unreachable(String, String),

    #[error("Failed to read upstream response: {0}")]
    ResponseBody(String),
}

impl From<ProxyError> for AppError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::RequestBody(msg) => AppError::BadRequest(msg),
            ProxyError::NoTargets | ProxyError::Client(_) => AppError::Internal(e.to_string()),
            other => AppError::ExternalServiceError(other.to_string()),
        }
    }
}

/// Forwards requests to the next upstream and relays the answer unchanged
pub struct ReverseProxy {
    balancer: RoundRobinBalancer,
    client: reqwest::Client,
}

impl ReverseProxy {
    pub fn new(balancer: RoundRobinBalancer, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Client(e.to_string()))?;

        Ok(Self { balancer, client })
    }

    pub async fn forward(
        &self,
        req: Request,
        forwarded_user: Option<&str>,
    ) -> Result<Response, ProxyError> {
        let target = self.balancer.next_target();
        let (parts, body) = req.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", target, path_and_query);

        let body = to_bytes(body, MAX_PROXY_BODY_BYTES)
            .await
            .map_err(|e| ProxyError::RequestBody(e.to_string()))?;

        let mut headers = strip_hop_by_hop(&parts.headers);
        headers.remove(header::CONTENT_LENGTH);
        if let Some(value) = forwarded_user.and_then(|u| HeaderValue::from_str(u).ok()) {
            headers.insert(FORWARDED_USER_HEADER, value);
        }

        tracing::debug!("Proxying {} {} -> {}", parts.method, path_and_query, target);

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upstream request to {} failed: {}", target, e);
                ProxyError::Unreachable(target.to_string(), e.to_string())
            })?;

        let status = upstream.status();
        let response_headers = strip_hop_by_hop(upstream.headers());
        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| ProxyError::ResponseBody(e.to_string()))?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        response.headers_mut().remove(header::CONTENT_LENGTH);

        Ok(response)
    }
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in HOP_BY_HOP_HEADERS.iter() {
        filtered.remove(name);
    }
    filtered.remove("keep-alive");
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::HOST, HeaderValue::from_static("gateway:8000"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc"),
        );

        let filtered = strip_hop_by_hop(&headers);
        assert!(filtered.get(header::CONNECTION).is_none());
        assert!(filtered.get(header::HOST).is_none());
        assert!(filtered.get("keep-alive").is_none());
        assert_eq!(filtered.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert!(filtered.get(header::AUTHORIZATION).is_some());
    }

    async fn spawn_uri_echo() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().fallback(|req: Request| async move {
            format!("{} {}", req.method(), req.uri())
        });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_forward_keeps_path_and_query() {
        let upstream = spawn_uri_echo().await;
        let proxy = ReverseProxy::new(
            RoundRobinBalancer::new(vec![upstream]).unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();

        let req = axum::http::Request::builder()
            .method("GET")
            .uri("/drivers/nearby?lat=41.0&lon=29.0&taxiType=yellow")
            .body(Body::empty())
            .unwrap();
        let response = proxy.forward(req, Some("Taxi Admin")).await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(
            String::from_utf8_lossy(&bytes),
            "GET /drivers/nearby?lat=41.0&lon=29.0&taxiType=yellow"
        );
    }

    #[test]
    fn test_proxy_error_mapping() {
        let err: AppError = ProxyError::Unreachable("http://a".into(), "refused".into()).into();
        assert!(matches!(err, AppError::ExternalServiceError(_)));

        let err: AppError = ProxyError::RequestBody("too big".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
