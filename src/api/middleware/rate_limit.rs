//! Rate limiting middleware for credential-check endpoints.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{RATE_LIMIT_CREDENTIAL_REQUESTS, RATE_LIMIT_CREDENTIAL_WINDOW_SECONDS};
use crate::errors::ErrorResponse;

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Retry-After",
            HeaderValue::from_str(&self.retry_after.to_string()).unwrap(),
        );
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Json(ErrorResponse {
                error: "Demasiadas solicitudes, intente de nuevo más tarde".to_string(),
            }),
        )
            .into_response()
    }
}

/// Extract client identifier for rate limiting.
/// Uses X-Forwarded-For header if behind proxy, otherwise uses connection IP.
fn get_client_identifier(request: &Request) -> String {
    // Try X-Forwarded-For header first (for reverse proxies)
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        // Take the first IP in the chain (original client)
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    // Try X-Real-IP header
    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    // Fall back to connection info
    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    // Last resort: unknown
    "unknown".to_string()
}

/// Rate limiting for the credential-check endpoints (login,
/// registration and the recovery flow). One window per client across
/// all of them.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client_id = get_client_identifier(&request);
    let key = format!("credentials:{}", client_id);

    let (count, allowed) = match state
        .limiter
        .check(
            &key,
            RATE_LIMIT_CREDENTIAL_REQUESTS,
            RATE_LIMIT_CREDENTIAL_WINDOW_SECONDS,
        )
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // SECURITY: Fail closed - deny requests when Redis is
            // unavailable so credential guessing can not bypass the
            // limiter
            tracing::error!(error = %e, "Rate limit check failed - denying request");
            return Err(RateLimitError {
                retry_after: RATE_LIMIT_CREDENTIAL_WINDOW_SECONDS,
            });
        }
    };

    if !allowed {
        tracing::warn!(
            client = %client_id,
            count = count,
            "Rate limit exceeded"
        );
        return Err(RateLimitError {
            retry_after: RATE_LIMIT_CREDENTIAL_WINDOW_SECONDS,
        });
    }

    let mut response = next.run(request).await;

    // Add rate limit headers
    let remaining = RATE_LIMIT_CREDENTIAL_REQUESTS.saturating_sub(count);
    response.headers_mut().insert(
        "X-RateLimit-Limit",
        HeaderValue::from_str(&RATE_LIMIT_CREDENTIAL_REQUESTS.to_string()).unwrap(),
    );
    response.headers_mut().insert(
        "X-RateLimit-Remaining",
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{body::Body, routing::get, Router};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    use crate::errors::ApiError;
    use crate::infra::{Database, MockRateLimiter, MockUserRepository};
    use crate::services::{AccountManager, TokenIssuer};

    fn state_with_limiter(limiter: MockRateLimiter) -> AppState {
        let repo = Arc::new(MockUserRepository::new());
        let tokens = TokenIssuer::with_secret(b"test-secret-key-for-testing-32ch!", 1, 15);
        let accounts = Arc::new(AccountManager::new(repo, tokens));
        let database = Arc::new(Database::from_connection(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        ));

        AppState::new(accounts, Arc::new(limiter), database)
    }

    /// A one-route app with the middleware in front, the way the real
    /// router layers it onto the credential endpoints.
    fn app(limiter: MockRateLimiter) -> Router {
        let state = state_with_limiter(limiter);
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                rate_limit_middleware,
            ))
    }

    async fn send(app: Router) -> Response {
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_request_passes_and_carries_rate_headers() {
        let mut limiter = MockRateLimiter::new();
        limiter.expect_check().returning(|_, _, _| Ok((3, true)));

        let response = send(app(limiter)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["X-RateLimit-Limit"], "10");
        assert_eq!(response.headers()["X-RateLimit-Remaining"], "7");
    }

    #[tokio::test]
    async fn over_limit_request_is_denied() {
        let mut limiter = MockRateLimiter::new();
        limiter.expect_check().returning(|_, _, _| Ok((11, false)));

        let response = send(app(limiter)).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
        assert_eq!(response.headers()["X-RateLimit-Remaining"], "0");
    }

    #[tokio::test]
    async fn limiter_failure_denies_the_request() {
        // Fail closed: a broken limiter must not open the door to
        // unthrottled credential guessing.
        let mut limiter = MockRateLimiter::new();
        limiter
            .expect_check()
            .returning(|_, _, _| Err(ApiError::internal("Redis error: connection refused")));

        let response = send(app(limiter)).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
    }

    #[test]
    fn test_rate_limit_error_response() {
        let error = RateLimitError { retry_after: 60 };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "60");
    }

    #[test]
    fn test_client_identifier_prefers_forwarded_header() {
        let request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(get_client_identifier(&request), "203.0.113.9");
    }

    #[test]
    fn test_client_identifier_without_hints_is_unknown() {
        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(get_client_identifier(&request), "unknown");
    }
}
