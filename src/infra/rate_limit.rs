//! Redis-backed request rate limiting.
//!
//! Fixed-window counters keyed by client identifier. The trait exists
//! so request-path code can be tested without a live Redis.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

use crate::config::{Config, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{ApiError, ApiResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Rate limiter seam used by the request middleware.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count a request against `identifier`'s window. Returns the
    /// request count within the current window and whether the request
    /// is allowed.
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> ApiResult<(u64, bool)>;
}

/// Fixed-window rate limiter over Redis.
#[derive(Clone)]
pub struct RedisRateLimiter {
    connection: ConnectionManager,
}

impl RedisRateLimiter {
    /// Create a new limiter and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        let client = Client::open(config.redis_url.as_str()).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!("Redis rate limiter connected");

        Self { connection }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> ApiResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        // Check if key exists
        let exists: bool = conn.exists(&key).await.map_err(redis_error)?;

        if !exists {
            // First request in window
            let _: () = conn
                .set_ex(&key, 1i64, window_seconds)
                .await
                .map_err(redis_error)?;
            return Ok((1, true));
        }

        // Increment counter
        let count: i64 = conn.incr(&key, 1).await.map_err(redis_error)?;
        let count = count as u64;
        let allowed = count <= max_requests;

        Ok((count, allowed))
    }
}

fn redis_error(e: redis::RedisError) -> ApiError {
    ApiError::internal(format!("Redis error: {}", e))
}
