//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis-backed rate limiting

pub mod db;
pub mod rate_limit;
pub mod repositories;

pub use db::Database;
pub use rate_limit::{RateLimiter, RedisRateLimiter};
pub use repositories::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use rate_limit::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
