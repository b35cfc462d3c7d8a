//! Cuentas - user account service
//!
//! A small account backend: registration, credential login with token
//! issuance, role management and secret-question password recovery.
//! Nine operations over a single user collection.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and credential value objects
//! - **services**: Account use cases and token issuing
//! - **infra**: Infrastructure concerns (database, rate limiting)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, SecretAnswer, User, UserRole};
pub use errors::{ApiError, ApiResult};
