//! Domain layer - Core business entities and logic
//!
//! Core domain models for user accounts and their credentials,
//! independent of transport and storage concerns.

pub mod password;
pub mod secret_answer;
pub mod user;

pub use password::Password;
pub use secret_answer::SecretAnswer;
pub use user::{CreateUser, NewUser, User, UserRole};
