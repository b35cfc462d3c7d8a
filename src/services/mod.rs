//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod account;
mod tokens;

pub use account::{AccountManager, AccountService, LoginResponse};
pub use tokens::{Claims, RecoveryClaims, TokenIssuer};
