//! Account service - registration, login, role management and
//! secret-question password recovery.
//!
//! One service owns the whole account lifecycle; every operation is a
//! short lookup-check-act sequence against the user repository. No
//! state is held between calls: recovery proof travels as a signed
//! ticket in the client's hands.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CreateUser, NewUser, Password, SecretAnswer, User, UserRole};
use crate::errors::{ApiError, ApiResult};
use crate::infra::UserRepository;
use crate::services::TokenIssuer;

/// Payload returned after a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed identity token
    pub token: String,
    /// Role embedded in the token
    #[serde(rename = "rol")]
    pub role: UserRole,
    /// First name, for greeting the user
    #[serde(rename = "nombre")]
    pub first_name: String,
}

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account with hashed credentials.
    async fn register(&self, data: CreateUser) -> ApiResult<User>;

    /// Check credentials and issue an identity token.
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    /// List every stored account.
    async fn list_users(&self) -> ApiResult<Vec<User>>;

    /// Replace the role of the account with the given id.
    async fn update_role(&self, id: Uuid, role: UserRole) -> ApiResult<User>;

    /// Remove an account. Removing a missing account succeeds.
    async fn delete_user(&self, id: Uuid) -> ApiResult<()>;

    /// Confirm an email has an account; returns the account id.
    async fn verify_email(&self, email: &str) -> ApiResult<Uuid>;

    /// Fetch the secret question of the account with the given email.
    async fn secret_question(&self, email: &str) -> ApiResult<String>;

    /// Check a secret answer; on success returns a recovery ticket.
    async fn verify_answer(&self, email: &str, answer: &str) -> ApiResult<String>;

    /// Set a new password. Requires the recovery ticket issued by
    /// [`AccountService::verify_answer`] for the same email.
    async fn change_password(&self, email: &str, new_password: &str, ticket: &str)
        -> ApiResult<()>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    repo: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
}

impl AccountManager {
    /// Create new account service instance
    pub fn new(repo: Arc<dyn UserRepository>, tokens: TokenIssuer) -> Self {
        Self { repo, tokens }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, data: CreateUser) -> ApiResult<User> {
        // Email uniqueness is a store constraint; a duplicate insert
        // surfaces as a database error, not a pre-checked conflict.
        let password_hash = Password::new(&data.password)?.into_string();
        let answer_hash = SecretAnswer::new(&data.secret_answer)?.into_string();

        self.repo
            .insert(NewUser {
                first_name: data.first_name,
                paternal_surname: data.paternal_surname,
                maternal_surname: data.maternal_surname,
                username: data.username,
                email: data.email,
                phone: data.phone,
                password_hash,
                secret_question: data.secret_question,
                answer_hash,
            })
            .await
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::UnknownAccount)?;

        let stored = Password::from_hash(user.password_hash.clone());
        if !stored.verify(password) {
            return Err(ApiError::InvalidPassword);
        }

        let token = self.tokens.identity_token(&user)?;

        Ok(LoginResponse {
            token,
            role: user.role,
            first_name: user.first_name,
        })
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> ApiResult<User> {
        self.repo
            .update_role(id, role)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    async fn delete_user(&self, id: Uuid) -> ApiResult<()> {
        self.repo.delete(id).await
    }

    async fn verify_email(&self, email: &str) -> ApiResult<Uuid> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::EmailNotFound)?;

        Ok(user.id)
    }

    async fn secret_question(&self, email: &str) -> ApiResult<String> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::EmailNotFound)?;

        Ok(user.secret_question)
    }

    async fn verify_answer(&self, email: &str, answer: &str) -> ApiResult<String> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(ApiError::EmailNotFound)?;

        let stored = SecretAnswer::from_hash(user.answer_hash.clone());
        if !stored.verify(answer) {
            return Err(ApiError::InvalidAnswer);
        }

        self.tokens.recovery_ticket(email)
    }

    async fn change_password(
        &self,
        email: &str,
        new_password: &str,
        ticket: &str,
    ) -> ApiResult<()> {
        self.tokens.verify_recovery(ticket, email)?;

        let password_hash = Password::new(new_password)?.into_string();

        self.repo
            .update_password(email, password_hash)
            .await?
            .ok_or(ApiError::EmailNotFound)?;

        Ok(())
    }
}
