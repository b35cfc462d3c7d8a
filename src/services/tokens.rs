//! Token issuing and verification.
//!
//! Two token kinds share the signing key but never each other's shape:
//! identity tokens handed out at login, and short-lived recovery
//! tickets minted when a secret answer checks out. The `uso` claim is
//! only present on tickets, so an identity token replayed as a ticket
//! fails to decode.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, TICKET_PURPOSE_RECOVERY};
use crate::domain::User;
use crate::errors::{ApiError, ApiResult};

/// Identity token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub rol: String,
    pub iat: i64,
    pub exp: i64,
}

/// Recovery ticket claims
#[derive(Debug, Serialize, Deserialize)]
pub struct RecoveryClaims {
    pub sub: String,
    pub uso: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies the tokens the service issues.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl_hours: i64,
    ticket_ttl_minutes: i64,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self::with_secret(
            config.jwt_secret_bytes(),
            config.jwt_expiration_hours,
            config.recovery_ticket_ttl_minutes,
        )
    }

    pub fn with_secret(secret: &[u8], token_ttl_hours: i64, ticket_ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            token_ttl_hours,
            ticket_ttl_minutes,
        }
    }

    /// Sign an identity token carrying the user's id and role.
    pub fn identity_token(&self, user: &User) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            rol: user.role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode and validate an identity token.
    pub fn verify_identity(&self, token: &str) -> ApiResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Sign a recovery ticket for an email whose secret answer was
    /// just verified.
    pub fn recovery_ticket(&self, email: &str) -> ApiResult<String> {
        let now = Utc::now();
        let claims = RecoveryClaims {
            sub: email.to_string(),
            uso: TICKET_PURPOSE_RECOVERY.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.ticket_ttl_minutes)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Validate a recovery ticket against the email whose password is
    /// being changed. Malformed, expired, wrong-purpose and
    /// wrong-subject tickets are all rejected alike.
    pub fn verify_recovery(&self, ticket: &str, email: &str) -> ApiResult<RecoveryClaims> {
        let data = decode::<RecoveryClaims>(ticket, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::InvalidTicket)?;

        if data.claims.uso != TICKET_PURPOSE_RECOVERY || data.claims.sub != email {
            return Err(ApiError::InvalidTicket);
        }

        Ok(data.claims)
    }
}
