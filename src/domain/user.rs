//! User domain entity and related types.
//!
//! Serialized field names follow the public wire contract of the
//! service (Spanish keys, camelCase timestamps). Credential hashes are
//! stored on the entity but never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::ApiError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Strict parse used at the API boundary: anything outside the closed
/// role set is rejected.
impl std::str::FromStr for UserRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(UserRole::User),
            ROLE_ADMIN => Ok(UserRole::Admin),
            _ => Err(ApiError::InvalidRole),
        }
    }
}

/// Lenient conversion used when reading stored rows: unrecognized
/// values degrade to the default role instead of failing reads.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "ap")]
    pub paternal_surname: String,
    #[serde(rename = "am")]
    pub maternal_surname: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "preguntaSecreta")]
    pub secret_question: String,
    #[serde(skip_serializing)]
    pub answer_hash: String,
    #[serde(rename = "rol")]
    pub role: UserRole,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Registration data as submitted by the client, credentials still in
/// plain text. The service layer hashes them before anything is stored.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub secret_question: String,
    pub secret_answer: String,
}

/// Persistence-ready record handed to the store: credentials already
/// hashed, id and timestamps assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub secret_question: String,
    pub answer_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_rejects_unknown_roles() {
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("superadmin".parse::<UserRole>().is_err());
        assert!("Admin".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn lenient_conversion_defaults_to_user() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("banana"), UserRole::User);
        assert!(!UserRole::from("banana").is_admin());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"admin\""
        );
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"user\"");
    }

    #[test]
    fn user_serialization_uses_wire_names_and_hides_hashes() {
        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ana".into(),
            paternal_surname: "García".into(),
            maternal_surname: "López".into(),
            username: "anag".into(),
            email: "ana@example.com".into(),
            phone: "5550001111".into(),
            password_hash: "argon2-hash".into(),
            secret_question: "¿Ciudad natal?".into(),
            answer_hash: "argon2-hash".into(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&user).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["nombre"], "Ana");
        assert_eq!(obj["ap"], "García");
        assert_eq!(obj["am"], "López");
        assert_eq!(obj["telefono"], "5550001111");
        assert_eq!(obj["preguntaSecreta"], "¿Ciudad natal?");
        assert_eq!(obj["rol"], "user");
        assert!(obj.contains_key("createdAt"));
        assert!(obj.contains_key("updatedAt"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("answer_hash"));
        assert!(!obj.contains_key("password"));
    }
}
