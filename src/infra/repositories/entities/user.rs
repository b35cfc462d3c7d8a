//! User database entity for SeaORM.
//!
//! The `users` table is provisioned externally; this layer only reads
//! and writes it.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub secret_question: String,
    pub answer_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            first_name: model.first_name,
            paternal_surname: model.paternal_surname,
            maternal_surname: model.maternal_surname,
            username: model.username,
            email: model.email,
            phone: model.phone,
            password_hash: model.password_hash,
            secret_question: model.secret_question,
            answer_hash: model.answer_hash,
            role: UserRole::from(model.role.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
