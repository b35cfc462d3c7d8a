//! User management handlers: listing, role changes, deletion.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{User, UserRole};
use crate::errors::ApiResult;
use crate::types::MessageResponse;

/// Role update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    /// New role, one of `user` or `admin`
    #[serde(rename = "rol")]
    #[validate(length(min = 1, message = "El rol es obligatorio"))]
    #[schema(example = "admin")]
    pub role: String,
}

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id/role", put(update_role))
        .route("/:id", delete(delete_user))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All stored accounts, without credential hashes", body = [User]),
        (status = 500, description = "Listing failed")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state
        .accounts
        .list_users()
        .await
        .map_err(|e| e.at_boundary("Error al obtener los usuarios"))?;

    Ok(Json(users))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated record", body = User),
        (status = 400, description = "Role outside the closed role set"),
        (status = 404, description = "No user with that id"),
        (status = 500, description = "Update failed")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    let role: UserRole = payload.role.parse()?;

    let user = state
        .accounts
        .update_role(id, role)
        .await
        .map_err(|e| e.at_boundary("Error al actualizar el rol"))?;

    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Account removed (or was already gone)", body = MessageResponse),
        (status = 500, description = "Deletion failed")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .accounts
        .delete_user(id)
        .await
        .map_err(|e| e.at_boundary("Error al eliminar el usuario"))?;

    Ok(Json(MessageResponse::new("Usuario eliminado correctamente")))
}
