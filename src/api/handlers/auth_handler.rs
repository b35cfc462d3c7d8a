//! Authentication handlers: registration and login.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CreateUser, User};
use crate::errors::ApiResult;
use crate::services::LoginResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// First name
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    #[schema(example = "Ana")]
    pub first_name: String,
    /// Paternal surname
    #[serde(rename = "ap")]
    #[schema(example = "García")]
    pub paternal_surname: String,
    /// Maternal surname
    #[serde(rename = "am")]
    #[schema(example = "López")]
    pub maternal_surname: String,
    /// Public handle
    #[validate(length(min = 1, message = "El nombre de usuario es obligatorio"))]
    #[schema(example = "anag")]
    pub username: String,
    /// Email address, the login identifier
    #[validate(email(message = "Correo electrónico inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Contact phone
    #[serde(rename = "telefono")]
    #[schema(example = "5550001111")]
    pub phone: String,
    /// Password, stored only as an Argon2 hash
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Recovery question shown back during password recovery
    #[serde(rename = "preguntaSecreta")]
    #[validate(length(min = 1, message = "La pregunta secreta es obligatoria"))]
    #[schema(example = "¿Nombre de tu primera mascota?")]
    pub secret_question: String,
    /// Recovery answer, stored only as an Argon2 hash
    #[serde(rename = "respuestaSecreta")]
    #[validate(length(min = 1, message = "La respuesta secreta es obligatoria"))]
    #[schema(example = "Fluffy")]
    pub secret_answer: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Correo electrónico inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Registration response: confirmation plus the created record.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Outcome description
    #[schema(example = "Usuario registrado con éxito")]
    pub mensaje: String,
    /// The stored record, without credential hashes
    pub usuario: User,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let user = state
        .accounts
        .register(CreateUser {
            first_name: payload.first_name,
            paternal_surname: payload.paternal_surname,
            maternal_surname: payload.maternal_surname,
            username: payload.username,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
            secret_question: payload.secret_question,
            secret_answer: payload.secret_answer,
        })
        .await
        .map_err(|e| e.at_boundary("Error al registrar usuario"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            mensaje: "Usuario registrado con éxito".to_string(),
            usuario: user,
        }),
    ))
}

/// Login and get an identity token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Unknown email or wrong password"),
        (status = 500, description = "Login failed")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .accounts
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.at_boundary("Error en el servidor"))?;

    Ok(Json(outcome))
}
