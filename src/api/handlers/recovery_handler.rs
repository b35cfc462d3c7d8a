//! Password recovery handlers.
//!
//! The flow is three steps: confirm the email, answer the secret
//! question, set a new password. Answering correctly yields a signed
//! recovery ticket; the final step refuses to change anything without
//! that ticket.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::ApiResult;
use crate::types::MessageResponse;

/// Email-only request used by the first two recovery steps
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmailRequest {
    /// Email address
    #[validate(email(message = "Correo electrónico inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
}

/// Secret answer check request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyAnswerRequest {
    /// Email address
    #[validate(email(message = "Correo electrónico inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Answer to the account's secret question
    #[serde(rename = "respuestaSecreta")]
    #[validate(length(min = 1, message = "La respuesta secreta es obligatoria"))]
    #[schema(example = "Fluffy")]
    pub secret_answer: String,
}

/// Password change request, gated by the recovery ticket
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Email address
    #[validate(email(message = "Correo electrónico inválido"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Replacement password
    #[serde(rename = "nuevaContrasena")]
    #[validate(length(min = 1, message = "La nueva contraseña es obligatoria"))]
    #[schema(example = "OtherPass456!")]
    pub new_password: String,
    /// Recovery ticket issued by the answer check
    #[validate(length(min = 1, message = "El ticket de recuperación es obligatorio"))]
    pub ticket: String,
}

/// Email confirmation response
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyEmailResponse {
    /// Outcome description
    #[schema(example = "Correo válido")]
    pub mensaje: String,
    /// Id of the matching account
    #[serde(rename = "usuarioId")]
    pub user_id: Uuid,
}

/// Secret question response
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionResponse {
    /// The question the account registered with
    #[serde(rename = "preguntaSecreta")]
    #[schema(example = "¿Nombre de tu primera mascota?")]
    pub secret_question: String,
}

/// Answer check response carrying the recovery ticket
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyAnswerResponse {
    /// Outcome description
    #[schema(example = "Respuesta válida")]
    pub mensaje: String,
    /// Ticket accepted by the password change step
    pub ticket: String,
}

/// Create password recovery routes
pub fn recovery_routes() -> Router<AppState> {
    Router::new()
        .route("/verify-email", post(verify_email))
        .route("/question", post(secret_question))
        .route("/verify-answer", post(verify_answer))
        .route("/change-password", post(change_password))
}

/// Confirm an email has an account
#[utoipa::path(
    post,
    path = "/recovery/verify-email",
    tag = "Recovery",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Email has an account", body = VerifyEmailResponse),
        (status = 404, description = "No account for that email"),
        (status = 500, description = "Check failed")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> ApiResult<Json<VerifyEmailResponse>> {
    let user_id = state
        .accounts
        .verify_email(&payload.email)
        .await
        .map_err(|e| e.at_boundary("Error al verificar el correo"))?;

    Ok(Json(VerifyEmailResponse {
        mensaje: "Correo válido".to_string(),
        user_id,
    }))
}

/// Fetch the account's secret question
#[utoipa::path(
    post,
    path = "/recovery/question",
    tag = "Recovery",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "The registered question", body = QuestionResponse),
        (status = 404, description = "No account for that email"),
        (status = 500, description = "Lookup failed")
    )
)]
pub async fn secret_question(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmailRequest>,
) -> ApiResult<Json<QuestionResponse>> {
    let question = state
        .accounts
        .secret_question(&payload.email)
        .await
        .map_err(|e| e.at_boundary("Error al obtener la pregunta secreta"))?;

    Ok(Json(QuestionResponse {
        secret_question: question,
    }))
}

/// Check the secret answer and issue a recovery ticket
#[utoipa::path(
    post,
    path = "/recovery/verify-answer",
    tag = "Recovery",
    request_body = VerifyAnswerRequest,
    responses(
        (status = 200, description = "Answer accepted, ticket issued", body = VerifyAnswerResponse),
        (status = 400, description = "Wrong answer"),
        (status = 404, description = "No account for that email"),
        (status = 500, description = "Check failed")
    )
)]
pub async fn verify_answer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyAnswerRequest>,
) -> ApiResult<Json<VerifyAnswerResponse>> {
    let ticket = state
        .accounts
        .verify_answer(&payload.email, &payload.secret_answer)
        .await
        .map_err(|e| e.at_boundary("Error al verificar la respuesta secreta"))?;

    Ok(Json(VerifyAnswerResponse {
        mensaje: "Respuesta válida".to_string(),
        ticket,
    }))
}

/// Set a new password using a recovery ticket
#[utoipa::path(
    post,
    path = "/recovery/change-password",
    tag = "Recovery",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Missing or invalid recovery ticket"),
        (status = 404, description = "No account for that email"),
        (status = 500, description = "Change failed")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .accounts
        .change_password(&payload.email, &payload.new_password, &payload.ticket)
        .await
        .map_err(|e| e.at_boundary("Error al cambiar la contraseña"))?;

    Ok(Json(MessageResponse::new("Contraseña actualizada con éxito")))
}
