//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{auth_handler, recovery_handler, user_handler};
use crate::domain::{User, UserRole};
use crate::services::LoginResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the account service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cuentas",
        version = "0.1.0",
        description = "User account service: registration, login, role management and secret-question password recovery",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // User endpoints
        user_handler::list_users,
        user_handler::update_role,
        user_handler::delete_user,
        // Recovery endpoints
        recovery_handler::verify_email,
        recovery_handler::secret_question,
        recovery_handler::verify_answer,
        recovery_handler::change_password,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            User,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RegisterResponse,
            LoginResponse,
            // User handler types
            user_handler::UpdateRoleRequest,
            // Recovery types
            recovery_handler::EmailRequest,
            recovery_handler::VerifyAnswerRequest,
            recovery_handler::ChangePasswordRequest,
            recovery_handler::VerifyEmailResponse,
            recovery_handler::QuestionResponse,
            recovery_handler::VerifyAnswerResponse,
            // Shared
            MessageResponse,
        )
    ),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User management operations"),
        (name = "Recovery", description = "Secret-question password recovery")
    )
)]
pub struct ApiDoc;
