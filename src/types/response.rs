//! Shared response shapes.

use serde::Serialize;
use utoipa::ToSchema;

/// Message-only response, the `{"mensaje": "..."}` shape several
/// operations answer with.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Outcome description
    #[schema(example = "Usuario eliminado correctamente")]
    pub mensaje: String,
}

impl MessageResponse {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}
