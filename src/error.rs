//! HTTP error payloads and the handler error type.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::render::RenderError;
use crate::store::StoreError;
use crate::template::{ValidationError, ValidationErrors};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// Per-field detail attached to validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(error: &ValidationError) -> Self {
        Self {
            field: error.field.clone(),
            message: error.message.clone(),
        }
    }
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new("Unauthorized", message)
    }

    pub fn unprocessable(message: &str) -> Self {
        Self::new("UnprocessableEntity", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn with_fields(mut self, errors: &ValidationErrors) -> Self {
        self.fields = errors.errors().iter().map(FieldError::from).collect();
        self
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Modèle introuvable ({0})")]
    TemplateNotFound(Uuid),
    #[error("Ce modèle n'est pas configuré pour ce mode de remplissage")]
    TemplateNotConfigured(Uuid),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("En-tête X-Guest-Id manquant ou invalide")]
    MissingGuestId,
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            Self::TemplateNotConfigured(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingGuestId => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Render(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::TemplateNotFound(_) => ErrorResponse::not_found("Modèle introuvable"),
            Self::TemplateNotConfigured(_) => ErrorResponse::unprocessable(&self.to_string()),
            Self::Validation(errors) => {
                ErrorResponse::unprocessable(&errors.to_message()).with_fields(errors)
            }
            Self::MissingGuestId => ErrorResponse::bad_request(&self.to_string()),
            Self::Unauthorized(message) => ErrorResponse::unauthorized(message),
            Self::Store(e) => {
                log::error!("Store error: {}", e);
                ErrorResponse::internal_error("Erreur de stockage")
            }
            Self::Render(e) => {
                log::error!("Render error: {}", e);
                ErrorResponse::internal_error("La génération du document a échoué")
            }
            Self::Internal(message) => {
                log::error!("Internal error: {}", message);
                ErrorResponse::internal_error("Erreur interne")
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
