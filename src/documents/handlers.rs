use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use super::model::{DocumentListResponse, GenerateRequest};
use crate::auth::Claims;
use crate::error::ApiError;
use crate::render::{RenderRequest, RenderedFile};
use crate::store::NewGeneratedDocument;
use crate::template::{FormValues, RenderMode, Template, Wizard};
use crate::templates::handlers::require_user;
use crate::templates::load_template;
use crate::{AppState, ErrorResponse};

/// Validate, render in final mode, produce the file and queue it for
/// persistence. Shared by the HTTP endpoint and the MCP tool.
pub async fn generate_document(
    state: &AppState,
    claims: &Claims,
    template: &Template,
    values: FormValues,
) -> Result<RenderedFile, ApiError> {
    let wizard = Wizard::live(&template.valid_variables());
    wizard
        .validate_all(&values)
        .into_result()
        .map_err(ApiError::Validation)?;

    let content = template.compile().render(&values, RenderMode::Final).content;
    let request = RenderRequest {
        title: template.name.clone(),
        content: content.clone(),
        values: values.clone(),
    };

    let renderer = state.renderer.clone();
    let file = web::block(move || renderer.render_to_file(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("render task failed: {}", e)))??;

    let document = NewGeneratedDocument {
        template_id: template.id,
        user_id: claims.user_id().to_string(),
        values,
        content,
    };
    match state.document_persist_sender.try_send(document) {
        Ok(()) => {}
        Err(TrySendError::Full(document)) => log::error!(
            "Persistence queue full, dropping generated document for template {} (user {})",
            document.template_id,
            document.user_id
        ),
        Err(TrySendError::Closed(document)) => log::error!(
            "Persistence worker stopped, dropping generated document for template {} (user {})",
            document.template_id,
            document.user_id
        ),
    }

    Ok(file)
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/generate",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated PDF", content_type = "application/pdf"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 422, description = "Required fields are empty", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_user(&req, &state)?;
    let template = load_template(&state, path.into_inner()).await?;

    let file = generate_document(&state, &claims, &template, body.into_inner().values).await?;

    Ok(HttpResponse::Ok()
        .content_type(file.mime_type.as_str())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.bytes))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    responses(
        (status = 200, description = "Documents generated by the caller, newest first", body = DocumentListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_documents(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_user(&req, &state)?;
    let documents = state.documents.documents_for_user(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(DocumentListResponse::new(documents)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/templates/{id}/generate").route(web::post().to(generate)))
        .service(web::resource("/documents").route(web::get().to(list_documents)));
}
