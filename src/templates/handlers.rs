use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use super::model::{
    AdvanceResponse, PreviewRequest, PreviewResponse, WizardQuery, WizardResponse,
};
use crate::auth::{validate_request_token, Claims};
use crate::error::ApiError;
use crate::template::{Template, Wizard, WizardMode, WizardState};
use crate::{AppState, ErrorResponse};

/// Fetch a template or fail with a not-found error.
pub async fn load_template(state: &AppState, id: Uuid) -> Result<Template, ApiError> {
    match state.templates.fetch_template(&id).await? {
        Some(template) => Ok(template),
        None => {
            log::info!("Template {} not found", id);
            Err(ApiError::TemplateNotFound(id))
        }
    }
}

pub fn require_user(req: &HttpRequest, state: &AppState) -> Result<Claims, ApiError> {
    validate_request_token(req, &state.jwt_secret).map_err(|e| ApiError::Unauthorized(e.to_string()))
}

pub fn wizard_response(template: &Template, wizard: &Wizard, state: &WizardState) -> WizardResponse {
    WizardResponse {
        template_id: template.id,
        name: template.name.clone(),
        mode: wizard.mode(),
        has_variables: wizard.has_fields(),
        total_steps: wizard.total_steps(),
        steps: wizard.steps().to_vec(),
        gate: wizard.gate(),
        view: wizard.view(state),
    }
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}/wizard",
    tag = "Templates",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        WizardQuery
    ),
    responses(
        (status = 200, description = "Live wizard steps, five fields per step", body = WizardResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_wizard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<WizardQuery>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_user(&req, &state)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = Wizard::live(&template.valid_variables());

    if !wizard.has_fields() {
        log::warn!("Template {} has no configured variables", template.id);
    }
    log::debug!("Live wizard for template {} requested by {}", template.id, claims.user_id());

    let position = WizardState::new(Default::default(), query.step.unwrap_or(0));
    Ok(HttpResponse::Ok().json(wizard_response(&template, &wizard, &position)))
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/wizard/advance",
    tag = "Templates",
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    request_body = WizardState,
    responses(
        (status = 200, description = "Next step, or the reason advancing was refused", body = AdvanceResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn advance_wizard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<WizardState>,
) -> Result<HttpResponse, ApiError> {
    require_user(&req, &state)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = Wizard::live(&template.valid_variables());

    let current = wizard.clamp(&body.into_inner());
    let (next, outcome, errors) = AdvanceResponse::from_advance(wizard.advance(&current), current);

    Ok(HttpResponse::Ok().json(AdvanceResponse {
        outcome,
        view: wizard.view(&next),
        state: next,
        errors,
    }))
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/preview",
    tag = "Templates",
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Rendered content with unresolved lines flagged", body = PreviewResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn preview(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PreviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let template = load_template(&state, path.into_inner()).await?;
    let request = body.into_inner();

    let rendered = template.compile().render(&request.values, request.mode);
    Ok(HttpResponse::Ok().json(PreviewResponse::new(template.id, request.mode, rendered)))
}

/// Describe a template's wizard without a user context (used by MCP).
pub fn describe(template: &Template, mode: WizardMode) -> Result<WizardResponse, ApiError> {
    let wizard = template
        .wizard(mode)
        .ok_or(ApiError::TemplateNotConfigured(template.id))?;
    Ok(wizard_response(template, &wizard, &WizardState::default()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/templates/{id}/wizard").route(web::get().to(get_wizard)))
        .service(
            web::resource("/templates/{id}/wizard/advance").route(web::post().to(advance_wizard)),
        )
        .service(web::resource("/templates/{id}/preview").route(web::post().to(preview)));
}
