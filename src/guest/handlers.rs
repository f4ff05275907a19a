use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use super::guest_id;
use super::model::{
    ClaimRequest, ClaimResponse, GuestAdvanceRequest, GuestSessionResponse, GuestWizardResponse,
    UpdateGuestSessionRequest,
};
use crate::error::ApiError;
use crate::store::GuestKey;
use crate::template::{merge_guest_values, GuestSession, Template, Wizard, WizardState};
use crate::templates::handlers::require_user;
use crate::templates::load_template;
use crate::templates::model::{AdvanceOutcome, AdvanceResponse};
use crate::{AppState, ErrorResponse};

fn guest_wizard(template: &Template) -> Result<Wizard, ApiError> {
    Wizard::guest(&template.valid_variables()).ok_or_else(|| {
        log::warn!("Template {} has no variables usable in guest mode", template.id);
        ApiError::TemplateNotConfigured(template.id)
    })
}

async fn stored_state(state: &AppState, key: &GuestKey, wizard: &Wizard) -> (WizardState, bool) {
    match state.guest_sessions.get(key).await {
        Some(session) => (wizard.clamp(&session.to_state()), true),
        None => (WizardState::default(), false),
    }
}

async fn save(state: &AppState, key: GuestKey, wizard_state: &WizardState) -> GuestSession {
    let session = GuestSession::from_state(wizard_state);
    state.guest_sessions.set(key, session.clone()).await;
    session
}

#[utoipa::path(
    get,
    path = "/api/guest/templates/{id}",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Client-generated guest identifier")
    ),
    responses(
        (status = 200, description = "Guest wizard, resumed if a session exists", body = GuestWizardResponse),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 422, description = "Template has no variables usable in guest mode", body = ErrorResponse)
    )
)]
pub async fn get_guest_wizard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let guest = guest_id(&req)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = guest_wizard(&template)?;
    let key = GuestKey::new(guest, template.id);

    let (current, resumed) = stored_state(&state, &key, &wizard).await;
    if resumed {
        log::info!("Resuming guest session for template {}", template.id);
    }

    let gate = wizard.gate().map(|g| g.allowed_steps).unwrap_or(1);
    Ok(HttpResponse::Ok().json(GuestWizardResponse {
        template_id: template.id,
        name: template.name.clone(),
        total_steps: wizard.total_steps(),
        allowed_steps: gate,
        steps: wizard.steps().to_vec(),
        resumed,
        session: GuestSession::from_state(&current),
        view: wizard.view(&current),
    }))
}

#[utoipa::path(
    put,
    path = "/api/guest/templates/{id}/session",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Client-generated guest identifier")
    ),
    request_body = UpdateGuestSessionRequest,
    responses(
        (status = 200, description = "Session saved; edits to locked fields are discarded", body = GuestSessionResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn update_guest_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateGuestSessionRequest>,
) -> Result<HttpResponse, ApiError> {
    let guest = guest_id(&req)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = guest_wizard(&template)?;
    let key = GuestKey::new(guest, template.id);

    let (current, _) = stored_state(&state, &key, &wizard).await;
    let mut next = wizard.apply_edits(&current, &body.form_data);
    if let Some(step) = body.current_step_index {
        next.current_step = step.min(next.current_step);
    }

    let session = save(&state, key, &next).await;
    Ok(HttpResponse::Ok().json(GuestSessionResponse {
        session,
        view: wizard.view(&next),
    }))
}

#[utoipa::path(
    post,
    path = "/api/guest/templates/{id}/advance",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Client-generated guest identifier")
    ),
    request_body = GuestAdvanceRequest,
    responses(
        (status = 200, description = "Moved, blocked on required fields, or login required", body = AdvanceResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn advance_guest(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<GuestAdvanceRequest>,
) -> Result<HttpResponse, ApiError> {
    let guest = guest_id(&req)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = guest_wizard(&template)?;
    let key = GuestKey::new(guest, template.id);

    let (stored, _) = stored_state(&state, &key, &wizard).await;
    let current = wizard.apply_edits(&stored, &body.form_data);
    let (next, outcome, errors) = AdvanceResponse::from_advance(wizard.advance(&current), current);

    if wizard.is_gated(next.current_step) || matches!(outcome, AdvanceOutcome::LoginRequired) {
        log::info!(
            "Guest reached the login gate on template {} at step {}",
            template.id,
            next.current_step
        );
    }
    save(&state, key, &next).await;

    Ok(HttpResponse::Ok().json(AdvanceResponse {
        outcome,
        view: wizard.view(&next),
        state: next,
        errors,
    }))
}

#[utoipa::path(
    post,
    path = "/api/guest/templates/{id}/back",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Client-generated guest identifier")
    ),
    responses(
        (status = 200, description = "Previous step", body = GuestSessionResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn back_guest(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let guest = guest_id(&req)?;
    let template = load_template(&state, path.into_inner()).await?;
    let wizard = guest_wizard(&template)?;
    let key = GuestKey::new(guest, template.id);

    let (current, _) = stored_state(&state, &key, &wizard).await;
    let previous = wizard.back(&current);
    let session = save(&state, key, &previous).await;

    Ok(HttpResponse::Ok().json(GuestSessionResponse {
        session,
        view: wizard.view(&previous),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/guest/templates/{id}/session",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Client-generated guest identifier")
    ),
    responses(
        (status = 204, description = "Session removed")
    )
)]
pub async fn delete_guest_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let guest = guest_id(&req)?;
    state
        .guest_sessions
        .remove(&GuestKey::new(guest, path.into_inner()))
        .await;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/templates/{id}/claim-guest-session",
    tag = "Guest",
    params(
        ("id" = Uuid, Path, description = "Template ID"),
        ("X-Guest-Id" = String, Header, description = "Guest identifier used before login")
    ),
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Guest values merged into the authenticated form; guest copy deleted", body = ClaimResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn claim_guest_session(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ClaimRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_user(&req, &state)?;
    let guest = guest_id(&req)?;
    let template = load_template(&state, path.into_inner()).await?;
    let key = GuestKey::new(guest, template.id);

    let Some(session) = state.guest_sessions.get(&key).await else {
        return Ok(HttpResponse::Ok().json(ClaimResponse {
            template_id: template.id,
            claimed: false,
            values: body.into_inner().values,
        }));
    };

    let merged = merge_guest_values(&body.values, &session.form_data);
    let live = Wizard::live(&template.valid_variables());
    let values = live.apply_edits(&WizardState::default(), &merged).values;

    state.guest_sessions.remove(&key).await;
    log::info!(
        "User {} claimed guest session for template {} ({} values)",
        claims.user_id(),
        template.id,
        values.len()
    );

    Ok(HttpResponse::Ok().json(ClaimResponse {
        template_id: template.id,
        claimed: true,
        values,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/guest/templates/{id}").route(web::get().to(get_guest_wizard)))
        .service(
            web::resource("/guest/templates/{id}/session")
                .route(web::put().to(update_guest_session))
                .route(web::delete().to(delete_guest_session)),
        )
        .service(web::resource("/guest/templates/{id}/advance").route(web::post().to(advance_guest)))
        .service(web::resource("/guest/templates/{id}/back").route(web::post().to(back_guest)))
        .service(
            web::resource("/templates/{id}/claim-guest-session")
                .route(web::post().to(claim_guest_session)),
        );
}
