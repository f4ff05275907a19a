use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod guest;
pub mod mcp;
pub mod render;
pub mod store;
pub mod template;
pub mod templates;

pub use crate::config::AppConfig;
pub use crate::db::AppState;
pub use crate::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::templates::handlers::get_wizard,
        crate::templates::handlers::advance_wizard,
        crate::templates::handlers::preview,
        crate::documents::handlers::generate,
        crate::documents::handlers::list_documents,
        crate::guest::handlers::get_guest_wizard,
        crate::guest::handlers::update_guest_session,
        crate::guest::handlers::advance_guest,
        crate::guest::handlers::back_guest,
        crate::guest::handlers::delete_guest_session,
        crate::guest::handlers::claim_guest_session
    ),
    components(
        schemas(
            ErrorResponse,
            error::FieldError,
            template::TemplateVariable,
            template::VariableType,
            template::WizardStep,
            template::WizardMode,
            template::WizardState,
            template::StepView,
            template::NextAction,
            template::GuestGate,
            template::GuestSession,
            template::RenderMode,
            template::PreviewLine,
            template::ValidationError,
            templates::model::WizardResponse,
            templates::model::PreviewRequest,
            templates::model::PreviewResponse,
            templates::model::AdvanceOutcome,
            templates::model::AdvanceResponse,
            documents::model::GenerateRequest,
            documents::model::DocumentListResponse,
            store::GeneratedDocument,
            guest::model::GuestWizardResponse,
            guest::model::UpdateGuestSessionRequest,
            guest::model::GuestAdvanceRequest,
            guest::model::GuestSessionResponse,
            guest::model::ClaimRequest,
            guest::model::ClaimResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Templates", description = "Authenticated wizard and preview endpoints."),
        (name = "Documents", description = "Final document generation and history."),
        (name = "Guest", description = "Guest wizard with login gate and session claim.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Local server")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Routes mounted under `/api`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(templates::handlers::config)
        .configure(documents::handlers::config)
        .configure(guest::handlers::config);
}

pub fn mcp_state() -> web::Data<Arc<mcp::McpState>> {
    let service = mcp::McpService::new(mcp::tools::ToolRegistry::new());
    web::Data::new(Arc::new(mcp::McpState::new(service)))
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = match AppState::new(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to connect to database. Check DATABASE_URL and ensure the database is running. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };
    let mcp_state = mcp_state();

    let prometheus = PrometheusMetricsBuilder::new("smartfill_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    let allowed_origins = config.allowed_origins.clone();
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::HeaderName::from_static("x-guest-id"),
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(app_state.clone())
            .app_data(mcp_state.clone())
            .service(web::scope("/api").configure(configure_api))
            .configure(mcp::config)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(config.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
