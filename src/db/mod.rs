//! Database module - AppState and Postgres-backed stores
//!
//! - `template` - template lookups
//! - `document` - generated document persistence

mod document;
mod template;

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::render::{DocumentRenderer, TypstRenderEngine};
use crate::store::{
    CachedTemplateStore, DocumentStore, GuestSessionStore, MemoryGuestSessionStore,
    NewGeneratedDocument, TemplateStore,
};

const PERSIST_QUEUE_SIZE: usize = 100;

/// Postgres implementation of the template and document stores.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateStore + Send + Sync>,
    pub documents: Arc<dyn DocumentStore + Send + Sync>,
    pub guest_sessions: Arc<dyn GuestSessionStore + Send + Sync>,
    pub renderer: Arc<dyn DocumentRenderer + Send + Sync>,
    pub document_persist_sender: mpsc::Sender<NewGeneratedDocument>,
    pub jwt_secret: String,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(50)
            .min_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(std::time::Duration::from_secs(900))
            .max_lifetime(std::time::Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("Database migrations applied");

        let store = Arc::new(PgStore::new(pool));
        let templates = Arc::new(CachedTemplateStore::new(
            store.clone(),
            config.template_cache_ttl,
        ));

        Ok(Self::with_stores(
            templates,
            store,
            Arc::new(MemoryGuestSessionStore::new(config.guest_session_ttl)),
            Arc::new(TypstRenderEngine::new(config.typst_bin.clone())),
            config.jwt_secret.clone(),
        ))
    }

    /// Wire the state from explicit collaborators and start the background
    /// persistence worker. Must be called inside a tokio runtime.
    pub fn with_stores(
        templates: Arc<dyn TemplateStore + Send + Sync>,
        documents: Arc<dyn DocumentStore + Send + Sync>,
        guest_sessions: Arc<dyn GuestSessionStore + Send + Sync>,
        renderer: Arc<dyn DocumentRenderer + Send + Sync>,
        jwt_secret: impl Into<String>,
    ) -> Self {
        let (document_persist_sender, receiver) = mpsc::channel(PERSIST_QUEUE_SIZE);

        let documents_clone = documents.clone();
        tokio::spawn(async move {
            crate::documents::persistence::start_persistence_worker(receiver, documents_clone)
                .await;
        });

        Self {
            templates,
            documents,
            guest_sessions,
            renderer,
            document_persist_sender,
            jwt_secret: jwt_secret.into(),
        }
    }
}
