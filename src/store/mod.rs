//! Collaborator boundaries used by the HTTP and MCP layers.
//!
//! - `TemplateStore` - fetch a template by id
//! - `DocumentStore` - persist and list generated documents
//! - `GuestSessionStore` - keep unfinished guest wizards between requests
//!
//! Postgres implementations live in `crate::db`; in-memory ones in `memory`.

pub mod cache;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::template::{FormValues, GuestSession, Template};

pub use cache::CachedTemplateStore;
pub use memory::{MemoryGuestSessionStore, MemoryStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to encode stored data: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document to persist after a successful final render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGeneratedDocument {
    pub template_id: Uuid,
    pub user_id: String,
    pub values: FormValues,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedDocument {
    pub id: Uuid,
    pub template_id: Uuid,
    pub user_id: String,
    pub values: FormValues,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedDocument {
    pub fn from_new(document: NewGeneratedDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id: document.template_id,
            user_id: document.user_id,
            values: document.values,
            content: document.content,
            created_at: Utc::now(),
        }
    }
}

/// Guest sessions are scoped to one visitor and one template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuestKey {
    pub guest_id: String,
    pub template_id: Uuid,
}

impl GuestKey {
    pub fn new(guest_id: impl Into<String>, template_id: Uuid) -> Self {
        Self {
            guest_id: guest_id.into(),
            template_id,
        }
    }
}

#[async_trait]
pub trait TemplateStore {
    /// `Ok(None)` when no template has this id.
    async fn fetch_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError>;
}

#[async_trait]
pub trait DocumentStore {
    async fn save_generated_document(
        &self,
        document: NewGeneratedDocument,
    ) -> Result<GeneratedDocument, StoreError>;

    /// Newest first.
    async fn documents_for_user(&self, user_id: &str) -> Result<Vec<GeneratedDocument>, StoreError>;
}

#[async_trait]
pub trait GuestSessionStore {
    async fn get(&self, key: &GuestKey) -> Option<GuestSession>;
    async fn set(&self, key: GuestKey, session: GuestSession);
    async fn remove(&self, key: &GuestKey);
}
