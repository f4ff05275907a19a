//! In-memory stores for local runs and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    DocumentStore, GeneratedDocument, GuestKey, GuestSessionStore, NewGeneratedDocument,
    StoreError, TemplateStore,
};
use crate::template::{GuestSession, Template};

/// Templates and generated documents kept in process memory.
#[derive(Default)]
pub struct MemoryStore {
    templates: RwLock<HashMap<Uuid, Template>>,
    documents: RwLock<Vec<GeneratedDocument>>,
    fail_saves: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let store = Self::new();
        for template in templates {
            store.insert_template(template);
        }
        store
    }

    pub fn insert_template(&self, template: Template) {
        self.templates.write().insert(template.id, template);
    }

    pub fn documents(&self) -> Vec<GeneratedDocument> {
        self.documents.read().clone()
    }

    /// Make every following save fail, to exercise best-effort persistence.
    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.write() = fail;
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn fetch_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        Ok(self.templates.read().get(id).cloned())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save_generated_document(
        &self,
        document: NewGeneratedDocument,
    ) -> Result<GeneratedDocument, StoreError> {
        if *self.fail_saves.read() {
            return Err(StoreError::Unavailable("saves disabled".to_string()));
        }
        let saved = GeneratedDocument::from_new(document);
        self.documents.write().push(saved.clone());
        Ok(saved)
    }

    async fn documents_for_user(&self, user_id: &str) -> Result<Vec<GeneratedDocument>, StoreError> {
        let mut documents: Vec<GeneratedDocument> = self
            .documents
            .read()
            .iter()
            .filter(|doc| doc.user_id == user_id)
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }
}

/// Guest sessions held in a TTL cache; abandoned wizards simply expire.
#[derive(Clone)]
pub struct MemoryGuestSessionStore {
    sessions: Cache<GuestKey, GuestSession>,
}

impl MemoryGuestSessionStore {
    pub fn new(ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(50_000)
            .build();
        Self { sessions }
    }
}

#[async_trait]
impl GuestSessionStore for MemoryGuestSessionStore {
    async fn get(&self, key: &GuestKey) -> Option<GuestSession> {
        self.sessions.get(key).await
    }

    async fn set(&self, key: GuestKey, session: GuestSession) {
        self.sessions.insert(key, session).await;
    }

    async fn remove(&self, key: &GuestKey) {
        self.sessions.invalidate(key).await;
    }
}
