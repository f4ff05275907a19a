//! Cache-first template reads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use uuid::Uuid;

use super::{StoreError, TemplateStore};
use crate::template::Template;

/// Wraps a template store with a TTL cache. Misses are not cached, so a
/// template created after a 404 shows up on the next request.
pub struct CachedTemplateStore {
    inner: Arc<dyn TemplateStore + Send + Sync>,
    cache: Cache<Uuid, Template>,
}

impl CachedTemplateStore {
    pub fn new(inner: Arc<dyn TemplateStore + Send + Sync>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(500)
            .build();
        Self { inner, cache }
    }

    pub async fn invalidate(&self, id: &Uuid) {
        self.cache.invalidate(id).await;
    }
}

#[async_trait]
impl TemplateStore for CachedTemplateStore {
    async fn fetch_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        if let Some(template) = self.cache.get(id).await {
            log::debug!("Template cache hit for {}", id);
            return Ok(Some(template));
        }

        log::debug!("Template cache miss for {}", id);
        let template = self.inner.fetch_template(id).await?;
        if let Some(ref found) = template {
            self.cache.insert(*id, found.clone()).await;
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_serves_from_cache_after_first_read() {
        let id = Uuid::new_v4();
        let backing = Arc::new(MemoryStore::with_templates([Template {
            id,
            name: "Devis".into(),
            content: Some("v1".into()),
            variables: json!([]),
        }]));
        let cached = CachedTemplateStore::new(backing.clone(), Duration::from_secs(60));

        let first = cached.fetch_template(&id).await.unwrap().unwrap();
        assert_eq!(first.content.as_deref(), Some("v1"));

        backing.insert_template(Template {
            id,
            name: "Devis".into(),
            content: Some("v2".into()),
            variables: json!([]),
        });
        let second = cached.fetch_template(&id).await.unwrap().unwrap();
        assert_eq!(second.content.as_deref(), Some("v1"));

        cached.invalidate(&id).await;
        let third = cached.fetch_template(&id).await.unwrap().unwrap();
        assert_eq!(third.content.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let backing = Arc::new(MemoryStore::new());
        let cached = CachedTemplateStore::new(backing.clone(), Duration::from_secs(60));
        let id = Uuid::new_v4();

        assert!(cached.fetch_template(&id).await.unwrap().is_none());
        backing.insert_template(Template {
            id,
            name: "Nouveau".into(),
            content: None,
            variables: json!([]),
        });
        assert!(cached.fetch_template(&id).await.unwrap().is_some());
    }
}
