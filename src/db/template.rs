//! Template database operations

use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::store::{StoreError, TemplateStore};
use crate::template::Template;

#[async_trait]
impl TemplateStore for PgStore {
    async fn fetch_template(&self, id: &Uuid) -> Result<Option<Template>, StoreError> {
        let template = sqlx::query_as::<_, Template>(
            "SELECT id, name, content, COALESCE(variables, 'null'::jsonb) AS variables FROM templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(template)
    }
}
