//! Generated document database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::PgStore;
use crate::store::{DocumentStore, GeneratedDocument, NewGeneratedDocument, StoreError};
use crate::template::FormValues;

#[derive(sqlx::FromRow)]
struct GeneratedDocumentRow {
    id: Uuid,
    template_id: Uuid,
    user_id: String,
    form_values: Json<FormValues>,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<GeneratedDocumentRow> for GeneratedDocument {
    fn from(row: GeneratedDocumentRow) -> Self {
        Self {
            id: row.id,
            template_id: row.template_id,
            user_id: row.user_id,
            values: row.form_values.0,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn save_generated_document(
        &self,
        document: NewGeneratedDocument,
    ) -> Result<GeneratedDocument, StoreError> {
        let row = sqlx::query_as::<_, GeneratedDocumentRow>(
            r#"
            INSERT INTO generated_documents (id, template_id, user_id, form_values, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, template_id, user_id, form_values, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(document.template_id)
        .bind(&document.user_id)
        .bind(Json(&document.values))
        .bind(&document.content)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn documents_for_user(&self, user_id: &str) -> Result<Vec<GeneratedDocument>, StoreError> {
        let rows = sqlx::query_as::<_, GeneratedDocumentRow>(
            r#"
            SELECT id, template_id, user_id, form_values, content, created_at
            FROM generated_documents
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(GeneratedDocument::from).collect())
    }
}
