use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::GeneratedDocument;
use crate::template::FormValues;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub values: FormValues,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub total: usize,
    pub documents: Vec<GeneratedDocument>,
}

impl DocumentListResponse {
    pub fn new(documents: Vec<GeneratedDocument>) -> Self {
        Self {
            total: documents.len(),
            documents,
        }
    }
}
