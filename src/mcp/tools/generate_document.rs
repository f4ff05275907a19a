//! MCP tool producing the final PDF for the calling user.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::registry::ToolDescriptor;
use crate::template::FormValues;

pub const TOOL_NAME: &str = "generate_document";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "Génère le document final (PDF) d'un modèle. Tous les champs obligatoires ",
            "doivent être remplis ; le document est ajouté à l'historique de l'utilisateur."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "template_id": {
                    "type": "string",
                    "description": "Identifiant du modèle (UUID)"
                },
                "values": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Valeurs saisies, par nom de variable"
                }
            },
            "required": ["template_id", "values"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub template_id: String,
    pub values: FormValues,
}

impl GenerateDocumentRequest {
    pub fn validate(&self) -> Result<Uuid, String> {
        super::parse_template_id(&self.template_id)
    }
}
