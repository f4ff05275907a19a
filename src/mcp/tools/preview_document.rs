//! MCP tool rendering a template against partial values.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::registry::ToolDescriptor;
use crate::template::{FormValues, RenderMode};

pub const TOOL_NAME: &str = "preview_document";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "Affiche l'aperçu d'un document à partir de valeurs partielles. ",
            "Les variables sans valeur apparaissent sous la forme [nom] et les lignes ",
            "concernées sont signalées."
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
                },
                "mode": {
                    "type": "string",
                    "enum": ["preview", "final", "blank"],
                    "description": "Rendu des variables manquantes (défaut : preview)"
                }
            },
            "required": ["template_id"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewDocumentRequest {
    pub template_id: String,
    #[serde(default)]
    pub values: FormValues,
    #[serde(default)]
    pub mode: RenderMode,
}

impl PreviewDocumentRequest {
    pub fn validate(&self) -> Result<Uuid, String> {
        super::parse_template_id(&self.template_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req: PreviewDocumentRequest =
            serde_json::from_value(json!({ "template_id": "not-a-uuid" })).unwrap();
        assert_eq!(req.mode, RenderMode::Preview);
        assert!(req.values.is_empty());
        assert!(req.validate().is_err());
    }
}
