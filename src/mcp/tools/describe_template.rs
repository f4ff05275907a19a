//! MCP tool describing a template's wizard.

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::registry::ToolDescriptor;
use crate::template::WizardMode;

pub const TOOL_NAME: &str = "describe_template";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "Décrit le formulaire d'un modèle de document : variables valides, ",
            "découpage en étapes et, en mode invité, l'étape à partir de laquelle ",
            "une connexion est requise."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "template_id": {
                    "type": "string",
                    "description": "Identifiant du modèle (UUID)"
                },
                "mode": {
                    "type": "string",
                    "enum": ["live", "guest"],
                    "description": "Mode du formulaire (défaut : live)"
                }
            },
            "required": ["template_id"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct DescribeTemplateRequest {
    pub template_id: String,
    #[serde(default)]
    pub mode: Option<WizardMode>,
}

impl DescribeTemplateRequest {
    pub fn validate(&self) -> Result<Uuid, String> {
        super::parse_template_id(&self.template_id)
    }

    pub fn mode(&self) -> WizardMode {
        self.mode.unwrap_or(WizardMode::Live)
    }
}
