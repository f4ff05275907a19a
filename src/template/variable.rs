//! Template variable definitions and the normalization boundary.
//!
//! Variable lists come out of a schema-less JSON column, so nothing downstream
//! trusts them directly. [`normalize_variables`] is the only place that looks at
//! the raw shape; everything else works with [`TemplateVariable`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Input kind of a fillable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Text,
    Number,
    Date,
    Textarea,
    Email,
    Tel,
    Select,
}

impl VariableType {
    /// Parse the stored type tag. Unknown tags fall back to `Text`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "date" => Self::Date,
            "textarea" => Self::Textarea,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "select" => Self::Select,
            "text" => Self::Text,
            other => {
                log::debug!("Unknown variable type '{}', treating it as text", other);
                Self::Text
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Select => "select",
        }
    }
}

/// One fillable field of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateVariable {
    /// Substitution token, unique within a template
    #[schema(example = "nom_client")]
    pub name: String,
    #[schema(example = "Nom du client")]
    pub label: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Choices, only present for `select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl TemplateVariable {
    pub fn new(name: impl Into<String>, label: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            var_type,
            required: false,
            placeholder: None,
            description: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Convert one raw record. Returns `None` when `name`, `label` or `type`
    /// is missing, empty, or not a string.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let record = raw.as_object()?;

        let name = non_empty_str(record, "name")?;
        let label = non_empty_str(record, "label")?;
        let var_type = VariableType::from_tag(non_empty_str(record, "type")?);

        let options = if var_type == VariableType::Select {
            record
                .get("options")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Some(Self {
            name: name.to_string(),
            label: label.to_string(),
            var_type,
            required: record
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            placeholder: optional_str(record, "placeholder"),
            description: optional_str(record, "description"),
            options,
        })
    }
}

fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

fn optional_str(record: &Map<String, Value>, key: &str) -> Option<String> {
    non_empty_str(record, key).map(str::to_string)
}

/// Turn a raw, possibly malformed variable list into trusted variables.
///
/// Never fails. Anything that is not an array yields an empty list, invalid
/// records are skipped, and the relative order of valid ones is kept.
pub fn normalize_variables(raw: &Value) -> Vec<TemplateVariable> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            log::warn!("Template variables are not an array, ignoring them");
        }
        return Vec::new();
    };

    let variables: Vec<TemplateVariable> = items.iter().filter_map(TemplateVariable::from_raw).collect();

    let dropped = items.len() - variables.len();
    if dropped > 0 {
        log::debug!("Dropped {} malformed template variable(s)", dropped);
    }

    variables
}
