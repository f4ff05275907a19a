//! Template engine - variable normalization, step partitioning, guest gating
//! and token substitution.
//!
//! Everything in this module is synchronous and free of I/O. Stores, caches
//! and renderers live at the edges and only hand data in and out.

pub mod gating;
pub mod render;
pub mod session;
pub mod steps;
pub mod validation;
pub mod variable;
pub mod wizard;

pub use gating::{allowed_steps, GuestGate};
pub use render::{line_has_placeholder, render, CompiledTemplate, PreviewLine, RenderMode, Rendered};
pub use session::{merge_guest_values, FormValues, GuestSession, WizardState};
pub use steps::{partition_steps, StepPolicy, WizardStep, LIVE_STEP_SIZE};
pub use validation::{validate_fields, ValidationError, ValidationErrors};
pub use variable::{normalize_variables, TemplateVariable, VariableType};
pub use wizard::{Advance, NextAction, StepView, Wizard, WizardMode};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document blueprint as stored. `variables` is kept raw until it goes
/// through [`normalize_variables`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub content: Option<String>,
    pub variables: serde_json::Value,
}

impl Template {
    pub fn valid_variables(&self) -> Vec<TemplateVariable> {
        normalize_variables(&self.variables)
    }

    pub fn compile(&self) -> CompiledTemplate {
        CompiledTemplate::compile(self.content.as_deref())
    }

    /// Build the wizard for a mode. `None` means the template is not usable
    /// in that mode.
    pub fn wizard(&self, mode: WizardMode) -> Option<Wizard> {
        let variables = self.valid_variables();
        match mode {
            WizardMode::Live => Some(Wizard::live(&variables)),
            WizardMode::Guest => Wizard::guest(&variables),
        }
    }
}
