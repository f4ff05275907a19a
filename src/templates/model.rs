use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::template::{
    Advance, FormValues, GuestGate, PreviewLine, RenderMode, Rendered, StepView, ValidationError,
    WizardMode, WizardState, WizardStep,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct WizardResponse {
    pub template_id: Uuid,
    pub name: String,
    pub mode: WizardMode,
    /// False when the template declares no usable variable
    pub has_variables: bool,
    pub total_steps: usize,
    pub steps: Vec<WizardStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GuestGate>,
    pub view: StepView,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WizardQuery {
    /// Step to display, clamped to the reachable range
    pub step: Option<usize>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreviewRequest {
    #[serde(default)]
    pub values: FormValues,
    #[serde(default)]
    pub mode: RenderMode,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub template_id: Uuid,
    pub mode: RenderMode,
    pub content: String,
    /// True once every token has a value
    pub complete: bool,
    pub missing: Vec<String>,
    pub lines: Vec<PreviewLine>,
}

impl PreviewResponse {
    pub fn new(template_id: Uuid, mode: RenderMode, rendered: Rendered) -> Self {
        Self {
            template_id,
            mode,
            complete: rendered.is_complete(),
            lines: rendered.lines(),
            missing: rendered.missing,
            content: rendered.content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceOutcome {
    Moved,
    Blocked,
    LoginRequired,
    Completed,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    pub outcome: AdvanceOutcome,
    pub state: WizardState,
    pub view: StepView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl AdvanceResponse {
    /// Split an engine result into the state to keep and the response fields.
    /// A blocked advance keeps `current`.
    pub fn from_advance(advance: Advance, current: WizardState) -> (WizardState, AdvanceOutcome, Vec<ValidationError>) {
        match advance {
            Advance::Moved(state) => (state, AdvanceOutcome::Moved, Vec::new()),
            Advance::Blocked(errors) => (current, AdvanceOutcome::Blocked, errors.errors().to_vec()),
            Advance::LoginRequired(state) => (state, AdvanceOutcome::LoginRequired, Vec::new()),
            Advance::Completed(state) => (state, AdvanceOutcome::Completed, Vec::new()),
        }
    }
}
