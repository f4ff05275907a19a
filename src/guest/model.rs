use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::template::{FormValues, GuestSession, StepView, WizardStep};

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestWizardResponse {
    pub template_id: Uuid,
    pub name: String,
    pub total_steps: usize,
    pub allowed_steps: usize,
    pub steps: Vec<WizardStep>,
    /// True when a stored session was picked up
    pub resumed: bool,
    pub session: GuestSession,
    pub view: StepView,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuestSessionRequest {
    #[serde(default)]
    pub form_data: FormValues,
    /// Only moves backwards; forward moves go through `advance`
    #[serde(default)]
    pub current_step_index: Option<usize>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestAdvanceRequest {
    #[serde(default)]
    pub form_data: FormValues,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestSessionResponse {
    pub session: GuestSession,
    pub view: StepView,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClaimRequest {
    /// Values already entered in the authenticated form
    #[serde(default)]
    pub values: FormValues,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimResponse {
    pub template_id: Uuid,
    pub claimed: bool,
    pub values: FormValues,
}
