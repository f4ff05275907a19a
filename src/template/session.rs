//! Explicit wizard state values passed into the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Variable name to user-entered value. Every value is a string.
pub type FormValues = BTreeMap<String, String>;

/// Position and values of a wizard in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WizardState {
    #[serde(default)]
    pub values: FormValues,
    #[serde(default)]
    pub current_step: usize,
}

impl WizardState {
    pub fn new(values: FormValues, current_step: usize) -> Self {
        Self {
            values,
            current_step,
        }
    }
}

/// Partially completed guest wizard, stored so it survives a reload and can be
/// picked up again after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestSession {
    pub form_data: FormValues,
    pub current_step_index: usize,
    pub timestamp: DateTime<Utc>,
}

impl GuestSession {
    pub fn from_state(state: &WizardState) -> Self {
        Self {
            form_data: state.values.clone(),
            current_step_index: state.current_step,
            timestamp: Utc::now(),
        }
    }

    pub fn to_state(&self) -> WizardState {
        WizardState::new(self.form_data.clone(), self.current_step_index)
    }
}

/// Fold guest values into an authenticated form. Guest data only fills
/// fields the authenticated form leaves empty.
pub fn merge_guest_values(authenticated: &FormValues, guest: &FormValues) -> FormValues {
    let mut merged = authenticated.clone();
    for (name, value) in guest {
        let empty = merged.get(name).map_or(true, |current| current.is_empty());
        if empty && !value.is_empty() {
            merged.insert(name.clone(), value.clone());
        }
    }
    merged
}
