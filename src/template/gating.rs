//! How far an unauthenticated visitor may get through a guest wizard.

use serde::Serialize;
use utoipa::ToSchema;

/// Share of the steps a guest may complete before logging in.
pub const GUEST_ALLOWED_FRACTION: f64 = 0.5;

/// `ceil(total * 0.5)`, never less than one.
pub fn allowed_steps(total_steps: usize) -> usize {
    ((total_steps as f64 * GUEST_ALLOWED_FRACTION).ceil() as usize).max(1)
}

/// Gate computed from the number of guest steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct GuestGate {
    pub total_steps: usize,
    pub allowed_steps: usize,
}

impl GuestGate {
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            allowed_steps: allowed_steps(total_steps),
        }
    }

    /// Index of the last step a guest may reach.
    pub fn last_allowed_step(&self) -> usize {
        self.allowed_steps - 1
    }

    pub fn is_reachable(&self, step: usize) -> bool {
        step < self.allowed_steps && step < self.total_steps.max(1)
    }

    /// The lock applies on the last allowed step, except when that step is
    /// the very first one.
    pub fn is_gated(&self, current_step: usize) -> bool {
        current_step == self.last_allowed_step() && current_step > 0
    }

    /// Whether "next" from `current_step` would leave the allowed range while
    /// the form still has steps after it.
    pub fn next_requires_login(&self, current_step: usize) -> bool {
        let next = current_step + 1;
        next < self.total_steps && next >= self.allowed_steps
    }
}
