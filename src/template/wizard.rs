//! Multi-step form driver.
//!
//! A [`Wizard`] is built from the trusted variable list and never changes. All
//! progress lives in a [`WizardState`] owned by the caller, which decides when
//! to persist it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::gating::GuestGate;
use super::session::{FormValues, WizardState};
use super::steps::{partition_steps, StepPolicy, WizardStep};
use super::validation::{validate_fields, ValidationErrors};
use super::variable::TemplateVariable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WizardMode {
    /// Authenticated fill, fields grouped by five
    Live,
    /// Unauthenticated preview, one field per step, gated
    Guest,
}

/// What the "next" button does on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Next,
    Login,
    Finish,
}

/// Everything a client needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StepView {
    pub current_step: usize,
    pub total_steps: usize,
    pub label: String,
    pub step: WizardStep,
    /// Inputs of this step are read-only
    pub locked: bool,
    pub next_action: NextAction,
    pub can_go_back: bool,
}

/// Outcome of asking for the next step.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(WizardState),
    /// Required fields of the current step are empty
    Blocked(ValidationErrors),
    /// The guest cannot go further without logging in
    LoginRequired(WizardState),
    /// There is no next step
    Completed(WizardState),
}

#[derive(Debug, Clone)]
pub struct Wizard {
    mode: WizardMode,
    steps: Vec<WizardStep>,
    gate: Option<GuestGate>,
}

impl Wizard {
    /// Authenticated wizard. Always has at least one step, possibly empty.
    pub fn live(variables: &[TemplateVariable]) -> Self {
        Self {
            mode: WizardMode::Live,
            steps: partition_steps(variables, StepPolicy::live()),
            gate: None,
        }
    }

    /// Guest wizard, or `None` when the template has no usable variables.
    pub fn guest(variables: &[TemplateVariable]) -> Option<Self> {
        if variables.is_empty() {
            return None;
        }
        let steps = partition_steps(variables, StepPolicy::OnePerStep);
        let gate = GuestGate::new(steps.len());
        Some(Self {
            mode: WizardMode::Guest,
            steps,
            gate: Some(gate),
        })
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn gate(&self) -> Option<GuestGate> {
        self.gate
    }

    pub fn has_fields(&self) -> bool {
        self.steps.iter().any(|step| !step.fields.is_empty())
    }

    /// Highest step index the caller may sit on.
    pub fn max_reachable_step(&self) -> usize {
        let last = self.total_steps().saturating_sub(1);
        match self.gate {
            Some(gate) => last.min(gate.last_allowed_step()),
            None => last,
        }
    }

    /// Pull an out-of-range position back inside the reachable steps.
    pub fn clamp(&self, state: &WizardState) -> WizardState {
        WizardState::new(
            state.values.clone(),
            state.current_step.min(self.max_reachable_step()),
        )
    }

    pub fn is_gated(&self, step: usize) -> bool {
        self.gate.is_some_and(|gate| gate.is_gated(step))
    }

    /// Whether the inputs of a step accept edits.
    pub fn is_step_editable(&self, step: usize) -> bool {
        step <= self.max_reachable_step() && !self.is_gated(step)
    }

    fn step_of(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .find(|step| step.field(name).is_some())
            .map(|step| step.index)
    }

    /// Copy edits into the state. Edits to locked, unreachable or unknown
    /// fields are discarded and the stored value is kept.
    pub fn apply_edits(&self, state: &WizardState, edits: &FormValues) -> WizardState {
        let mut next = self.clamp(state);
        for (name, value) in edits {
            match self.step_of(name) {
                Some(step) if self.is_step_editable(step) => {
                    next.values.insert(name.clone(), value.clone());
                }
                Some(step) => {
                    log::debug!("Ignoring edit to locked field '{}' on step {}", name, step);
                }
                None => {
                    log::debug!("Ignoring edit to unknown field '{}'", name);
                }
            }
        }
        next
    }

    fn next_action(&self, current: usize) -> NextAction {
        if self.is_gated(current) {
            return NextAction::Login;
        }
        if current + 1 >= self.total_steps() {
            return NextAction::Finish;
        }
        match self.gate {
            Some(gate) if gate.next_requires_login(current) => NextAction::Login,
            _ => NextAction::Next,
        }
    }

    pub fn view(&self, state: &WizardState) -> StepView {
        let current = self.clamp(state).current_step;
        let step = self.steps.get(current).cloned().unwrap_or(WizardStep {
            index: 0,
            fields: Vec::new(),
        });

        StepView {
            current_step: current,
            total_steps: self.total_steps(),
            label: step.label(),
            step,
            locked: self.is_gated(current),
            next_action: self.next_action(current),
            can_go_back: current > 0,
        }
    }

    pub fn advance(&self, state: &WizardState) -> Advance {
        let state = self.clamp(state);
        let current = state.current_step;

        if self.is_gated(current) {
            return Advance::LoginRequired(state);
        }

        if let Some(step) = self.steps.get(current) {
            let errors = validate_fields(&step.fields, &state.values);
            if !errors.is_empty() {
                return Advance::Blocked(errors);
            }
        }

        match self.next_action(current) {
            NextAction::Finish => Advance::Completed(state),
            NextAction::Login => Advance::LoginRequired(state),
            NextAction::Next => Advance::Moved(WizardState::new(state.values, current + 1)),
        }
    }

    pub fn back(&self, state: &WizardState) -> WizardState {
        let state = self.clamp(state);
        WizardState::new(state.values, state.current_step.saturating_sub(1))
    }

    /// Required fields across the whole form, used before final generation.
    pub fn validate_all(&self, values: &FormValues) -> ValidationErrors {
        validate_fields(self.steps.iter().flat_map(|step| &step.fields), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::variable::VariableType;

    fn required_vars(n: usize) -> Vec<TemplateVariable> {
        (0..n)
            .map(|i| {
                TemplateVariable::new(format!("v{i}"), format!("V{i}"), VariableType::Text)
                    .required()
            })
            .collect()
    }

    fn with(values: &[(&str, &str)], step: usize) -> WizardState {
        WizardState::new(
            values
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            step,
        )
    }

    #[test]
    fn test_guest_four_variables() {
        let wizard = Wizard::guest(&required_vars(4)).unwrap();
        assert_eq!(wizard.gate().unwrap().allowed_steps, 2);

        let start = wizard.view(&WizardState::default());
        assert!(!start.locked);
        assert_eq!(start.next_action, NextAction::Next);

        let moved = match wizard.advance(&with(&[("v0", "a")], 0)) {
            Advance::Moved(state) => state,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(moved.current_step, 1);

        let view = wizard.view(&moved);
        assert!(view.locked);
        assert_eq!(view.next_action, NextAction::Login);
        assert!(matches!(wizard.advance(&moved), Advance::LoginRequired(_)));

        let jumped = wizard.clamp(&with(&[], 3));
        assert_eq!(jumped.current_step, 1);
    }

    #[test]
    fn test_guest_single_variable_not_gated() {
        let wizard = Wizard::guest(&required_vars(1)).unwrap();
        let view = wizard.view(&WizardState::default());
        assert!(!view.locked);
        assert_eq!(view.next_action, NextAction::Finish);
        assert!(matches!(
            wizard.advance(&with(&[("v0", "x")], 0)),
            Advance::Completed(_)
        ));
    }

    #[test]
    fn test_guest_two_variables_login_after_first() {
        let wizard = Wizard::guest(&required_vars(2)).unwrap();
        let view = wizard.view(&WizardState::default());
        assert!(!view.locked);
        assert_eq!(view.next_action, NextAction::Login);
        assert!(matches!(
            wizard.advance(&with(&[("v0", "x")], 0)),
            Advance::LoginRequired(_)
        ));
    }

    #[test]
    fn test_guest_without_variables() {
        assert!(Wizard::guest(&[]).is_none());
    }

    #[test]
    fn test_advance_blocked_on_required() {
        let wizard = Wizard::live(&required_vars(7));
        match wizard.advance(&with(&[("v0", "a"), ("v1", "b")], 0)) {
            Advance::Blocked(errors) => assert_eq!(errors.fields(), vec!["v2", "v3", "v4"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_locked_step_rejects_edits() {
        let wizard = Wizard::guest(&required_vars(4)).unwrap();
        let state = with(&[("v0", "a")], 1);
        let edits: FormValues = [("v0", "b"), ("v1", "x"), ("v3", "y"), ("zz", "z")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let next = wizard.apply_edits(&state, &edits);
        assert_eq!(next.values.get("v0").map(String::as_str), Some("b"));
        assert!(!next.values.contains_key("v1"));
        assert!(!next.values.contains_key("v3"));
        assert!(!next.values.contains_key("zz"));
    }

    #[test]
    fn test_live_walkthrough() {
        let wizard = Wizard::live(&required_vars(12));
        assert_eq!(wizard.total_steps(), 3);

        let mut state = WizardState::default();
        for i in 0..12 {
            state.values.insert(format!("v{i}"), "ok".into());
        }
        state = match wizard.advance(&state) {
            Advance::Moved(s) => s,
            other => panic!("unexpected {other:?}"),
        };
        state = match wizard.advance(&state) {
            Advance::Moved(s) => s,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(wizard.view(&state).step.fields.len(), 2);
        assert!(matches!(wizard.advance(&state), Advance::Completed(_)));
        assert_eq!(wizard.back(&state).current_step, 1);
        assert!(wizard.validate_all(&state.values).is_empty());
    }

    #[test]
    fn test_live_without_variables() {
        let wizard = Wizard::live(&[]);
        assert_eq!(wizard.total_steps(), 1);
        assert!(!wizard.has_fields());
        let view = wizard.view(&WizardState::default());
        assert_eq!(view.next_action, NextAction::Finish);
    }
}
