//! Partitioning of template variables into wizard steps.

use serde::Serialize;
use utoipa::ToSchema;

use super::variable::TemplateVariable;

/// Fields shown together on one page of the authenticated live wizard.
pub const LIVE_STEP_SIZE: usize = 5;

/// How variables are grouped into steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Fixed-size groups, used by the authenticated live fill.
    Chunked(usize),
    /// One variable per step, used by the guest flow so gating works per question.
    OnePerStep,
}

impl StepPolicy {
    pub fn live() -> Self {
        Self::Chunked(LIVE_STEP_SIZE)
    }
}

/// One page of the multi-step form.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WizardStep {
    pub index: usize,
    pub fields: Vec<TemplateVariable>,
}

impl WizardStep {
    /// The first step is the "start" page.
    pub fn is_start(&self) -> bool {
        self.index == 0
    }

    pub fn label(&self) -> String {
        if self.is_start() {
            "start".to_string()
        } else {
            format!("step {}", self.index)
        }
    }

    pub fn field(&self, name: &str) -> Option<&TemplateVariable> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Split variables into ordered steps.
///
/// Chunked partitioning of an empty list still yields one step with no
/// fields; one-per-step yields no steps at all.
pub fn partition_steps(variables: &[TemplateVariable], policy: StepPolicy) -> Vec<WizardStep> {
    let size = match policy {
        StepPolicy::Chunked(size) => size.max(1),
        StepPolicy::OnePerStep => 1,
    };

    if variables.is_empty() {
        return match policy {
            StepPolicy::Chunked(_) => vec![WizardStep {
                index: 0,
                fields: Vec::new(),
            }],
            StepPolicy::OnePerStep => Vec::new(),
        };
    }

    variables
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| WizardStep {
            index,
            fields: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::variable::VariableType;

    fn vars(n: usize) -> Vec<TemplateVariable> {
        (0..n)
            .map(|i| TemplateVariable::new(format!("v{i}"), format!("V{i}"), VariableType::Text))
            .collect()
    }

    #[test]
    fn test_chunked_sizes() {
        let steps = partition_steps(&vars(12), StepPolicy::live());
        let sizes: Vec<usize> = steps.iter().map(|s| s.fields.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    #[test]
    fn test_chunked_step_count_and_concatenation() {
        for n in 1..=23 {
            let input = vars(n);
            let steps = partition_steps(&input, StepPolicy::live());
            assert_eq!(steps.len(), n.div_ceil(LIVE_STEP_SIZE));

            let flattened: Vec<TemplateVariable> =
                steps.into_iter().flat_map(|s| s.fields).collect();
            assert_eq!(flattened, input);
        }
    }

    #[test]
    fn test_chunked_empty_yields_one_empty_step() {
        let steps = partition_steps(&[], StepPolicy::live());
        assert_eq!(steps.len(), 1);
        assert!(steps[0].fields.is_empty());
    }

    #[test]
    fn test_one_per_step() {
        let steps = partition_steps(&vars(4), StepPolicy::OnePerStep);
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| s.fields.len() == 1));
        assert_eq!(steps[3].fields[0].name, "v3");
        assert!(partition_steps(&[], StepPolicy::OnePerStep).is_empty());
    }

    #[test]
    fn test_step_labels() {
        let steps = partition_steps(&vars(11), StepPolicy::live());
        assert_eq!(steps[0].label(), "start");
        assert_eq!(steps[2].label(), "step 2");
    }
}
