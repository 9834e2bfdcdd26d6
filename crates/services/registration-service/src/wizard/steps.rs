//! Step descriptors.

use serde::Serialize;

/// Which section of the draft a step edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    PersonalInfo,
    Address,
    Contract,
}

impl StepKind {
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::PersonalInfo => "Personal information",
            StepKind::Address => "Address",
            StepKind::Contract => "Contract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StepDescriptor {
    pub kind: StepKind,
    pub title: String,
}

impl From<StepKind> for StepDescriptor {
    fn from(kind: StepKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
        }
    }
}

/// Ordered, non-empty list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<StepDescriptor>,
}

impl StepPlan {
    /// Personal info and address, followed by the contract step if enabled.
    pub fn standard(show_contract_step: bool) -> Self {
        let mut steps = vec![
            StepDescriptor::from(StepKind::PersonalInfo),
            StepDescriptor::from(StepKind::Address),
        ];
        if show_contract_step {
            steps.push(StepDescriptor::from(StepKind::Contract));
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    pub fn contains(&self, kind: StepKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn position(&self, kind: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| s.kind == kind)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_plan_with_contract() {
        let plan = StepPlan::standard(true);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.position(StepKind::Contract), Some(2));
        assert!(plan.is_last(2));
    }

    #[test]
    fn test_standard_plan_without_contract() {
        let plan = StepPlan::standard(false);

        assert_eq!(plan.len(), 2);
        assert!(!plan.contains(StepKind::Contract));
        assert!(plan.is_last(1));
    }
}
