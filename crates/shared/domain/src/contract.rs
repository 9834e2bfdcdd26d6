//! Step 3: contract selection and terms acceptance.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, StepSchema, Validation, ValidationContext};

/// Raw contract step input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ContractInput {
    /// Identifier of the selected contract
    #[cfg_attr(feature = "openapi", schema(example = "basic-monthly"))]
    pub contract_id: String,
    pub accept_terms: bool,
    /// Captured signature, typically a data URL
    pub signature_data: Option<String>,
}

/// Validated contract selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub contract_id: String,
    pub signature_data: Option<String>,
}

impl StepSchema for ContractInput {
    type Output = Contract;

    fn check(&self, _ctx: &ValidationContext) -> Validation<Contract> {
        let mut errors = FieldErrors::new();

        let contract_id = self.contract_id.trim();
        if contract_id.is_empty() {
            errors.add("contractId", "Please select a contract");
        }
        if !self.accept_terms {
            errors.add("acceptTerms", "You must accept the terms and conditions");
        }

        errors.into_result(Contract {
            contract_id: contract_id.to_string(),
            signature_data: self
                .signature_data
                .as_ref()
                .filter(|s| !s.trim().is_empty())
                .cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_contract() {
        let input = ContractInput {
            contract_id: "basic".to_string(),
            accept_terms: true,
            signature_data: None,
        };

        let contract = input.check(&ValidationContext::now()).unwrap();
        assert_eq!(contract.contract_id, "basic");
        assert_eq!(contract.signature_data, None);
    }

    #[test]
    fn test_blank_contract_and_unaccepted_terms() {
        let input = ContractInput {
            contract_id: "   ".to_string(),
            accept_terms: false,
            signature_data: Some("data:image/png;base64,AAAA".to_string()),
        };

        let errors = input.check(&ValidationContext::now()).unwrap_err();
        assert!(errors.contains("contractId"));
        assert!(errors.contains("acceptTerms"));
    }

    #[test]
    fn test_blank_signature_dropped() {
        let input = ContractInput {
            contract_id: "basic".to_string(),
            accept_terms: true,
            signature_data: Some(" ".to_string()),
        };

        let contract = input.check(&ValidationContext::now()).unwrap();
        assert_eq!(contract.signature_data, None);
    }
}
