use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A named eligibility expression owned by the rules service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub expression: String,
}

impl Rule {
    /// `name: expression`, as shown in the rule list.
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.name, self.expression)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub data: BTreeMap<String, String>,
    #[serde(rename = "ruleIds")]
    pub rule_ids: Vec<String>,
}

// Response envelopes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResponse {
    pub rule: Rule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub eligible: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Both name and expression are required.")]
    MissingFields,
}

/// Unsubmitted contents of the rule form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDraft {
    pub name: String,
    pub expression: String,
}

impl RuleDraft {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }

    /// Trims both fields; either one blank rejects the draft.
    pub fn validate(&self) -> std::result::Result<CreateRuleRequest, DraftError> {
        let name = self.name.trim();
        let expression = self.expression.trim();

        if name.is_empty() || expression.is_empty() {
            return Err(DraftError::MissingFields);
        }

        Ok(CreateRuleRequest {
            name: name.to_string(),
            expression: expression.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NotEligible,
}

impl Eligibility {
    pub fn from_flag(eligible: bool) -> Self {
        if eligible {
            Self::Eligible
        } else {
            Self::NotEligible
        }
    }

    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Eligible => "Eligible",
            Self::NotEligible => "Not Eligible",
        }
    }
}

impl std::fmt::Display for Eligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
