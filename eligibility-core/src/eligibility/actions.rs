use crate::models::RuleDraft;

#[derive(Debug, Clone)]
pub enum EligibilityAction {
    // Rule catalogue
    FetchRules,
    AddRule { draft: RuleDraft },
    DeleteRule { id: String },

    // Evaluation inputs
    SetField { key: String, value: String },
    ToggleRule { id: String },
    CheckEligibility,

    // Notifications
    DismissToast { id: u64 },
    ExpireToasts,
}

impl EligibilityAction {
    pub fn description(&self) -> &'static str {
        match self {
            EligibilityAction::FetchRules => "Fetching rules",
            EligibilityAction::AddRule { .. } => "Adding rule",
            EligibilityAction::DeleteRule { .. } => "Deleting rule",
            EligibilityAction::SetField { .. } => "Updating field value",
            EligibilityAction::ToggleRule { .. } => "Toggling rule selection",
            EligibilityAction::CheckEligibility => "Checking eligibility",
            EligibilityAction::DismissToast { .. } => "Dismissing notification",
            EligibilityAction::ExpireToasts => "Expiring notifications",
        }
    }
}
