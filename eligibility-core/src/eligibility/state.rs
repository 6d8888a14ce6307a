use std::collections::BTreeMap;

use crate::models::{Eligibility, EvaluationRequest, Rule};
use crate::toast::ToastQueue;

#[derive(Debug, Clone, Default)]
pub struct EligibilityState {
    // Local cache of the server-owned rule list
    pub rules: Vec<Rule>,
    pub rules_loaded: bool,

    // Evaluation inputs, selection kept in click order
    pub selected_rule_ids: Vec<String>,
    pub input_data: BTreeMap<String, String>,

    // Latest verdict from the service
    pub eligibility: Option<Eligibility>,

    pub toasts: ToastQueue,

    /// Bumped each time a rule is created; front ends clear their form on change.
    pub draft_generation: u64,
}

impl EligibilityState {
    pub fn with_toast_limit(limit: usize) -> Self {
        Self {
            toasts: ToastQueue::new(limit),
            ..Default::default()
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_rule_ids.iter().any(|s| s == id)
    }

    /// Returns the new membership of `id`.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            self.selected_rule_ids.retain(|s| s != id);
            false
        } else {
            self.selected_rule_ids.push(id.to_string());
            true
        }
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn field(&self, key: &str) -> &str {
        self.input_data.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn evaluation_request(&self) -> EvaluationRequest {
        EvaluationRequest {
            data: self.input_data.clone(),
            rule_ids: self.selected_rule_ids.clone(),
        }
    }

    /// Drops selections whose rule is no longer listed.
    pub(crate) fn prune_selection(&mut self) {
        let rules = &self.rules;
        self.selected_rule_ids
            .retain(|id| rules.iter().any(|r| &r.id == id));
    }
}
