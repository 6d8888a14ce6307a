use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::{EligibilityAction, EligibilityState};
use crate::api::RulesApi;
use crate::config::UiConfig;
use crate::http_client::HttpApiError;
use crate::models::{Eligibility, RuleDraft};

const FETCH_FAILED: &str = "Failed to fetch rules.";
const ADD_FAILED: &str = "Failed to add rule.";
const DELETE_FAILED: &str = "Failed to delete rule.";
const EVALUATE_FAILED: &str = "Failed to check eligibility.";

pub struct EligibilityManager<A> {
    // Current state - single source of truth
    state: EligibilityState,

    api: A,

    // Action queue for sequential processing
    pending_actions: VecDeque<EligibilityAction>,

    is_processing: bool,
    toast_ttl: Duration,
}

impl<A: RulesApi> EligibilityManager<A> {
    pub fn new(api: A) -> Self {
        Self::with_config(api, &UiConfig::default())
    }

    pub fn with_config(api: A, config: &UiConfig) -> Self {
        Self {
            state: EligibilityState::with_toast_limit(config.toast_limit),
            api,
            pending_actions: VecDeque::new(),
            is_processing: false,
            toast_ttl: config.toast_ttl(),
        }
    }

    /// UI calls this - synchronous, just queues the action
    pub fn dispatch(&mut self, action: EligibilityAction) {
        log::debug!("Dispatching action: {}", action.description());
        self.pending_actions.push_back(action);
    }

    /// Processes one queued action. Returns false when the queue was empty.
    pub async fn update(&mut self) -> bool {
        if self.is_processing {
            return false;
        }

        let Some(action) = self.pending_actions.pop_front() else {
            return false;
        };

        self.is_processing = true;
        log::debug!("Processing action: {}", action.description());
        self.handle_action(action).await;
        self.is_processing = false;

        true
    }

    /// Drains the queue, including actions queued while draining.
    pub async fn run_pending(&mut self) {
        while self.update().await {}
    }

    pub fn state(&self) -> &EligibilityState {
        &self.state
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.pending_actions.is_empty() || self.is_processing
    }

    async fn handle_action(&mut self, action: EligibilityAction) {
        match action {
            EligibilityAction::FetchRules => self.handle_fetch_rules().await,
            EligibilityAction::AddRule { draft } => self.handle_add_rule(draft).await,
            EligibilityAction::DeleteRule { id } => self.handle_delete_rule(id).await,
            EligibilityAction::SetField { key, value } => {
                self.state.input_data.insert(key, value);
            }
            EligibilityAction::ToggleRule { id } => {
                let selected = self.state.toggle_selection(&id);
                log::debug!("Rule {} selected={}", id, selected);
            }
            EligibilityAction::CheckEligibility => self.handle_check_eligibility().await,
            EligibilityAction::DismissToast { id } => {
                self.state.toasts.dismiss(id);
            }
            EligibilityAction::ExpireToasts => {
                self.state.toasts.expire(Instant::now(), self.toast_ttl);
            }
        }
    }
}

// Action handler implementations
impl<A: RulesApi> EligibilityManager<A> {
    async fn handle_fetch_rules(&mut self) {
        match self.api.list_rules().await {
            Ok(rules) => {
                log::info!("Fetched {} rule(s)", rules.len());
                self.state.rules = rules;
                self.state.rules_loaded = true;
                self.state.prune_selection();
            }
            Err(error) => {
                log::error!("Failed to fetch rules: {}", error);
                self.state
                    .toasts
                    .error(failure_message(&error, FETCH_FAILED, false));
            }
        }
    }

    async fn handle_add_rule(&mut self, draft: RuleDraft) {
        let request = match draft.validate() {
            Ok(request) => request,
            Err(error) => {
                log::warn!("Rejected rule draft: {}", error);
                self.state.toasts.error(error.to_string());
                return;
            }
        };

        match self.api.create_rule(&request).await {
            Ok(rule) => {
                log::info!("Rule added: {} ({})", rule.name, rule.id);
                self.state.rules.push(rule);
                self.state.draft_generation += 1;
                self.state.toasts.success("Rule added successfully.");
            }
            Err(error) => {
                log::error!("Failed to add rule: {}", error);
                self.state
                    .toasts
                    .error(failure_message(&error, ADD_FAILED, true));
            }
        }
    }

    async fn handle_delete_rule(&mut self, id: String) {
        match self.api.delete_rule(&id).await {
            Ok(()) => {
                self.state.rules.retain(|rule| rule.id != id);
                self.state.selected_rule_ids.retain(|s| s != &id);
                log::info!("Rule deleted: {}", id);
                self.state.toasts.success("Rule deleted successfully.");
            }
            Err(error) => {
                log::error!("Failed to delete rule {}: {}", id, error);
                self.state
                    .toasts
                    .error(failure_message(&error, DELETE_FAILED, true));
            }
        }
    }

    async fn handle_check_eligibility(&mut self) {
        let request = self.state.evaluation_request();

        match self.api.evaluate(&request).await {
            Ok(eligible) => {
                let verdict = Eligibility::from_flag(eligible);
                log::info!(
                    "Evaluated {} rule(s): {}",
                    request.rule_ids.len(),
                    verdict
                );
                self.state.eligibility = Some(verdict);
            }
            Err(error) => {
                log::error!("Failed to check eligibility: {}", error);
                self.state
                    .toasts
                    .error(failure_message(&error, EVALUATE_FAILED, false));
            }
        }
    }
}

/// Text shown to the user for a failed call.
///
/// Non-success statuses map to `fallback`, or to the server's own message when
/// `use_server_message` is set and one was sent. Transport and decoding
/// failures surface their own description.
pub fn failure_message(error: &HttpApiError, fallback: &str, use_server_message: bool) -> String {
    match error {
        HttpApiError::ServerError { .. } => match error.server_message() {
            Some(message) if use_server_message => message.to_string(),
            _ => fallback.to_string(),
        },
        other => other.to_string(),
    }
}
