use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eligibility_core::{
    EligibilityAction, EligibilityManager, EligibilityState, RuleDraft, RulesApi, UiConfig,
};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

const EXPIRY_TICK: Duration = Duration::from_millis(500);

/// Bridges the egui frame loop and the manager running on a tokio task.
///
/// The UI owns the text buffers; everything else is read from the latest
/// snapshot published by the worker.
pub struct EligibilityStateManager {
    actions: mpsc::UnboundedSender<EligibilityAction>,
    shared: Arc<Mutex<EligibilityState>>,
    busy: Arc<AtomicBool>,

    // Latest published state
    pub snapshot: EligibilityState,

    // Rule form buffers
    pub rule_name: String,
    pub rule_expression: String,

    // Eligibility check buffers
    pub field_values: BTreeMap<String, String>,

    seen_draft_generation: u64,
}

impl EligibilityStateManager {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn<A, F>(api: A, config: &UiConfig, repaint: F) -> Self
    where
        A: RulesApi + 'static,
        F: Fn() + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(EligibilityState::with_toast_limit(
            config.toast_limit,
        )));
        let busy = Arc::new(AtomicBool::new(false));

        let manager = EligibilityManager::with_config(api, config);
        tokio::spawn(run_worker(
            manager,
            rx,
            shared.clone(),
            busy.clone(),
            repaint,
        ));

        Self::from_parts(tx, shared, busy)
    }

    fn from_parts(
        actions: mpsc::UnboundedSender<EligibilityAction>,
        shared: Arc<Mutex<EligibilityState>>,
        busy: Arc<AtomicBool>,
    ) -> Self {
        Self {
            actions,
            shared,
            busy,
            snapshot: EligibilityState::default(),
            rule_name: String::new(),
            rule_expression: String::new(),
            field_values: BTreeMap::new(),
            seen_draft_generation: 0,
        }
    }

    /// Pull the worker's latest state; call once per frame.
    pub fn update_from_async(&mut self) {
        if let Ok(state) = self.shared.lock() {
            self.snapshot = state.clone();
        } else {
            log::error!("State lock poisoned, keeping previous snapshot");
            return;
        }

        if self.snapshot.draft_generation != self.seen_draft_generation {
            self.seen_draft_generation = self.snapshot.draft_generation;
            self.rule_name.clear();
            self.rule_expression.clear();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    pub fn dispatch(&self, action: EligibilityAction) {
        if self.actions.send(action).is_err() {
            log::error!("Eligibility worker has stopped; action dropped");
        }
    }

    pub fn fetch_rules(&self) {
        self.dispatch(EligibilityAction::FetchRules);
    }

    pub fn add_rule(&self) {
        self.dispatch(EligibilityAction::AddRule {
            draft: RuleDraft::new(self.rule_name.clone(), self.rule_expression.clone()),
        });
    }

    pub fn delete_rule(&self, id: &str) {
        self.dispatch(EligibilityAction::DeleteRule { id: id.to_string() });
    }

    pub fn toggle_rule(&self, id: &str) {
        self.dispatch(EligibilityAction::ToggleRule { id: id.to_string() });
    }

    /// Forward the buffer for `key` to the manager.
    pub fn field_changed(&self, key: &str) {
        let value = self.field_values.get(key).cloned().unwrap_or_default();
        self.dispatch(EligibilityAction::SetField {
            key: key.to_string(),
            value,
        });
    }

    pub fn check_eligibility(&self) {
        self.dispatch(EligibilityAction::CheckEligibility);
    }

    pub fn dismiss_toast(&self, id: u64) {
        self.dispatch(EligibilityAction::DismissToast { id });
    }
}

async fn run_worker<A, F>(
    mut manager: EligibilityManager<A>,
    mut rx: mpsc::UnboundedReceiver<EligibilityAction>,
    shared: Arc<Mutex<EligibilityState>>,
    busy: Arc<AtomicBool>,
    repaint: F,
) where
    A: RulesApi,
    F: Fn(),
{
    let mut ticker = expiry_ticker();

    loop {
        tokio::select! {
            action = rx.recv() => match action {
                Some(action) => manager.dispatch(action),
                None => break,
            },
            _ = ticker.tick() => {
                if manager.state().toasts.is_empty() {
                    continue;
                }
                manager.dispatch(EligibilityAction::ExpireToasts);
            }
        }

        busy.store(true, Ordering::Relaxed);
        repaint();
        while manager.update().await {
            publish(&manager, &shared);
            repaint();
        }
        busy.store(false, Ordering::Relaxed);
        repaint();
    }

    log::info!("Eligibility worker stopped");
}

/// Ticks missed while a request was in flight are dropped, not replayed.
fn expiry_ticker() -> Interval {
    let mut ticker = tokio::time::interval(EXPIRY_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

fn publish<A: RulesApi>(manager: &EligibilityManager<A>, shared: &Mutex<EligibilityState>) {
    match shared.lock() {
        Ok(mut state) => *state = manager.state().clone(),
        Err(_) => log::error!("State lock poisoned, snapshot not published"),
    }
}
