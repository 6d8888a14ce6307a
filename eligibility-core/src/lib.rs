//! Client-side core for the eligibility rules console.
//!
//! Wire models, the HTTP client for the rules service, and the
//! state/action/manager module that both front ends drive.

pub mod api;
pub mod config;
pub mod eligibility;
pub mod http_client;
pub mod models;
pub mod toast;

pub use api::RulesApi;
pub use config::{ApiConfig, EligibilityConfig, FieldSpec, UiConfig};
pub use eligibility::{EligibilityAction, EligibilityManager, EligibilityState};
pub use http_client::{HttpApiError, Result, RulesHttpClient};
pub use models::{
    CreateRuleRequest, DraftError, Eligibility, EvaluationRequest, Rule, RuleDraft,
};
pub use toast::{Toast, ToastQueue, ToastVariant};
