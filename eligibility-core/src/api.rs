use async_trait::async_trait;

use crate::http_client::Result;
use crate::models::{CreateRuleRequest, EvaluationRequest, Rule};

/// The four calls the console makes against the rules service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RulesApi: Send + Sync {
    async fn list_rules(&self) -> Result<Vec<Rule>>;

    async fn create_rule(&self, request: &CreateRuleRequest) -> Result<Rule>;

    async fn delete_rule(&self, id: &str) -> Result<()>;

    /// Returns the service's `eligible` verdict.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<bool>;
}
