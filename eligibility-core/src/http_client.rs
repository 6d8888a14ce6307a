use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::api::RulesApi;
use crate::config::ApiConfig;
use crate::models::{
    ApiErrorBody, CreateRuleRequest, EvaluationRequest, EvaluationResponse, Rule, RuleResponse,
    RulesResponse,
};

#[derive(Error, Debug)]
pub enum HttpApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Server error: {status}")]
    ServerError { status: u16, message: Option<String> },
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl HttpApiError {
    /// The `message` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            HttpApiError::ServerError {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HttpApiError>;

/// reqwest-backed client for the rules service.
#[derive(Debug, Clone)]
pub struct RulesHttpClient {
    client: Client,
    base_url: Url,
}

impl RulesHttpClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Self::with_client(&config.base_url, client)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| HttpApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(HttpApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HttpApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort; a missing or non-JSON body leaves no message.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        log::debug!("Rules service returned {}: {}", status, body);

        Err(HttpApiError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RulesApi for RulesHttpClient {
    async fn list_rules(&self) -> Result<Vec<Rule>> {
        let url = self.endpoint(&["api", "rules"])?;
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let body: RulesResponse = Self::read_json(response).await?;
        Ok(body.rules)
    }

    async fn create_rule(&self, request: &CreateRuleRequest) -> Result<Rule> {
        let url = self.endpoint(&["api", "rules"])?;
        log::debug!("POST {} name='{}'", url, request.name);

        let response = self.client.post(url).json(request).send().await?;
        let body: RuleResponse = Self::read_json(response).await?;
        Ok(body.rule)
    }

    async fn delete_rule(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "rules", id])?;
        log::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<bool> {
        let url = self.endpoint(&["api", "evaluate"])?;
        log::debug!("POST {} with {} rule(s)", url, request.rule_ids.len());

        let response = self.client.post(url).json(request).send().await?;
        let body: EvaluationResponse = Self::read_json(response).await?;
        Ok(body.eligible)
    }
}
