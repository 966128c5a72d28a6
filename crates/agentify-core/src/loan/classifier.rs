//! Loan approval model client

use super::LoanApplication;
use crate::config::{Config, LoanModelConfig};
use crate::error::{AgentifyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Model verdict, `Y` or `N` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanDecision {
    #[serde(rename = "Y")]
    Approved,
    #[serde(rename = "N")]
    Rejected,
}

impl LoanDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Y",
            Self::Rejected => "N",
        }
    }

    fn from_prediction(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => match s.trim() {
                "Y" | "y" => Some(Self::Approved),
                "N" | "n" => Some(Self::Rejected),
                _ => None,
            },
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) if v == 1.0 => Some(Self::Approved),
                Some(v) if v == 0.0 => Some(Self::Rejected),
                _ => None,
            },
            serde_json::Value::Bool(b) => Some(if *b { Self::Approved } else { Self::Rejected }),
            _ => None,
        }
    }
}

/// Response body for a loan approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPrediction {
    #[serde(rename = "Loan_Approval_Prediction")]
    pub prediction: LoanDecision,
}

/// Pre-trained loan classifier
#[async_trait]
pub trait LoanClassifier: Send + Sync {
    async fn predict(&self, features: &[f64]) -> Result<LoanDecision>;
}

/// Classifier behind a model-serving `predict` endpoint
pub struct HttpLoanClassifier {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpLoanClassifier {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agentify/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &LoanModelConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .ok_or_else(|| AgentifyError::Config("loan_model.url is not set".to_string()))?;
        Self::new(
            url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl LoanClassifier for HttpLoanClassifier {
    async fn predict(&self, features: &[f64]) -> Result<LoanDecision> {
        #[derive(Serialize)]
        struct PredictRequest<'a> {
            instances: [&'a [f64]; 1],
        }

        #[derive(Deserialize)]
        struct PredictResponse {
            #[serde(default)]
            predictions: Vec<serde_json::Value>,
        }

        let mut request = self
            .http_client
            .post(&self.url)
            .json(&PredictRequest { instances: [features] });
        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentifyError::ExternalError(format!(
                "Loan model error (HTTP {}): {}",
                status, body
            )));
        }

        let body: PredictResponse = response.json().await?;
        let first = body
            .predictions
            .first()
            .ok_or_else(|| {
                AgentifyError::ExternalError("Loan model returned no prediction".to_string())
            })?;

        LoanDecision::from_prediction(first).ok_or_else(|| {
            AgentifyError::ExternalError(format!("unexpected loan model prediction: {}", first))
        })
    }
}

/// Validates applications and asks the classifier for a verdict
pub struct LoanApprover {
    classifier: Arc<dyn LoanClassifier>,
}

impl LoanApprover {
    pub fn new(classifier: Arc<dyn LoanClassifier>) -> Self {
        Self { classifier }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate_for_loans()?;
        let classifier = HttpLoanClassifier::from_config(&config.loan_model)?;
        Ok(Self::new(Arc::new(classifier)))
    }

    pub async fn approve(&self, application: &LoanApplication) -> Result<LoanPrediction> {
        let features = application.features()?;
        let prediction = self.classifier.predict(&features).await?;
        tracing::info!(prediction = prediction.as_str(), "Loan application scored");
        Ok(LoanPrediction { prediction })
    }
}
