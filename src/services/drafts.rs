//! Draft generator client
//!
//! The generator is an external model service: given structured rental
//! facts it writes contract body text, inspection checklists, or customer
//! replies. It is slow and fallible, so callers treat empty output as a
//! hard upstream error rather than proceeding with a blank document.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::{
    config::DraftsConfig,
    error::{AppError, AppResult},
    models::enums::{ContractLanguage, VehicleCategory},
};

/// Structured input for contract text generation
#[derive(Debug, Clone, Serialize)]
pub struct ContractDraftRequest {
    pub client_name: String,
    /// Signer identity, or a placeholder for pre-contracts
    pub client_id: String,
    pub vehicle_model: String,
    pub vehicle_plate: String,
    pub rental_days: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Decimal,
    pub language: ContractLanguage,
}

/// Inspection checklist produced for a vehicle category/model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChecklistDraft {
    pub interior: Vec<String>,
    pub exterior: Vec<String>,
    pub documents: Vec<String>,
    pub extras: Vec<String>,
}

/// Context for a generated customer reply
#[derive(Debug, Clone, Serialize)]
pub struct ReplyContext {
    pub customer_name: String,
    pub vehicle_name: String,
    pub reservation_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub query: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Generate the full contract body text
    async fn contract_text(&self, request: &ContractDraftRequest) -> AppResult<String>;

    /// Generate an inspection checklist for a vehicle
    async fn checklist(&self, category: VehicleCategory, model: &str) -> AppResult<ChecklistDraft>;

    /// Generate a reply to a customer query in reservation context
    async fn smart_reply(&self, context: &ReplyContext) -> AppResult<String>;
}

/// HTTP implementation talking to the draft generator service
#[derive(Clone)]
pub struct HttpDraftGenerator {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ContractTextResponse {
    contract_text: String,
}

#[derive(Deserialize)]
struct SmartReplyResponse {
    reply_text: String,
}

impl HttpDraftGenerator {
    pub fn new(config: &DraftsConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build draft client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<R> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Draft generator unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Draft generator returned {}",
                response.status()
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid draft generator response: {}", e)))
    }
}

#[async_trait]
impl DraftGenerator for HttpDraftGenerator {
    async fn contract_text(&self, request: &ContractDraftRequest) -> AppResult<String> {
        let body: ContractTextResponse = self.post("/contract", request).await?;
        require_text(body.contract_text, "contract")
    }

    async fn checklist(&self, category: VehicleCategory, model: &str) -> AppResult<ChecklistDraft> {
        #[derive(Serialize)]
        struct ChecklistRequest<'a> {
            category: VehicleCategory,
            model: &'a str,
        }
        self.post("/checklist", &ChecklistRequest { category, model })
            .await
    }

    async fn smart_reply(&self, context: &ReplyContext) -> AppResult<String> {
        let body: SmartReplyResponse = self.post("/reply", context).await?;
        require_text(body.reply_text, "reply")
    }
}

/// A blank document is an upstream failure, never a success to proceed with
fn require_text(text: String, what: &str) -> AppResult<String> {
    if text.trim().is_empty() {
        Err(AppError::Upstream(format!(
            "Draft generator returned an empty {}",
            what
        )))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn blank_generator_output_is_an_upstream_error() {
        assert!(require_text("   \n".to_string(), "contract").is_err());
        assert_eq!(require_text("RENTAL AGREEMENT".to_string(), "contract").unwrap(), "RENTAL AGREEMENT");
    }

    #[tokio::test]
    async fn mock_generator_stands_in_for_the_trait_object() {
        let mut mock = MockDraftGenerator::new();
        mock.expect_contract_text()
            .returning(|_| Ok("RENTAL AGREEMENT".to_string()));

        let drafts: Arc<dyn DraftGenerator> = Arc::new(mock);
        let request = ContractDraftRequest {
            client_name: "Jane Visitor".to_string(),
            client_id: "PENDIENTE".to_string(),
            vehicle_model: "Corolla".to_string(),
            vehicle_plate: "ABC-123".to_string(),
            rental_days: 3,
            start_date: "2024-07-10".parse().unwrap(),
            end_date: "2024-07-13".parse().unwrap(),
            total_price: Decimal::new(195, 0),
            language: ContractLanguage::En,
        };
        assert_eq!(
            drafts.contract_text(&request).await.unwrap(),
            "RENTAL AGREEMENT"
        );
    }
}
