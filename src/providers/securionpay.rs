//! SecurionPay payment provider implementation
//!
//! Talks to the SecurionPay REST API: JSON bodies, camelCase field names,
//! HTTP basic auth with the secret key as username and a blank password.
//! A 2xx response is not taken as success by itself; the charge status in
//! the body decides.

use crate::{
    card::CardDetails,
    error::{DeclineCode, PaymentError, PaymentResult},
    money::{Currency, Money},
    provider::{PaymentProvider, ProviderClient},
    types::*,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

const LIVE_URL: &str = "https://api.securionpay.com";

/// SecurionPay provider
pub struct SecurionPayProvider {
    client: ProviderClient,
}

impl SecurionPayProvider {
    /// Create a new provider against the live API
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: ProviderClient::new(LIVE_URL, api_key),
        }
    }

    /// Create a provider against a custom base URL (used in tests)
    pub fn with_base_url(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: ProviderClient::new(base_url, api_key),
        }
    }

    /// Deserialize a response body, mapping API errors to `PaymentError`
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> PaymentResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        match response.json::<SpErrorBody>().await {
            Ok(body) => Err(body.error.into_payment_error()),
            Err(_) => Err(PaymentError::Provider(format!(
                "unexpected response from SecurionPay ({status})"
            ))),
        }
    }
}

#[async_trait]
impl PaymentProvider for SecurionPayProvider {
    fn name(&self) -> &'static str {
        "securionpay"
    }

    async fn charge(&self, request: ChargeRequest) -> PaymentResult<Charge> {
        let (card, customer_id) = match &request.source {
            PaymentSource::Card(details) => (SpCardParam::Card(details.into()), None),
            PaymentSource::Token { token, customer_id } => {
                (SpCardParam::Token(token.clone()), customer_id.clone())
            }
        };

        let body = SpChargeRequest {
            amount: request.amount.amount,
            currency: request.amount.currency.code().to_string(),
            card,
            customer_id,
            description: request.description.clone(),
        };

        let response = self
            .client
            .post_idempotent("/charges", &body, request.idempotency_key.as_deref())
            .await?;
        let charge: SpCharge = Self::parse_response(response).await?;
        Ok(charge.into())
    }

    async fn refund(&self, request: RefundRequest) -> PaymentResult<Refund> {
        let body = SpRefundRequest {
            charge_id: request.charge_id.clone(),
            amount: request.amount.map(|m| m.amount),
        };

        let response = self.client.post("/refunds", &body).await?;
        let refund: SpRefund = Self::parse_response(response).await?;
        Ok(refund.into())
    }

    async fn create_customer(&self, request: CreateCustomerRequest) -> PaymentResult<Customer> {
        let body = SpCustomerRequest {
            email: request.email.clone(),
            card: request.card.as_ref().map(Into::into),
        };

        let response = self.client.post("/customers", &body).await?;
        let customer: SpCustomer = Self::parse_response(response).await?;
        Ok(customer.into())
    }

    async fn get_customer(&self, id: &str) -> PaymentResult<Customer> {
        let response = self.client.get(&format!("/customers/{id}")).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::CustomerNotFound(id.to_string()));
        }
        let customer: SpCustomer = Self::parse_response(response).await?;
        Ok(customer.into())
    }

    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> PaymentResult<Customer> {
        let body = SpCustomerRequest {
            email: None,
            card: request.card.as_ref().map(Into::into),
        };

        let response = self.client.post(&format!("/customers/{id}"), &body).await?;
        let customer: SpCustomer = Self::parse_response(response).await?;
        Ok(customer.into())
    }
}

// The API reports creation time in milliseconds since the epoch.
fn timestamp(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}

// SecurionPay API types

#[derive(Debug, Deserialize)]
struct SpErrorBody {
    error: SpErrorDetail,
}

#[derive(Debug, Deserialize)]
struct SpErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

impl SpErrorDetail {
    fn into_payment_error(self) -> PaymentError {
        let message = self.message.filter(|m| !m.is_empty());
        match self.error_type.as_deref() {
            Some("card_error") => {
                let message = message.unwrap_or_else(|| {
                    DeclineCode::from_code(self.code.as_deref().unwrap_or(""))
                        .message()
                        .to_string()
                });
                PaymentError::CardDeclined(message)
            }
            Some("invalid_request") => PaymentError::InvalidCard(
                message.unwrap_or_else(|| "The request was invalid.".to_string()),
            ),
            _ => PaymentError::Provider(
                message.unwrap_or_else(|| "SecurionPay rejected the request.".to_string()),
            ),
        }
    }
}

// No Debug derives on the request types that carry the raw card number.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpCardPayload {
    number: String,
    cvc: String,
    exp_month: String,
    exp_year: String,
}

impl From<&CardDetails> for SpCardPayload {
    fn from(card: &CardDetails) -> Self {
        Self {
            number: card.number().to_string(),
            cvc: card.cvc().to_string(),
            exp_month: card.expiry.month_str(),
            exp_year: card.expiry.year_str(),
        }
    }
}

/// Either a stored card token or full card details
#[derive(Serialize)]
#[serde(untagged)]
enum SpCardParam {
    Token(String),
    Card(SpCardPayload),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpChargeRequest {
    amount: i64,
    currency: String,
    card: SpCardParam,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpRefundRequest {
    charge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<SpCardPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SpChargeStatus {
    #[default]
    Successful,
    Pending,
    Failed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpCharge {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    status: SpChargeStatus,
    #[serde(default)]
    captured: bool,
    #[serde(default)]
    refunded: bool,
    card: Option<SpCard>,
    customer_id: Option<String>,
    created: i64,
}

impl From<SpCharge> for Charge {
    fn from(sc: SpCharge) -> Self {
        let currency = Currency::from_code(&sc.currency).unwrap_or(Currency::USD);
        Self {
            id: sc.id,
            amount: Money::new(sc.amount, currency),
            status: match sc.status {
                SpChargeStatus::Successful => ChargeStatus::Succeeded,
                SpChargeStatus::Pending => ChargeStatus::Pending,
                SpChargeStatus::Failed => ChargeStatus::Failed,
            },
            card: sc.card.map(Into::into),
            customer_id: sc.customer_id,
            captured: sc.captured,
            refunded: sc.refunded,
            created_at: timestamp(sc.created),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpCard {
    id: String,
    brand: Option<String>,
    last4: String,
    exp_month: Option<String>,
    exp_year: Option<String>,
}

impl From<SpCard> for CardSummary {
    fn from(sc: SpCard) -> Self {
        Self {
            id: sc.id,
            brand: sc.brand,
            last4: sc.last4,
            exp_month: sc.exp_month.unwrap_or_default(),
            exp_year: sc.exp_year.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpCustomer {
    id: String,
    email: Option<String>,
    #[serde(default)]
    cards: Vec<SpCard>,
    created: Option<i64>,
}

impl From<SpCustomer> for Customer {
    fn from(sc: SpCustomer) -> Self {
        Self {
            id: sc.id,
            email: sc.email,
            cards: sc.cards.into_iter().map(Into::into).collect(),
            created_at: sc.created.map(timestamp).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpRefund {
    id: String,
    amount: i64,
    currency: String,
    charge: String,
    #[serde(default = "default_refund_status")]
    status: String,
    created: i64,
}

fn default_refund_status() -> String {
    "successful".to_string()
}

impl From<SpRefund> for Refund {
    fn from(sr: SpRefund) -> Self {
        let currency = Currency::from_code(&sr.currency).unwrap_or(Currency::USD);
        Self {
            id: sr.id,
            charge_id: sr.charge,
            amount: Money::new(sr.amount, currency),
            status: match sr.status.as_str() {
                "successful" => RefundStatus::Succeeded,
                "failed" => RefundStatus::Failed,
                _ => RefundStatus::Pending,
            },
            created_at: timestamp(sr.created),
        }
    }
}
