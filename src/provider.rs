//! Payment provider trait and common functionality

use crate::{error::PaymentResult, types::*};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Payment provider trait
///
/// Implement this trait for each payment gateway backend.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Get provider name
    fn name(&self) -> &'static str;

    /// Create a charge
    async fn charge(&self, request: ChargeRequest) -> PaymentResult<Charge>;

    /// Refund a charge
    async fn refund(&self, request: RefundRequest) -> PaymentResult<Refund>;

    /// Create a customer
    async fn create_customer(&self, request: CreateCustomerRequest) -> PaymentResult<Customer>;

    /// Get a customer
    async fn get_customer(&self, id: &str) -> PaymentResult<Customer>;

    /// Update a customer
    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> PaymentResult<Customer>;
}

/// Common HTTP client for providers
///
/// Authenticates with HTTP basic auth: the secret key is the username and
/// the password is blank.
pub struct ProviderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl ProviderClient {
    /// Create a new provider client
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    /// GET request
    pub async fn get(&self, path: &str) -> PaymentResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .client
            .get(&url)
            .basic_auth(self.api_key.expose_secret(), Some(""))
            .send()
            .await?)
    }

    /// POST request with JSON body
    pub async fn post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> PaymentResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .client
            .post(&url)
            .basic_auth(self.api_key.expose_secret(), Some(""))
            .json(body)
            .send()
            .await?)
    }

    /// POST request with JSON body and an idempotency key header
    pub async fn post_idempotent<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        idempotency_key: Option<&str>,
    ) -> PaymentResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .post(&url)
            .basic_auth(self.api_key.expose_secret(), Some(""))
            .json(body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        Ok(request.send().await?)
    }
}
