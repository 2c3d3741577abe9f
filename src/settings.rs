//! Gateway configuration

use crate::card::CardBrand;
use secrecy::SecretString;
use serde::Deserialize;

const SANDBOX_NOTICE: &str = "TEST MODE ENABLED. Use test card number 4242424242424242 \
     with any 3-digit CVC and a future expiration date.";

/// Gateway settings, as configured by the shop administrator
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Whether the gateway is offered at checkout
    pub enabled: bool,
    /// Title shown on the checkout page
    pub title: String,
    /// Description shown under the title
    pub description: String,
    /// Use the sandbox API key
    pub sandbox: bool,
    /// Sandbox secret key
    pub sandbox_secret_key: SecretString,
    /// Live secret key
    pub secret_key: SecretString,
    /// Card brands to show icons for at checkout
    pub accepted_cards: Vec<CardBrand>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            title: "SecurionPay Payment Gateway".to_string(),
            description: "Pay with your credit card via SecurionPay payment gateway.".to_string(),
            sandbox: true,
            sandbox_secret_key: SecretString::from(String::new()),
            secret_key: SecretString::from(String::new()),
            accepted_cards: vec![CardBrand::Visa, CardBrand::Mastercard, CardBrand::Amex],
        }
    }
}

impl GatewaySettings {
    /// The secret key for the configured mode
    pub fn active_secret_key(&self) -> &SecretString {
        if self.sandbox {
            &self.sandbox_secret_key
        } else {
            &self.secret_key
        }
    }

    /// Checkout description, with the sandbox notice appended in test mode
    pub fn checkout_description(&self) -> String {
        if self.sandbox {
            format!("{} {}", self.description.trim(), SANDBOX_NOTICE)
        } else {
            self.description.trim().to_string()
        }
    }

    /// Icon URLs for the accepted card brands
    pub fn icon_urls(&self, assets_base: &str) -> Vec<String> {
        self.accepted_cards
            .iter()
            .map(|brand| format!("{}/{}.png", assets_base.trim_end_matches('/'), brand.slug()))
            .collect()
    }
}
