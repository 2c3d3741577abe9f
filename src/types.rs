//! Common payment types

use crate::card::CardDetails;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment source for a charge
#[derive(Debug, Clone)]
pub enum PaymentSource {
    /// Raw card details captured at checkout
    Card(CardDetails),
    /// A card token previously stored with the provider
    Token {
        /// Provider card id
        token: String,
        /// Provider customer the card belongs to
        customer_id: Option<String>,
    },
}

/// Charge request
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    /// Amount to charge
    pub amount: Money,
    /// Payment source
    pub source: PaymentSource,
    /// Description shown in the provider dashboard
    pub description: Option<String>,
    /// Idempotency key for safe retries
    pub idempotency_key: Option<String>,
}

impl ChargeRequest {
    /// Create a new charge request
    pub fn new(amount: Money, source: PaymentSource) -> Self {
        Self {
            amount,
            source,
            description: None,
            idempotency_key: None,
        }
    }

    /// Set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set idempotency key
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Charge status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    /// Charge completed
    Succeeded,
    /// Charge failed
    Failed,
    /// Awaiting further action
    Pending,
}

/// A completed or attempted charge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Provider charge id
    pub id: String,
    /// Charged amount
    pub amount: Money,
    /// Status
    pub status: ChargeStatus,
    /// Card used, as reported by the provider
    pub card: Option<CardSummary>,
    /// Provider customer id, if charged against a stored card
    pub customer_id: Option<String>,
    /// Whether the charge was captured
    pub captured: bool,
    /// Whether the charge has been refunded
    pub refunded: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Non-sensitive card summary returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSummary {
    /// Provider card id
    pub id: String,
    /// Brand name as reported by the provider
    pub brand: Option<String>,
    /// Last four digits
    pub last4: String,
    /// Expiry month
    pub exp_month: String,
    /// Expiry year
    pub exp_year: String,
}

/// Create customer request
#[derive(Debug, Clone)]
pub struct CreateCustomerRequest {
    /// Customer email
    pub email: Option<String>,
    /// Card to store on the new customer
    pub card: Option<CardDetails>,
}

/// Update customer request
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerRequest {
    /// Card to add to the customer
    pub card: Option<CardDetails>,
}

/// A provider customer with stored cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider customer id
    pub id: String,
    /// Email
    pub email: Option<String>,
    /// Stored cards, oldest first
    pub cards: Vec<CardSummary>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// The most recently added card, if any
    pub fn newest_card(&self) -> Option<&CardSummary> {
        self.cards.last()
    }
}

/// Refund request
#[derive(Debug, Clone)]
pub struct RefundRequest {
    /// Charge to refund
    pub charge_id: String,
    /// Amount to refund; `None` refunds the full remaining amount
    pub amount: Option<Money>,
}

impl RefundRequest {
    /// Create a full refund request
    pub fn new(charge_id: impl Into<String>) -> Self {
        Self {
            charge_id: charge_id.into(),
            amount: None,
        }
    }

    /// Set a partial amount
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Refund status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    /// Refund completed
    Succeeded,
    /// Refund failed
    Failed,
    /// Refund in progress
    Pending,
}

/// A refund
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    /// Provider refund id
    pub id: String,
    /// Refunded charge id
    pub charge_id: String,
    /// Refunded amount
    pub amount: Money,
    /// Status
    pub status: RefundStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_charge_request_builder() {
        let request = ChargeRequest::new(
            Money::new(1999, Currency::USD),
            PaymentSource::Token {
                token: "card_123".into(),
                customer_id: Some("cust_456".into()),
            },
        )
        .description("Order #42")
        .idempotency_key("key-1");

        assert_eq!(request.amount.amount, 1999);
        assert_eq!(request.description.as_deref(), Some("Order #42"));
        assert_eq!(request.idempotency_key.as_deref(), Some("key-1"));
    }

    #[test]
    fn test_newest_card_is_last() {
        let card = |id: &str| CardSummary {
            id: id.into(),
            brand: None,
            last4: "4242".into(),
            exp_month: "04".into(),
            exp_year: "2030".into(),
        };
        let customer = Customer {
            id: "cust_1".into(),
            email: None,
            cards: vec![card("card_old"), card("card_new")],
            created_at: Utc::now(),
        };
        assert_eq!(customer.newest_card().unwrap().id, "card_new");
    }
}
