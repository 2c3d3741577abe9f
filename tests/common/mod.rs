//! Shared test doubles: an in-memory provider and storefront

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use securionpay_gateway::{
    CardSummary, Charge, ChargeRequest, ChargeStatus, CreateCustomerRequest, Currency, Customer,
    Money, PaymentError, PaymentProvider, PaymentResult, PaymentSource, PaymentToken, Refund,
    RefundRequest, RefundStatus, Storefront, TransactionRecord, UpdateCustomerRequest, UserId,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory payment provider for gateway tests
#[derive(Default)]
pub struct MockProvider {
    /// When set, `charge` fails with this decline message
    pub decline_with: Mutex<Option<String>>,
    /// When set, `refund` fails with this message
    pub refund_error: Mutex<Option<String>>,
    pub charges: Mutex<Vec<ChargeRequest>>,
    pub refunds: Mutex<Vec<RefundRequest>>,
    pub customers: Mutex<HashMap<String, Customer>>,
    pub customers_created: Mutex<u32>,
    pub customers_updated: Mutex<u32>,
}

impl MockProvider {
    fn card_summary(id: &str, last4: &str) -> CardSummary {
        CardSummary {
            id: id.to_string(),
            brand: Some("Visa".to_string()),
            last4: last4.to_string(),
            exp_month: "04".to_string(),
            exp_year: "2030".to_string(),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn charge(&self, request: ChargeRequest) -> PaymentResult<Charge> {
        if let Some(message) = self.decline_with.lock().unwrap().clone() {
            return Err(PaymentError::CardDeclined(message));
        }

        let (card, customer_id) = match &request.source {
            PaymentSource::Card(details) => (
                Some(Self::card_summary("card_fresh", &details.last4())),
                None,
            ),
            PaymentSource::Token { token, customer_id } => (
                Some(Self::card_summary(token, "4242")),
                customer_id.clone(),
            ),
        };
        let amount = request.amount;
        self.charges.lock().unwrap().push(request);

        Ok(Charge {
            id: "char_test_1".to_string(),
            amount,
            status: ChargeStatus::Succeeded,
            card,
            customer_id,
            captured: true,
            refunded: false,
            created_at: Utc::now(),
        })
    }

    async fn refund(&self, request: RefundRequest) -> PaymentResult<Refund> {
        if let Some(message) = self.refund_error.lock().unwrap().clone() {
            return Err(PaymentError::Provider(message));
        }

        let amount = request
            .amount
            .unwrap_or(Money::new(0, Currency::USD));
        let charge_id = request.charge_id.clone();
        self.refunds.lock().unwrap().push(request);

        Ok(Refund {
            id: "ref_test_1".to_string(),
            charge_id,
            amount,
            status: RefundStatus::Succeeded,
            created_at: Utc::now(),
        })
    }

    async fn create_customer(&self, request: CreateCustomerRequest) -> PaymentResult<Customer> {
        *self.customers_created.lock().unwrap() += 1;
        let last4 = request.card.as_ref().map(|c| c.last4()).unwrap_or_default();
        let customer = Customer {
            id: format!(
                "cust_{}",
                self.customers.lock().unwrap().len() + 1
            ),
            email: request.email,
            cards: vec![Self::card_summary("card_saved_1", &last4)],
            created_at: Utc::now(),
        };
        self.customers
            .lock()
            .unwrap()
            .insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: &str) -> PaymentResult<Customer> {
        self.customers
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::CustomerNotFound(id.to_string()))
    }

    async fn update_customer(
        &self,
        id: &str,
        request: UpdateCustomerRequest,
    ) -> PaymentResult<Customer> {
        *self.customers_updated.lock().unwrap() += 1;
        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .get_mut(id)
            .ok_or_else(|| PaymentError::CustomerNotFound(id.to_string()))?;
        if let Some(card) = request.card {
            let n = customer.cards.len() + 1;
            customer
                .cards
                .push(Self::card_summary(&format!("card_saved_{n}"), &card.last4()));
        }
        Ok(customer.clone())
    }
}

/// In-memory storefront for gateway tests
#[derive(Default)]
pub struct MemoryStorefront {
    pub orders: Mutex<HashMap<u64, Decimal>>,
    pub paid: Mutex<HashMap<u64, String>>,
    pub stock_reduced: Mutex<Vec<u64>>,
    pub cart_cleared: Mutex<bool>,
    pub notes: Mutex<HashMap<u64, Vec<String>>>,
    pub transactions: Mutex<HashMap<u64, TransactionRecord>>,
    pub customer_ids: Mutex<HashMap<UserId, String>>,
    pub tokens: Mutex<HashMap<String, PaymentToken>>,
}

impl MemoryStorefront {
    pub fn with_order(order_id: u64, total: Decimal) -> Self {
        let store = Self::default();
        store.orders.lock().unwrap().insert(order_id, total);
        store
    }

    pub fn notes_for(&self, order_id: u64) -> Vec<String> {
        self.notes
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Storefront for MemoryStorefront {
    fn currency(&self) -> Currency {
        Currency::USD
    }

    fn order_total(&self, order_id: u64) -> Option<Decimal> {
        self.orders.lock().unwrap().get(&order_id).copied()
    }

    fn payment_complete(&self, order_id: u64, transaction_id: &str) {
        self.paid
            .lock()
            .unwrap()
            .insert(order_id, transaction_id.to_string());
    }

    fn reduce_stock(&self, order_id: u64) {
        self.stock_reduced.lock().unwrap().push(order_id);
    }

    fn clear_cart(&self) {
        *self.cart_cleared.lock().unwrap() = true;
    }

    fn add_order_note(&self, order_id: u64, note: &str) {
        self.notes
            .lock()
            .unwrap()
            .entry(order_id)
            .or_default()
            .push(note.to_string());
    }

    fn set_transaction(&self, order_id: u64, record: TransactionRecord) {
        self.transactions.lock().unwrap().insert(order_id, record);
    }

    fn transaction(&self, order_id: u64) -> Option<TransactionRecord> {
        self.transactions.lock().unwrap().get(&order_id).cloned()
    }

    fn customer_id(&self, user: UserId) -> Option<String> {
        self.customer_ids.lock().unwrap().get(&user).cloned()
    }

    fn set_customer_id(&self, user: UserId, customer_id: &str) {
        self.customer_ids
            .lock()
            .unwrap()
            .insert(user, customer_id.to_string());
    }

    fn save_token(&self, token: PaymentToken) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.token.clone(), token);
    }

    fn find_token(&self, token: &str) -> Option<PaymentToken> {
        self.tokens.lock().unwrap().get(token).cloned()
    }

    fn payment_methods_url(&self) -> String {
        "https://shop.example/my-account/payment-methods".to_string()
    }

    fn receipt_url(&self, order_id: u64) -> String {
        format!("https://shop.example/order-received/{order_id}")
    }
}
