//! Storefront integration seam
//!
//! The gateway never touches the host platform's order or user storage
//! directly. Everything it needs from the surrounding shop goes through
//! the [`Storefront`] trait, which the host implements over its own
//! persistence.

use crate::card::{CardBrand, CardExpiry};
use crate::money::Currency;
use rust_decimal::Decimal;

/// Host platform user id
pub type UserId = u64;

/// The logged-in shopper, as known to the host platform
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Platform user id
    pub id: UserId,
    /// Account email
    pub email: Option<String>,
}

/// A saved payment method owned by a shopper
#[derive(Debug, Clone)]
pub struct PaymentToken {
    /// Provider card id
    pub token: String,
    /// Gateway that issued the token
    pub gateway_id: String,
    /// Card brand, if recognized
    pub brand: Option<CardBrand>,
    /// Last four digits
    pub last4: String,
    /// Expiry date
    pub expiry: CardExpiry,
    /// Owning shopper
    pub user_id: UserId,
}

/// Card metadata stored against a paid order, used later for refunds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Provider charge id
    pub transaction_id: String,
    /// Last four digits of the charged card
    pub last4: String,
    /// Expiry in compact `MMYY` form
    pub expiry: String,
}

/// Everything the gateway needs from the host shop
///
/// All methods take `&self`; implementations are expected to handle their
/// own interior mutability.
pub trait Storefront {
    /// Shop currency
    fn currency(&self) -> Currency;

    /// Order total in major units, or `None` if the order does not exist
    fn order_total(&self, order_id: u64) -> Option<Decimal>;

    /// Mark an order paid with the given provider transaction id
    fn payment_complete(&self, order_id: u64, transaction_id: &str);

    /// Reduce stock levels for an order's items
    fn reduce_stock(&self, order_id: u64);

    /// Empty the shopper's cart
    fn clear_cart(&self);

    /// Append a note to an order's history
    fn add_order_note(&self, order_id: u64, note: &str);

    /// Store card metadata against an order
    fn set_transaction(&self, order_id: u64, record: TransactionRecord);

    /// Retrieve card metadata stored against an order
    fn transaction(&self, order_id: u64) -> Option<TransactionRecord>;

    /// Provider customer id stored for a shopper, if any
    fn customer_id(&self, user: UserId) -> Option<String>;

    /// Store a provider customer id for a shopper
    fn set_customer_id(&self, user: UserId, customer_id: &str);

    /// Persist a saved payment method
    fn save_token(&self, token: PaymentToken);

    /// Look up a saved payment method by provider card id
    fn find_token(&self, token: &str) -> Option<PaymentToken>;

    /// URL of the shopper's saved payment methods page
    fn payment_methods_url(&self) -> String;

    /// URL of the order received page
    fn receipt_url(&self, order_id: u64) -> String;
}
