//! Checkout gateway orchestration
//!
//! Ties the provider to the host storefront: builds charge requests from
//! checkout submissions, applies order side effects on success, stores
//! payment tokens, and drives refunds from stored transaction records.

use crate::{
    card::{CardDetails, CardExpiry},
    error::{PaymentError, PaymentResult},
    money::Money,
    platform::{PaymentToken, Storefront, TransactionRecord, UserContext},
    provider::PaymentProvider,
    settings::GatewaySettings,
    types::*,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Gateway identifier, recorded on saved payment tokens
pub const GATEWAY_ID: &str = "securionpay";

/// Raw card fields from the checkout form
///
/// Deliberately not `Debug`: the number and CVC are still in the clear here.
#[derive(Clone)]
pub struct CardSubmission {
    /// Card number, may contain spaces
    pub number: String,
    /// CVC code
    pub cvc: String,
    /// Expiry as entered, e.g. "04 / 30"
    pub expiry: String,
}

impl CardSubmission {
    /// Validate and convert into card details
    pub fn into_card(self) -> PaymentResult<CardDetails> {
        let expiry = CardExpiry::parse(&self.expiry)?;
        let card = CardDetails::new(&self.number, &self.cvc, expiry);
        if card.number().is_empty() || !card.number().bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentError::InvalidCard(
                "The card number is incorrect.".to_string(),
            ));
        }
        Ok(card)
    }
}

/// Which payment method the shopper picked at checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSelection {
    /// Pay with a new card
    New,
    /// Pay with a saved card, by provider card id
    Saved(String),
}

/// The full checkout form submission
#[derive(Clone)]
pub struct CheckoutSubmission {
    /// New card fields, present when paying with a new card
    pub card: Option<CardSubmission>,
    /// Selected payment method
    pub token: TokenSelection,
    /// Whether the shopper asked to save the card for later
    pub save_card: bool,
}

/// Where the payment form is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutContext {
    /// The checkout page
    Checkout,
    /// The account page's add-payment-method form
    AccountPage,
}

/// What the payment form should show
#[derive(Debug, Clone)]
pub struct PaymentFields {
    /// Description text above the card fields
    pub description: String,
    /// Offer previously saved cards
    pub show_saved_methods: bool,
    /// Offer a save-card checkbox
    pub show_save_checkbox: bool,
}

/// Result of a payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment completed; send the shopper to `redirect`
    Success {
        /// Where to send the shopper next
        redirect: String,
    },
    /// Payment failed with a message to show the shopper
    Failure {
        /// User-facing message
        message: String,
    },
    /// The submission was invalid and no charge was attempted
    Aborted,
}

/// Result of a refund attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundOutcome {
    /// Refund completed
    Completed {
        /// Provider refund id
        refund_id: String,
    },
    /// The order has no stored transaction to refund against
    Unavailable,
    /// The requested amount was not refundable
    Rejected,
}

/// The SecurionPay checkout gateway
pub struct SecurionPayGateway<P: PaymentProvider> {
    settings: GatewaySettings,
    provider: Arc<P>,
}

impl<P: PaymentProvider> SecurionPayGateway<P> {
    /// Create a new gateway
    pub fn new(settings: GatewaySettings, provider: P) -> Self {
        Self {
            settings,
            provider: Arc::new(provider),
        }
    }

    /// Gateway settings
    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Get the provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether the gateway supports saved payment methods
    pub fn supports_tokenization(&self) -> bool {
        true
    }

    /// Describe the payment form for the given context
    pub fn payment_fields(&self, context: CheckoutContext) -> PaymentFields {
        match context {
            CheckoutContext::Checkout => PaymentFields {
                description: self.settings.checkout_description(),
                show_saved_methods: true,
                show_save_checkbox: true,
            },
            CheckoutContext::AccountPage => PaymentFields {
                description: self.settings.checkout_description(),
                show_saved_methods: false,
                show_save_checkbox: false,
            },
        }
    }

    /// Store a card with the provider and persist the resulting token.
    ///
    /// Reuses the shopper's provider customer when one is on file,
    /// creating one otherwise. The token saved is the customer's newest
    /// card, which is the one just added.
    pub async fn save_card(
        &self,
        store: &dyn Storefront,
        user: &UserContext,
        card: &CardDetails,
    ) -> PaymentResult<PaymentToken> {
        let customer = match store.customer_id(user.id) {
            Some(customer_id) => {
                self.provider
                    .update_customer(
                        &customer_id,
                        UpdateCustomerRequest {
                            card: Some(card.clone()),
                        },
                    )
                    .await?
            }
            None => {
                let customer = self
                    .provider
                    .create_customer(CreateCustomerRequest {
                        email: user.email.clone(),
                        card: Some(card.clone()),
                    })
                    .await?;
                store.set_customer_id(user.id, &customer.id);
                customer
            }
        };

        let stored = customer.newest_card().ok_or_else(|| {
            PaymentError::Provider("SecurionPay returned a customer with no cards.".to_string())
        })?;

        let token = PaymentToken {
            token: stored.id.clone(),
            gateway_id: GATEWAY_ID.to_string(),
            brand: card.brand(),
            last4: card.last4(),
            expiry: card.expiry,
            user_id: user.id,
        };
        store.save_token(token.clone());
        Ok(token)
    }

    /// Add a payment method from the account page
    pub async fn add_payment_method(
        &self,
        store: &dyn Storefront,
        user: &UserContext,
        submission: CardSubmission,
    ) -> PaymentOutcome {
        let card = match submission.into_card() {
            Ok(card) => card,
            Err(err) => return card_error_notice(&err),
        };

        match self.save_card(store, user, &card).await {
            Ok(_) => PaymentOutcome::Success {
                redirect: store.payment_methods_url(),
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to add payment method");
                card_error_notice(&err)
            }
        }
    }

    /// Process a checkout payment for an order
    pub async fn process_payment(
        &self,
        store: &dyn Storefront,
        user: Option<&UserContext>,
        order_id: u64,
        submission: CheckoutSubmission,
    ) -> PaymentOutcome {
        let Some(total) = store.order_total(order_id) else {
            return PaymentOutcome::Failure {
                message: "Order not found.".to_string(),
            };
        };
        let amount = Money::from_decimal(total, store.currency());

        let (source, fresh_card) = match &submission.token {
            TokenSelection::Saved(token_id) => {
                // A saved token must exist and belong to the shopper.
                let Some(saved) = store.find_token(token_id) else {
                    tracing::warn!(order_id, "payment token not found");
                    return PaymentOutcome::Aborted;
                };
                let owned = user.is_some_and(|u| u.id == saved.user_id);
                if !owned || saved.gateway_id != GATEWAY_ID {
                    tracing::warn!(order_id, "payment token does not belong to the shopper");
                    return PaymentOutcome::Aborted;
                }
                let customer_id = user.and_then(|u| store.customer_id(u.id));
                (
                    PaymentSource::Token {
                        token: saved.token,
                        customer_id,
                    },
                    None,
                )
            }
            TokenSelection::New => {
                let Some(card_fields) = submission.card.clone() else {
                    return PaymentOutcome::Failure {
                        message: "Please enter your card details.".to_string(),
                    };
                };
                match card_fields.into_card() {
                    Ok(card) => (PaymentSource::Card(card.clone()), Some(card)),
                    Err(err) => {
                        return PaymentOutcome::Failure {
                            message: err.user_message(),
                        };
                    }
                }
            }
        };

        let request = ChargeRequest::new(amount, source)
            .description(format!("Order #{order_id}"))
            .idempotency_key(uuid::Uuid::new_v4().to_string());

        let charge = match self.provider.charge(request).await {
            Ok(charge) => charge,
            Err(err) => {
                tracing::warn!(order_id, error = %err, "charge failed");
                return PaymentOutcome::Failure {
                    message: err.user_message(),
                };
            }
        };

        if charge.status != ChargeStatus::Succeeded {
            tracing::warn!(order_id, charge_id = %charge.id, status = ?charge.status,
                "charge did not succeed");
            return PaymentOutcome::Failure {
                message: "Your card was declined. Please try another card.".to_string(),
            };
        }

        self.complete_order(store, order_id, &charge, fresh_card.as_ref(), &submission);

        // Saving the card is best effort; the payment already went through.
        if submission.save_card {
            if let (Some(user), Some(card)) = (user, fresh_card.as_ref()) {
                if let Err(err) = self.save_card(store, user, card).await {
                    tracing::warn!(order_id, error = %err, "failed to save card after payment");
                }
            }
        }

        PaymentOutcome::Success {
            redirect: store.receipt_url(order_id),
        }
    }

    fn complete_order(
        &self,
        store: &dyn Storefront,
        order_id: u64,
        charge: &Charge,
        fresh_card: Option<&CardDetails>,
        submission: &CheckoutSubmission,
    ) {
        store.payment_complete(order_id, &charge.id);
        store.reduce_stock(order_id);
        store.clear_cart();
        store.add_order_note(
            order_id,
            &format!(
                "SecurionPay payment completed for {}. Transaction ID: {}",
                charge.amount, charge.id
            ),
        );

        let last4 = charge
            .card
            .as_ref()
            .map(|c| c.last4.clone())
            .or_else(|| fresh_card.map(|c| c.last4()))
            .unwrap_or_default();
        let expiry = match (&submission.token, fresh_card) {
            (_, Some(card)) => card.expiry.mmyy(),
            (TokenSelection::Saved(token_id), None) => store
                .find_token(token_id)
                .map(|t| t.expiry.mmyy())
                .unwrap_or_default(),
            _ => String::new(),
        };
        store.set_transaction(
            order_id,
            TransactionRecord {
                transaction_id: charge.id.clone(),
                last4,
                expiry,
            },
        );

        tracing::info!(order_id, charge_id = %charge.id, amount = %charge.amount,
            "payment completed");
    }

    /// Refund part or all of an order's payment
    pub async fn process_refund(
        &self,
        store: &dyn Storefront,
        order_id: u64,
        amount: Decimal,
    ) -> PaymentResult<RefundOutcome> {
        let Some(record) = store.transaction(order_id) else {
            return Ok(RefundOutcome::Unavailable);
        };

        let money = Money::from_decimal(amount, store.currency());
        if money.amount <= 0 {
            return Ok(RefundOutcome::Rejected);
        }

        let request = RefundRequest::new(record.transaction_id.clone()).amount(money);
        match self.provider.refund(request).await {
            Ok(refund) if refund.status != RefundStatus::Failed => {
                store.add_order_note(
                    order_id,
                    &format!(
                        "SecurionPay refund completed for {}. Refund ID: {}",
                        money, refund.id
                    ),
                );
                tracing::info!(order_id, refund_id = %refund.id, amount = %money,
                    "refund completed");
                Ok(RefundOutcome::Completed {
                    refund_id: refund.id,
                })
            }
            Ok(refund) => {
                let message = format!("SecurionPay refund failed. Refund ID: {}", refund.id);
                store.add_order_note(order_id, &message);
                Err(PaymentError::Provider(message))
            }
            Err(err) => {
                store.add_order_note(
                    order_id,
                    &format!("SecurionPay refund failed: {}", err.user_message()),
                );
                tracing::warn!(order_id, error = %err, "refund failed");
                Err(err)
            }
        }
    }
}

/// Notice shown when adding a payment method fails.
///
/// Falls back to a generic line when the failure carries no message.
fn card_error_notice(err: &PaymentError) -> PaymentOutcome {
    let message = err.user_message();
    let message = if message.is_empty() {
        "Error adding card. Please try again.".to_string()
    } else {
        format!("Error adding card: {message}")
    };
    PaymentOutcome::Failure { message }
}
