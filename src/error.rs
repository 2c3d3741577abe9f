//! Error types for payment processing

use thiserror::Error;

/// Payment error types
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Card declined
    #[error("Card declined: {0}")]
    CardDeclined(String),

    /// Invalid card
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// Customer not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Message suitable for showing to the shopper.
    ///
    /// Card and validation failures carry messages written for end users;
    /// everything else keeps its variant prefix so the notice makes clear
    /// the problem was not the card.
    pub fn user_message(&self) -> String {
        match self {
            Self::CardDeclined(msg)
            | Self::InvalidCard(msg)
            | Self::Provider(msg)
            | Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Decline code for card errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineCode {
    /// Generic decline
    GenericDecline,
    /// Insufficient funds
    InsufficientFunds,
    /// Lost or stolen card
    LostOrStolenCard,
    /// Expired card
    ExpiredCard,
    /// Incorrect CVC
    IncorrectCvc,
    /// Incorrect number
    IncorrectNumber,
    /// Processing error
    ProcessingError,
    /// Suspected fraud
    SuspectedFraud,
    /// Unknown
    Unknown,
}

impl DeclineCode {
    /// Parse from a provider error code
    pub fn from_code(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "card_declined" | "do_not_honor" | "generic_decline" => Self::GenericDecline,
            "insufficient_funds" => Self::InsufficientFunds,
            "lost_or_stolen" | "lost_card" | "stolen_card" => Self::LostOrStolenCard,
            "expired_card" => Self::ExpiredCard,
            "incorrect_cvc" | "invalid_cvc" => Self::IncorrectCvc,
            "incorrect_number" | "invalid_number" => Self::IncorrectNumber,
            "processing_error" => Self::ProcessingError,
            "suspected_fraud" | "fraudulent" => Self::SuspectedFraud,
            _ => Self::Unknown,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            Self::GenericDecline => "Your card was declined. Please try another card.",
            Self::InsufficientFunds => "Your card has insufficient funds.",
            Self::LostOrStolenCard => "This card has been reported lost or stolen.",
            Self::ExpiredCard => "Your card has expired.",
            Self::IncorrectCvc => "The CVC code is incorrect.",
            Self::IncorrectNumber => "The card number is incorrect.",
            Self::ProcessingError => "There was an error processing your card. Please try again.",
            Self::SuspectedFraud => "This transaction has been flagged as potentially fraudulent.",
            Self::Unknown => "Your card was declined. Please contact your bank.",
        }
    }
}
