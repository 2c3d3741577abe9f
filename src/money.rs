//! Money and currency types
//!
//! Charge amounts are sent to the processor in the smallest currency unit.
//! For most currencies that means multiplying the checkout total by 100;
//! zero-decimal currencies (JPY, KRW, the franc family, ...) are sent as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Currency codes (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    INR,
    MXN,
    BRL,
    SGD,
    HKD,
    NZD,
    SEK,
    NOK,
    DKK,
    PLN,
    ZAR,
    KRW,
    BIF,
    CLP,
    DJF,
    GNF,
    ISK,
    KMF,
    PYG,
    RWF,
    UGX,
    UYI,
    XAF,
}

impl Currency {
    /// Get currency code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::JPY => "JPY",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::CHF => "CHF",
            Self::CNY => "CNY",
            Self::INR => "INR",
            Self::MXN => "MXN",
            Self::BRL => "BRL",
            Self::SGD => "SGD",
            Self::HKD => "HKD",
            Self::NZD => "NZD",
            Self::SEK => "SEK",
            Self::NOK => "NOK",
            Self::DKK => "DKK",
            Self::PLN => "PLN",
            Self::ZAR => "ZAR",
            Self::KRW => "KRW",
            Self::BIF => "BIF",
            Self::CLP => "CLP",
            Self::DJF => "DJF",
            Self::GNF => "GNF",
            Self::ISK => "ISK",
            Self::KMF => "KMF",
            Self::PYG => "PYG",
            Self::RWF => "RWF",
            Self::UGX => "UGX",
            Self::UYI => "UYI",
            Self::XAF => "XAF",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD | Self::NZD | Self::SGD | Self::HKD | Self::MXN
            | Self::CLP => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::JPY | Self::CNY => "¥",
            Self::CHF => "CHF",
            Self::INR => "₹",
            Self::BRL => "R$",
            Self::SEK | Self::NOK | Self::DKK | Self::ISK => "kr",
            Self::PLN => "zł",
            Self::ZAR => "R",
            Self::KRW => "₩",
            Self::BIF | Self::DJF | Self::GNF | Self::KMF | Self::RWF | Self::XAF => "Fr",
            Self::PYG => "₲",
            Self::UGX => "USh",
            Self::UYI => "$U",
        }
    }

    /// Get decimal places (0 for zero-decimal currencies)
    pub fn decimals(&self) -> u32 {
        match self {
            Self::JPY
            | Self::KRW
            | Self::BIF
            | Self::CLP
            | Self::DJF
            | Self::GNF
            | Self::ISK
            | Self::KMF
            | Self::PYG
            | Self::RWF
            | Self::UGX
            | Self::UYI
            | Self::XAF => 0,
            _ => 2,
        }
    }

    /// Is a zero-decimal currency
    pub fn is_zero_decimal(&self) -> bool {
        self.decimals() == 0
    }

    /// Parse from string (case-insensitive)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "JPY" => Some(Self::JPY),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            "CHF" => Some(Self::CHF),
            "CNY" => Some(Self::CNY),
            "INR" => Some(Self::INR),
            "MXN" => Some(Self::MXN),
            "BRL" => Some(Self::BRL),
            "SGD" => Some(Self::SGD),
            "HKD" => Some(Self::HKD),
            "NZD" => Some(Self::NZD),
            "SEK" => Some(Self::SEK),
            "NOK" => Some(Self::NOK),
            "DKK" => Some(Self::DKK),
            "PLN" => Some(Self::PLN),
            "ZAR" => Some(Self::ZAR),
            "KRW" => Some(Self::KRW),
            "BIF" => Some(Self::BIF),
            "CLP" => Some(Self::CLP),
            "DJF" => Some(Self::DJF),
            "GNF" => Some(Self::GNF),
            "ISK" => Some(Self::ISK),
            "KMF" => Some(Self::KMF),
            "PYG" => Some(Self::PYG),
            "RWF" => Some(Self::RWF),
            "UGX" => Some(Self::UGX),
            "UYI" => Some(Self::UYI),
            "XAF" => Some(Self::XAF),
            _ => None,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Money amount with currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in smallest currency unit (cents, pence, etc.)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Money {
    /// Create a new money amount from smallest unit
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create from decimal amount (e.g., 29.99)
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Self {
        let multiplier = 10i64.pow(currency.decimals());
        let amount = (amount * Decimal::from(multiplier))
            .round()
            .to_string()
            .parse()
            .unwrap_or(0);
        Self { amount, currency }
    }

    /// Create from float amount
    pub fn from_float(amount: f64, currency: Currency) -> Self {
        let multiplier = 10f64.powi(currency.decimals() as i32);
        let amount = (amount * multiplier).round() as i64;
        Self { amount, currency }
    }

    /// Create USD amount from cents
    pub fn usd(cents: i64) -> Self {
        Self::new(cents, Currency::USD)
    }

    /// Get amount as decimal
    pub fn to_decimal(&self) -> Decimal {
        let divisor = Decimal::from(10i64.pow(self.currency.decimals()));
        Decimal::from(self.amount) / divisor
    }

    /// Get amount as float
    pub fn to_float(&self) -> f64 {
        let divisor = 10f64.powi(self.currency.decimals() as i32);
        self.amount as f64 / divisor
    }

    /// Format for display
    pub fn format(&self) -> String {
        let decimal = self.to_decimal();
        format!(
            "{}{:.prec$}",
            self.currency.symbol(),
            decimal,
            prec = self.currency.decimals() as usize
        )
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "Currency mismatch");
        Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        }
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "Currency mismatch");
        Self {
            amount: self.amount - other.amount,
            currency: self.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_money_creation() {
        let money = Money::usd(1999);
        assert_eq!(money.amount, 1999);
        assert_eq!(money.currency, Currency::USD);
    }

    #[test]
    fn test_decimal_currency_scales_by_hundred() {
        let total = Decimal::from_str("19.99").unwrap();
        let money = Money::from_decimal(total, Currency::USD);
        assert_eq!(money.amount, 1999);
    }

    #[test]
    fn test_zero_decimal_currency_passes_unscaled() {
        let total = Decimal::from(500);
        let money = Money::from_decimal(total, Currency::JPY);
        assert_eq!(money.amount, 500);

        let money = Money::from_decimal(Decimal::from(1200), Currency::ISK);
        assert_eq!(money.amount, 1200);
    }

    #[test]
    fn test_fractional_amount_rounds() {
        let total = Decimal::from_str("10.006").unwrap();
        let money = Money::from_decimal(total, Currency::USD);
        assert_eq!(money.amount, 1001);
    }

    #[test]
    fn test_currency_from_code_case_insensitive() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("Jpy"), Some(Currency::JPY));
        assert_eq!(Currency::from_code("XAF"), Some(Currency::XAF));
        assert_eq!(Currency::from_code("XYZ"), None);
    }

    #[test]
    fn test_zero_decimal_set() {
        for code in [
            "JPY", "BIF", "CLP", "DJF", "GNF", "ISK", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI",
            "XAF",
        ] {
            assert!(
                Currency::from_code(code).unwrap().is_zero_decimal(),
                "{code} should be zero-decimal"
            );
        }
        assert!(!Currency::EUR.is_zero_decimal());
    }

    #[test]
    fn test_money_format() {
        assert_eq!(Money::usd(1999).format(), "$19.99");
        assert_eq!(Money::new(500, Currency::JPY).format(), "¥500");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::usd(1000);
        let b = Money::usd(500);
        assert_eq!((a + b).amount, 1500);
        assert_eq!((a - b).amount, 500);
    }
}
