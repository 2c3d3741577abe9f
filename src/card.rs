//! Card brands, expiry dates, and raw card details
//!
//! Brand detection runs the full card number against an ordered pattern
//! table and stops at the first match. A number that matches nothing has
//! no brand; callers must treat that as terminal rather than guessing.

use crate::error::{PaymentError, PaymentResult};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Card brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
}

/// Brand patterns in match order. Visa is tested first; Diners last.
static BRAND_PATTERNS: LazyLock<Vec<(Regex, CardBrand)>> = LazyLock::new(|| {
    [
        (r"^4\d{12}(\d{3})?(\d{3})?$", CardBrand::Visa),
        (r"^3[47]\d{13}$", CardBrand::Amex),
        (
            r"^(5[1-5]\d{4}|677189|222[1-9]\d{2}|22[3-9]\d{3}|2[3-6]\d{4}|27[01]\d{3}|2720\d{2})\d{10}$",
            CardBrand::Mastercard,
        ),
        (
            r"^(6011|65\d{2}|64[4-9]\d)\d{12}|(62\d{14})$",
            CardBrand::Discover,
        ),
        (r"^35(28|29|[3-8]\d)\d{12}$", CardBrand::Jcb),
        (r"^3(0[0-5]|[68]\d)\d{11}$", CardBrand::Diners),
    ]
    .into_iter()
    .map(|(pattern, brand)| (Regex::new(pattern).unwrap(), brand))
    .collect()
});

impl CardBrand {
    /// Detect the brand from a card number (digits only).
    ///
    /// Returns `None` when no pattern matches.
    pub fn detect(number: &str) -> Option<Self> {
        BRAND_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(number))
            .map(|(_, brand)| *brand)
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "MasterCard",
            Self::Amex => "American Express",
            Self::Discover => "Discover",
            Self::Jcb => "JCB",
            Self::Diners => "Diners Club",
        }
    }

    /// Lowercase identifier, used for icon filenames and stored tokens
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Jcb => "jcb",
            Self::Diners => "diners",
        }
    }

    /// Parse from a stored identifier or provider brand string
    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" => Some(Self::Mastercard),
            "amex" | "american express" => Some(Self::Amex),
            "discover" => Some(Self::Discover),
            "jcb" => Some(Self::Jcb),
            "diners" | "diners club" => Some(Self::Diners),
            _ => None,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Card expiry date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    /// Month, 1-12
    pub month: u8,
    /// Full four-digit year
    pub year: u16,
}

impl CardExpiry {
    /// Create a validated expiry
    pub fn new(month: u8, year: u16) -> PaymentResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(PaymentError::InvalidCard(format!(
                "invalid expiry month: {month}"
            )));
        }
        Ok(Self { month, year })
    }

    /// Parse from checkout input, "MM / YY" or "MM/YYYY"
    pub fn parse(input: &str) -> PaymentResult<Self> {
        let mut parts = input.split('/');
        let (month, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(m), Some(y), None) => (m.trim(), y.trim()),
            _ => {
                return Err(PaymentError::InvalidCard(format!(
                    "invalid expiry date: {input}"
                )));
            }
        };

        let month: u8 = month
            .parse()
            .map_err(|_| PaymentError::InvalidCard(format!("invalid expiry month: {month}")))?;
        let year: u16 = year
            .parse()
            .map_err(|_| PaymentError::InvalidCard(format!("invalid expiry year: {year}")))?;
        let year = if year < 100 { 2000 + year } else { year };

        Self::new(month, year)
    }

    /// Month as zero-padded string
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Four-digit year as string
    pub fn year_str(&self) -> String {
        self.year.to_string()
    }

    /// Compact `MMYY` form used in stored transaction records
    pub fn mmyy(&self) -> String {
        format!("{:02}{:02}", self.month, self.year % 100)
    }
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Raw card details captured at checkout
///
/// Number and CVC are held as secrets so they never leak through `Debug`
/// output or logs.
pub struct CardDetails {
    number: SecretString,
    cvc: SecretString,
    /// Expiry date
    pub expiry: CardExpiry,
}

impl CardDetails {
    /// Create from checkout input. Spaces in the number are stripped.
    pub fn new(number: &str, cvc: &str, expiry: CardExpiry) -> Self {
        let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            number: SecretString::from(digits),
            cvc: SecretString::from(cvc.trim().to_owned()),
            expiry,
        }
    }

    /// Card number digits
    pub fn number(&self) -> &str {
        self.number.expose_secret()
    }

    /// CVC code
    pub fn cvc(&self) -> &str {
        self.cvc.expose_secret()
    }

    /// Detected brand, if any pattern matches
    pub fn brand(&self) -> Option<CardBrand> {
        CardBrand::detect(self.number.expose_secret())
    }

    /// Last four digits of the number
    pub fn last4(&self) -> String {
        let digits = self.number.expose_secret();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }
}

impl Clone for CardDetails {
    fn clone(&self) -> Self {
        Self {
            number: SecretString::from(self.number.expose_secret().to_owned()),
            cvc: SecretString::from(self.cvc.expose_secret().to_owned()),
            expiry: self.expiry,
        }
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format!("****{}", self.last4()))
            .field("cvc", &"***")
            .field("expiry", &self.expiry)
            .finish()
    }
}
