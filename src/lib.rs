//! SecurionPay payment gateway for storefront checkouts
//!
//! Provides a checkout gateway backed by the SecurionPay API: card
//! charges, saved payment methods, and refunds, with order side effects
//! applied through a storefront integration trait.
//!
//! ## Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  SecurionPay Gateway                       │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │               SecurionPayGateway                     │  │
//! │  │  process_payment() | process_refund() | save_card()  │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │            │                            │                  │
//! │            ▼                            ▼                  │
//! │  ┌──────────────────┐        ┌──────────────────────────┐  │
//! │  │  PaymentProvider │        │       Storefront         │  │
//! │  │ (SecurionPay API)│        │ (orders, tokens, notes)  │  │
//! │  └──────────────────┘        └──────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use securionpay_gateway::{
//!     GatewaySettings, SecurionPayGateway, SecurionPayProvider,
//! };
//!
//! let settings = GatewaySettings::default();
//! let provider = SecurionPayProvider::new(settings.active_secret_key().clone());
//! let gateway = SecurionPayGateway::new(settings, provider);
//!
//! let outcome = gateway
//!     .process_payment(&store, Some(&user), order_id, submission)
//!     .await;
//! ```

pub mod card;
pub mod error;
pub mod gateway;
pub mod money;
pub mod platform;
pub mod provider;
pub mod settings;
pub mod types;

pub mod providers;

pub use card::*;
pub use error::*;
pub use gateway::*;
pub use money::*;
pub use platform::*;
pub use provider::*;
pub use settings::*;
pub use types::*;

pub use providers::SecurionPayProvider;
