//! Payment provider implementations

pub mod securionpay;

pub use securionpay::SecurionPayProvider;
