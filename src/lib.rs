//! Message Signer
//!
//! Connects a wallet, signs arbitrary text messages with it and verifies
//! previously produced `(msg, sig, address)` triples.
//!
//! # Security Model
//!
//! - Private keys never leave the wallet module
//! - Verification is pure and needs no wallet
//! - The audit log records addresses and outcomes, never messages or signatures

pub mod audit;
pub mod config;
pub mod session;
pub mod signature;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{Config, PRIVATE_KEY_ENV};
pub use error::{Error, Result};
pub use session::WalletSession;
pub use signature::{sign, verify, verify_json, SignedMessage, VerifyResult};
