//! Error types for message signing and verification

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Error signing the message: {0}")]
    SigningFailed(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
