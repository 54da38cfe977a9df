//! Message signing and verification
//!
//! Signing goes through the wallet bound to a [`WalletSession`]. Verification
//! needs no wallet: it recovers the signer from `(msg, sig)` and compares it
//! with the claimed address.
//!
//! The exchanged form of a signed message is a JSON object with the string
//! keys `msg`, `sig` and `address`.

mod recover;

pub use recover::{decode_signature, encode_signature, recover_address};

use crate::session::WalletSession;
use crate::{Error, Result};
use alloy::primitives::{Address, Signature};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message together with its signature and the address that produced it
///
/// Only produced by a successful [`sign`] or by parsing a well-formed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignedMessageRecord", into = "SignedMessageRecord")]
pub struct SignedMessage {
    msg: String,
    sig: Signature,
    address: Address,
}

/// Wire form of [`SignedMessage`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SignedMessageRecord {
    msg: String,
    sig: String,
    address: String,
}

impl SignedMessage {
    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Check that `sig` over `msg` was produced by `address`
    pub fn verify(&self) -> Result<VerifyResult> {
        let recovered = recover::recover_from(&self.msg, &self.sig)?;
        Ok(VerifyResult::compare(recovered, self.address))
    }

    /// Export as pretty-printed JSON
    pub fn to_json_pretty(&self, indent: usize) -> Result<String> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

impl TryFrom<SignedMessageRecord> for SignedMessage {
    type Error = Error;

    fn try_from(record: SignedMessageRecord) -> Result<Self> {
        let candidate = Candidate::parse(&record.msg, &record.sig, &record.address)?;
        Ok(Self {
            sig: decode_signature(candidate.sig)?,
            address: candidate.address,
            msg: record.msg,
        })
    }
}

impl From<SignedMessage> for SignedMessageRecord {
    fn from(signed: SignedMessage) -> Self {
        Self {
            sig: encode_signature(&signed.sig),
            address: signed.address.to_checksum(None),
            msg: signed.msg,
        }
    }
}

/// Outcome of a completed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    /// The recovered signer is the claimed address
    Valid { recovered: Address },
    /// The signature is well formed but was made by someone else
    Mismatch { recovered: Address, claimed: Address },
}

impl VerifyResult {
    fn compare(recovered: Address, claimed: Address) -> Self {
        if recovered == claimed {
            Self::Valid { recovered }
        } else {
            Self::Mismatch { recovered, claimed }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn recovered(&self) -> Address {
        match self {
            Self::Valid { recovered } | Self::Mismatch { recovered, .. } => *recovered,
        }
    }

    /// One-line message for the user
    pub fn notice(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "Signature verified",
            Self::Mismatch { .. } => "Signature not verified",
        }
    }
}

/// Structurally valid verification input
struct Candidate<'a> {
    msg: &'a str,
    sig: &'a str,
    address: Address,
}

impl<'a> Candidate<'a> {
    fn from_value(value: &'a Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::MalformedInput("expected a JSON object with msg, sig and address".to_string())
        })?;

        Self::parse(
            string_field(object, "msg")?,
            string_field(object, "sig")?,
            string_field(object, "address")?,
        )
    }

    fn parse(msg: &'a str, sig: &'a str, address: &'a str) -> Result<Self> {
        if msg.is_empty() {
            return Err(Error::MalformedInput("`msg` is empty".to_string()));
        }
        if !recover::is_signature_shaped(sig) {
            return Err(Error::MalformedInput(
                "`sig` must be a non-empty hex string".to_string(),
            ));
        }
        let address = recover::parse_address(address).ok_or_else(|| {
            Error::MalformedInput("`address` must be 0x followed by 40 hex digits".to_string())
        })?;

        Ok(Self { msg, sig, address })
    }

    fn check(&self) -> Result<VerifyResult> {
        let recovered = recover_address(self.msg, self.sig)?;
        Ok(VerifyResult::compare(recovered, self.address))
    }
}

fn string_field<'v>(object: &'v Map<String, Value>, name: &str) -> Result<&'v str> {
    object
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedInput(format!("missing string field `{}`", name)))
}

/// Sign `message` with the wallet bound to `session`
///
/// Fails with [`Error::NotConnected`] before any wallet call when the
/// session is disconnected.
pub async fn sign(session: &WalletSession, message: &str) -> Result<SignedMessage> {
    let (address, signer) = session.signer().ok_or(Error::NotConnected)?;

    if message.is_empty() {
        return Err(Error::MalformedInput("message to sign is empty".to_string()));
    }

    let sig = signer.sign_message(message.as_bytes()).await.map_err(|e| match e {
        Error::SigningFailed(_) => e,
        other => Error::SigningFailed(other.to_string()),
    })?;

    tracing::info!(%address, msg_len = message.len(), "Message signed");

    Ok(SignedMessage {
        msg: message.to_string(),
        sig,
        address,
    })
}

/// Verify an untyped `{ msg, sig, address }` candidate
pub fn verify(candidate: &Value) -> Result<VerifyResult> {
    let result = Candidate::from_value(candidate)?.check()?;
    tracing::debug!(
        recovered = %result.recovered(),
        valid = result.is_valid(),
        "Signature checked"
    );
    Ok(result)
}

/// Verify user-supplied JSON text
pub fn verify_json(input: &str) -> Result<VerifyResult> {
    if input.trim().is_empty() {
        return Err(Error::MalformedInput(
            "Please enter a valid signature JSON.".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(input)
        .map_err(|e| Error::MalformedInput(format!("Invalid JSON: {}", e)))?;
    verify(&value)
}
