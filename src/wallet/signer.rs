//! Key-backed wallet implementation
//!
//! SECURITY: This is the ONLY place where private keys exist.
//! - Keys are held in alloy's PrivateKeySigner which handles crypto securely
//! - Keys are never serialized to JSON
//! - Keys are never logged

use super::{WalletProvider, WalletSigner};
use crate::{Error, Result};
use alloy::primitives::{eip191_hash_message, Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Wallet that protects its private key
///
/// The private key is:
/// - Stored in alloy's PrivateKeySigner
/// - Never serialized (no Serialize impl)
/// - Only accessible via signing operations
#[derive(Clone)]
pub struct SecureWallet {
    /// The signer
    signer: PrivateKeySigner,
    /// Public address (safe to expose)
    address: Address,
}

impl SecureWallet {
    /// Create a wallet from an environment variable
    ///
    /// # Arguments
    /// * `var_name` - Name of the environment variable containing the private key
    pub fn from_env(var_name: &str) -> Result<Self> {
        Self::try_from_env(var_name)?.ok_or_else(|| {
            Error::WalletUnavailable(format!(
                "Environment variable {} not set. Required for wallet initialization.",
                var_name
            ))
        })
    }

    /// Like [`SecureWallet::from_env`], but an unset or blank variable is `None`
    pub fn try_from_env(var_name: &str) -> Result<Option<Self>> {
        match std::env::var(var_name) {
            Ok(key) if !key.trim().is_empty() => {
                Self::from_secret(&SecretString::from(key)).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Create a wallet from a secret hex-encoded private key
    pub fn from_secret(key: &SecretString) -> Result<Self> {
        Self::from_hex(key.expose_secret())
    }

    /// Create a wallet from a hex-encoded private key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::WalletUnavailable(format!("Invalid private key: {}", e)))?;

        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the address as a checksummed string
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Sign a message hash
    ///
    /// This is the ONLY way to use the private key.
    pub async fn sign_hash(&self, hash: &B256) -> Result<Signature> {
        use alloy::signers::SignerSync;

        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| Error::SigningFailed(e.to_string()))
    }
}

#[async_trait]
impl WalletSigner for SecureWallet {
    async fn get_address(&self) -> Result<Address> {
        Ok(self.address)
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        let hash = eip191_hash_message(message);
        self.sign_hash(&hash).await
    }
}

/// A key-backed wallet always exposes exactly one active account.
#[async_trait]
impl WalletProvider for SecureWallet {
    async fn list_active_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn get_signer(&self) -> Result<Arc<dyn WalletSigner>> {
        Ok(Arc::new(self.clone()))
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for SecureWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::{env_lock, ADDRESS_A, KEY_A};

    #[test]
    fn test_wallet_from_hex() {
        let wallet = SecureWallet::from_hex(KEY_A).unwrap();

        assert_eq!(
            wallet.address_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(wallet.address_string(), ADDRESS_A);
    }

    #[test]
    fn test_wallet_from_hex_without_prefix() {
        let wallet = SecureWallet::from_hex(KEY_A.trim_start_matches("0x")).unwrap();
        assert_eq!(wallet.address_string(), ADDRESS_A);
    }

    #[test]
    fn test_wallet_from_env() {
        let _env = env_lock();
        let var = "MESSAGE_SIGNER_TEST_WALLET_FROM_ENV";
        std::env::remove_var(var);
        let err = SecureWallet::from_env(var).unwrap_err();
        assert!(format!("{err}").contains(var));

        std::env::set_var(var, KEY_A);
        let wallet = SecureWallet::from_env(var).unwrap();
        assert_eq!(wallet.address_string(), ADDRESS_A);
        std::env::remove_var(var);
    }

    #[test]
    fn test_invalid_key_is_unavailable() {
        let err = SecureWallet::from_hex("0xnot-a-key").unwrap_err();
        assert!(matches!(err, Error::WalletUnavailable(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let wallet = SecureWallet::from_hex(KEY_A).unwrap();

        let debug_str = format!("{:?}", wallet);

        // Should not contain the private key
        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_signature_recovers_to_wallet_address() {
        let wallet = SecureWallet::from_hex(KEY_A).unwrap();

        let signature = wallet.sign_message(b"hello world").await.unwrap();
        let recovered = signature.recover_address_from_msg("hello world").unwrap();

        assert_eq!(recovered, wallet.address());
    }

    #[tokio::test]
    async fn test_wallet_is_its_own_provider() {
        let wallet = SecureWallet::from_hex(KEY_A).unwrap();

        let accounts = wallet.list_active_accounts().await.unwrap();
        assert_eq!(accounts, vec![wallet.address()]);

        let signer = wallet.get_signer().await.unwrap();
        assert_eq!(signer.get_address().await.unwrap(), wallet.address());
    }
}
