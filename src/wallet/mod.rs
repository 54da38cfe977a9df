//! Wallet capability
//!
//! The core never touches key material directly. A wallet is an opaque
//! capability that lists its active accounts and hands out a signer; the
//! signer resolves its address and signs message bytes.

mod provider;
mod signer;

pub use provider::EnvWalletProvider;
pub use signer::SecureWallet;

use crate::Result;
use alloy::primitives::{Address, Signature};
use async_trait::async_trait;
use std::sync::Arc;

/// Environment-provided source of signing capabilities
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the wallet currently exposes, without prompting the user
    async fn list_active_accounts(&self) -> Result<Vec<Address>>;

    /// Request a signer for the active account
    ///
    /// This is where a user may be asked to approve the connection.
    async fn get_signer(&self) -> Result<Arc<dyn WalletSigner>>;
}

/// A bound signing capability
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Address of the key behind this signer
    async fn get_address(&self) -> Result<Address>;

    /// Sign `message` as an EIP-191 personal message
    async fn sign_message(&self, message: &[u8]) -> Result<Signature>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable wallet used by the session and signature tests.

    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Well-known development keys (DO NOT use in production!)
    pub const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    pub const ADDRESS_A: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    pub const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    pub const ADDRESS_B: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serializes tests that read or write the process environment
    pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub struct MockProvider {
        accounts: Mutex<Vec<SecureWallet>>,
        reject_connect: AtomicBool,
        reject_signing: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        pub fn with_keys(keys: &[&str]) -> Arc<Self> {
            let accounts = keys
                .iter()
                .map(|key| SecureWallet::from_hex(key).unwrap())
                .collect();
            Arc::new(Self {
                accounts: Mutex::new(accounts),
                reject_connect: AtomicBool::new(false),
                reject_signing: Arc::new(AtomicBool::new(false)),
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }

        pub fn empty() -> Arc<Self> {
            Self::with_keys(&[])
        }

        /// Make `key` the active account, as if the user switched accounts
        pub fn switch_to(&self, key: &str) {
            let mut accounts = self.accounts.lock().unwrap();
            accounts.clear();
            accounts.push(SecureWallet::from_hex(key).unwrap());
        }

        pub fn reject_connect(&self) {
            self.reject_connect.store(true, Ordering::SeqCst);
        }

        pub fn reject_signing(&self) {
            self.reject_signing.store(true, Ordering::SeqCst);
        }

        /// Number of calls that reached the provider or one of its signers
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WalletProvider for MockProvider {
        async fn list_active_accounts(&self) -> Result<Vec<Address>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.iter().map(SecureWallet::address).collect())
        }

        async fn get_signer(&self) -> Result<Arc<dyn WalletSigner>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_connect.load(Ordering::SeqCst) {
                return Err(Error::WalletUnavailable(
                    "User rejected the request".to_string(),
                ));
            }

            let accounts = self.accounts.lock().unwrap();
            let wallet = accounts
                .first()
                .cloned()
                .ok_or_else(|| Error::WalletUnavailable("No wallet present".to_string()))?;

            Ok(Arc::new(MockSigner {
                wallet,
                reject: Arc::clone(&self.reject_signing),
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    struct MockSigner {
        wallet: SecureWallet,
        reject: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl WalletSigner for MockSigner {
        async fn get_address(&self) -> Result<Address> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.wallet.address())
        }

        async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject.load(Ordering::SeqCst) {
                return Err(Error::SigningFailed("User denied message signature".to_string()));
            }
            self.wallet.sign_message(message).await
        }
    }
}
