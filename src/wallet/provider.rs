//! Environment-backed wallet provider
//!
//! Reads the wallet key from an environment variable on every request, so a
//! missing variable behaves like "no wallet present" and a changed key behaves
//! like the user switching accounts.

use super::{SecureWallet, WalletProvider, WalletSigner};
use crate::Result;
use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::Arc;

/// Wallet provider that resolves its key from the process environment
#[derive(Debug, Clone)]
pub struct EnvWalletProvider {
    var_name: String,
}

impl EnvWalletProvider {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }
}

#[async_trait]
impl WalletProvider for EnvWalletProvider {
    async fn list_active_accounts(&self) -> Result<Vec<Address>> {
        let wallet = SecureWallet::try_from_env(&self.var_name)?;
        Ok(wallet.iter().map(SecureWallet::address).collect())
    }

    async fn get_signer(&self) -> Result<Arc<dyn WalletSigner>> {
        let wallet = SecureWallet::from_env(&self.var_name)?;

        tracing::debug!(
            var = %self.var_name,
            address = %wallet.address_string(),
            "Loaded wallet from environment"
        );
        Ok(Arc::new(wallet))
    }
}
