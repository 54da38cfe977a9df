//! Wallet session
//!
//! Tracks whether a signing capability is bound and which address it belongs
//! to. A session starts disconnected and only changes state through
//! [`WalletSession::connect`] or [`WalletSession::restore`]; failed calls leave
//! the previous binding untouched.

use crate::wallet::{WalletProvider, WalletSigner};
use crate::{Error, Result};
use alloy::primitives::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};

enum SessionState {
    Disconnected,
    Connected {
        address: Address,
        signer: Arc<dyn WalletSigner>,
    },
}

/// Binding between a wallet provider and the account currently used for signing
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    state: SessionState,
}

impl WalletSession {
    /// Create a disconnected session over `provider`
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            state: SessionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected { .. })
    }

    pub fn current_address(&self) -> Option<Address> {
        match &self.state {
            SessionState::Connected { address, .. } => Some(*address),
            SessionState::Disconnected => None,
        }
    }

    /// The bound signer and its address
    pub(crate) fn signer(&self) -> Option<(Address, &Arc<dyn WalletSigner>)> {
        match &self.state {
            SessionState::Connected { address, signer } => Some((*address, signer)),
            SessionState::Disconnected => None,
        }
    }

    /// Request the wallet capability and bind to the account it resolves to
    ///
    /// May be called any number of times; a later call rebinds if the
    /// wallet's active account changed.
    pub async fn connect(&mut self) -> Result<Address> {
        let signer = self.provider.get_signer().await.map_err(unavailable)?;
        let address = signer.get_address().await.map_err(unavailable)?;

        self.bind(address, signer);
        Ok(address)
    }

    /// Bind to the wallet's first active account if one is already exposed
    ///
    /// Account discovery does not prompt. The signer is only requested once an
    /// active account exists, so a wallet that already granted access binds
    /// silently. Returns `false` and keeps the current state when the wallet
    /// exposes no active accounts.
    pub async fn restore(&mut self) -> Result<bool> {
        let accounts = self
            .provider
            .list_active_accounts()
            .await
            .map_err(unavailable)?;

        let Some(&address) = accounts.first() else {
            debug!("Wallet exposes no active accounts");
            return Ok(false);
        };

        let signer = self.provider.get_signer().await.map_err(unavailable)?;
        self.bind(address, signer);
        Ok(true)
    }

    /// Gate used before signing: restore the binding or fail with `NotConnected`
    pub async fn ensure_connected(&mut self) -> Result<Address> {
        match self.restore().await {
            Ok(true) => self.current_address().ok_or(Error::NotConnected),
            Ok(false) => Err(Error::NotConnected),
            Err(e) => {
                warn!(error = %e, "Failed to check if wallet is connected");
                Err(Error::NotConnected)
            }
        }
    }

    fn bind(&mut self, address: Address, signer: Arc<dyn WalletSigner>) {
        match self.current_address() {
            Some(previous) if previous != address => {
                info!(%previous, current = %address, "Active wallet account changed");
            }
            Some(_) => {}
            None => info!(%address, "Wallet connected"),
        }

        self.state = SessionState::Connected { address, signer };
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.current_address())
            .finish_non_exhaustive()
    }
}

fn unavailable(err: Error) -> Error {
    match err {
        Error::WalletUnavailable(_) => err,
        other => Error::WalletUnavailable(other.to_string()),
    }
}
