//! The connected wallet, as seen by the workflows.

use std::sync::RwLock;

/// Source of the viewer's address. Queried at each step, since the wallet
/// can disconnect while a workflow is suspended.
pub trait WalletIdentity: Send + Sync {
    fn address(&self) -> Option<String>;
}

/// A wallet connection that can be switched or dropped at any time.
#[derive(Debug, Default)]
pub struct WalletSession {
    address: RwLock<Option<String>>,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: impl Into<String>) -> Self {
        let session = Self::default();
        session.connect(address);
        session
    }

    /// Blank addresses count as a disconnect.
    pub fn connect(&self, address: impl Into<String>) {
        let address = address.into();
        let value = (!address.trim().is_empty()).then(|| address.trim().to_string());
        if let Ok(mut guard) = self.address.write() {
            *guard = value;
        }
    }

    pub fn disconnect(&self) {
        if let Ok(mut guard) = self.address.write() {
            *guard = None;
        }
    }
}

impl WalletIdentity for WalletSession {
    fn address(&self) -> Option<String> {
        self.address.read().ok().and_then(|g| g.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_and_disconnect() {
        let wallet = WalletSession::connected(" 0xabc ");
        assert_eq!(wallet.address().as_deref(), Some("0xabc"));
        wallet.disconnect();
        assert_eq!(wallet.address(), None);
        wallet.connect("   ");
        assert_eq!(wallet.address(), None);
    }
}
