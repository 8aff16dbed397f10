use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "chainproof";

/// Identity key storage in the OS keychain, one entry per network.
pub struct CredentialStore {
    account: String,
}

impl CredentialStore {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.account).context("Failed to create keyring entry")
    }

    /// Store the identity PEM in the OS keychain
    pub fn store_pem(&self, pem: &str) -> Result<()> {
        self.entry()?
            .set_password(pem)
            .context("Failed to store identity in keychain")?;
        Ok(())
    }

    pub fn get_pem(&self) -> Result<String> {
        self.entry()?
            .get_password()
            .context("Failed to retrieve identity from keychain")
    }

    pub fn delete(&self) -> Result<()> {
        self.entry()?
            .delete_credential()
            .context("Failed to delete identity from keychain")?;
        Ok(())
    }

    pub fn has_identity(&self) -> bool {
        self.entry().map(|e| e.get_password().is_ok()).unwrap_or(false)
    }
}
