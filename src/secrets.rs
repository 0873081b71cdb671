use keyring::{Entry, Error as KeyringError};
use std::sync::Arc;
use tauri::AppHandle;
use thiserror::Error;
use tokio::task;

/// Keyring account holding the personal access token.
pub const TOKEN_KEY: &str = "wrike.pat";
const KEYRING_FALLBACK_SERVICE: &str = "com.wrikeboard.desktop";

/// The host secret store could not be reached or refused the operation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageFailure(String);

/// Single-token credential store backed by the OS keyring.
#[derive(Clone)]
pub struct TokenStore {
    entry: Arc<Entry>,
}

impl TokenStore {
    pub fn initialize(app_handle: &AppHandle) -> Result<Self, StorageFailure> {
        let identifier = app_handle.config().identifier.clone();
        let service = if identifier.trim().is_empty() {
            KEYRING_FALLBACK_SERVICE.to_string()
        } else {
            identifier
        };
        Self::for_service(&service)
    }

    pub fn for_service(service: &str) -> Result<Self, StorageFailure> {
        let entry = Entry::new(service, TOKEN_KEY)
            .map_err(|err| StorageFailure(format!("Failed to open keyring entry: {err}")))?;
        Ok(Self {
            entry: Arc::new(entry),
        })
    }

    pub async fn get(&self) -> Result<Option<String>, StorageFailure> {
        let store = self.clone();
        run_blocking(move || store.read()).await
    }

    pub async fn set(&self, token: &str) -> Result<(), StorageFailure> {
        let trimmed = token.trim().to_string();
        if trimmed.is_empty() {
            return Err(StorageFailure("Access token must not be empty".into()));
        }
        let store = self.clone();
        run_blocking(move || store.write(&trimmed)).await
    }

    /// Removes the stored token; succeeds when nothing is stored.
    pub async fn delete(&self) -> Result<(), StorageFailure> {
        let store = self.clone();
        run_blocking(move || store.remove()).await
    }

    fn read(&self) -> Result<Option<String>, StorageFailure> {
        match self.entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(err) => Err(StorageFailure(format!(
                "Failed to read token from keyring: {err}"
            ))),
        }
    }

    fn write(&self, token: &str) -> Result<(), StorageFailure> {
        self.entry
            .set_password(token)
            .map_err(|err| StorageFailure(format!("Failed to store token in keyring: {err}")))
    }

    fn remove(&self) -> Result<(), StorageFailure> {
        match self.entry.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(err) => Err(StorageFailure(format!(
                "Failed to delete token from keyring: {err}"
            ))),
        }
    }
}

async fn run_blocking<T, F>(operation: F) -> Result<T, StorageFailure>
where
    F: FnOnce() -> Result<T, StorageFailure> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(operation)
        .await
        .map_err(|err| StorageFailure(format!("Keyring task failed: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::TokenStore;

    fn mock_store() -> TokenStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        TokenStore::for_service("wrike-board-tests").expect("mock entry")
    }

    #[tokio::test]
    async fn set_then_get_returns_token() {
        let store = mock_store();
        store.set("abc").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn delete_then_get_returns_none() {
        let store = mock_store();
        store.set("abc").await.unwrap();
        store.delete().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_without_token_is_idempotent() {
        let store = mock_store();
        store.delete().await.unwrap();
        store.delete().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_trims_and_rejects_blank_tokens() {
        let store = mock_store();
        assert!(store.set("   ").await.is_err());
        store.set("  padded  ").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("padded"));
    }
}
