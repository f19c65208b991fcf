// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side cache of the user's vault entries.
//!
//! Holds metadata and masked secrets only; plaintext never enters the
//! registry. The cache is refreshed wholesale from the provider after every
//! mutation, so it never drifts from the server by incremental patching. A
//! session expiry observed during any operation empties the cache, since a
//! logged-out client must show nothing.

use std::sync::{Mutex, PoisonError};

use secrecy::SecretString;
use strongroom_core::{EntryId, VaultEntry, VaultError};
use tracing::{debug, info};

use crate::transport::VaultTransport;

#[derive(Default)]
pub struct EntryRegistry {
    entries: Mutex<Vec<VaultEntry>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cached entries, in provider order.
    pub fn entries(&self) -> Vec<VaultEntry> {
        self.lock().clone()
    }

    /// Looks up a cached entry by id.
    pub fn find(&self, id: EntryId) -> Option<VaultEntry> {
        self.lock().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Empties the cache. Called on logout and after session expiry.
    pub fn clear(&self) {
        self.lock().clear();
        debug!("entry cache cleared");
    }

    /// Replaces the whole cache with the provider's current listing.
    ///
    /// On session expiry the cache is emptied before the error propagates:
    /// stale entries must not outlive the session they belong to.
    pub async fn refresh(&self, transport: &VaultTransport) -> Result<usize, VaultError> {
        match transport.list_entries().await {
            Ok(entries) => {
                let count = entries.len();
                *self.lock() = entries;
                debug!(count, "entry cache refreshed");
                Ok(count)
            }
            Err(err) => {
                if matches!(err, VaultError::SessionExpired) {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    /// Stores a new entry, then refreshes so the cache reflects the
    /// provider's view (including the server-assigned id and masking).
    pub async fn add(
        &self,
        transport: &VaultTransport,
        app_name: &str,
        app_username: &str,
        plaintext_secret: &SecretString,
        master_secret: &SecretString,
    ) -> Result<(), VaultError> {
        match transport
            .add_entry(app_name, app_username, plaintext_secret, master_secret)
            .await
        {
            Ok(()) => {
                info!(app_name, "entry stored");
                self.refresh(transport).await?;
                Ok(())
            }
            Err(err) => {
                if matches!(err, VaultError::SessionExpired) {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    /// Irreversibly deletes an entry, then refreshes the cache.
    pub async fn delete(
        &self,
        transport: &VaultTransport,
        id: EntryId,
    ) -> Result<(), VaultError> {
        match transport.delete_entry(id).await {
            Ok(()) => {
                info!(entry_id = %id, "entry deleted");
                self.refresh(transport).await?;
                Ok(())
            }
            Err(err) => {
                if matches!(err, VaultError::SessionExpired) {
                    self.clear();
                }
                Err(err)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<VaultEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use strongroom_config::ApiConfig;
    use strongroom_core::Identity;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn authenticated_transport(base_url: &str) -> VaultTransport {
        let session = SessionManager::new();
        session.install_identity(Identity {
            username: "alice".into(),
            token: SecretString::from("tok".to_string()),
        });
        let config = ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
        };
        VaultTransport::new(&config, session.reader()).expect("client builds")
    }

    fn listing_body(count: usize) -> serde_json::Value {
        let entries: Vec<_> = (1..=count)
            .map(|i| {
                serde_json::json!({
                    "id": i,
                    "appName": format!("app-{i}"),
                    "appUsername": "alice",
                    "maskedPassword": "********",
                })
            })
            .collect();
        serde_json::Value::Array(entries)
    }

    #[tokio::test]
    async fn refresh_replaces_the_cache_wholesale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(3)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(1)))
            .mount(&server)
            .await;

        let transport = authenticated_transport(&server.uri());
        let registry = EntryRegistry::new();

        assert_eq!(registry.refresh(&transport).await.expect("first"), 3);
        assert_eq!(registry.len(), 3);
        assert!(registry.find(EntryId(2)).is_some());

        // A shrunken server listing fully replaces the old cache.
        assert_eq!(registry.refresh(&transport).await.expect("second"), 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.find(EntryId(2)).is_none());
    }

    #[tokio::test]
    async fn session_expiry_during_refresh_empties_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(2)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let transport = authenticated_transport(&server.uri());
        let registry = EntryRegistry::new();

        registry.refresh(&transport).await.expect("initial load");
        assert_eq!(registry.len(), 2);

        let err = registry.refresh(&transport).await.expect_err("expired");
        assert!(matches!(err, VaultError::SessionExpired));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn add_refreshes_with_the_server_assigned_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vault/add"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(1)))
            .mount(&server)
            .await;

        let transport = authenticated_transport(&server.uri());
        let registry = EntryRegistry::new();
        registry
            .add(
                &transport,
                "github",
                "alice",
                &SecretString::from("hunter2".to_string()),
                &SecretString::from("Master1!".to_string()),
            )
            .await
            .expect("add should succeed");

        assert_eq!(registry.len(), 1);
        let entry = registry.find(EntryId(1)).expect("cached after refresh");
        assert_eq!(entry.masked_secret, "********");
    }

    #[tokio::test]
    async fn delete_refreshes_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/vault/delete/2"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(1)))
            .mount(&server)
            .await;

        let transport = authenticated_transport(&server.uri());
        let registry = EntryRegistry::new();
        registry
            .delete(&transport, EntryId(2))
            .await
            .expect("delete should succeed");
        assert_eq!(registry.len(), 1);
    }
}
