// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle: Anonymous until register or login succeeds, then
//! Authenticated until logout or an externally observed auth failure.
//!
//! The identity lives in an [`arc_swap::ArcSwapOption`] with exactly one
//! writer (the [`SessionManager`]) and any number of lock-free readers
//! ([`SessionReader`] views handed to the transport). The bearer token exists
//! only in process memory; nothing here touches durable storage.
//!
//! The master secret never passes through this module's state: `register`
//! forwards it inside the one registration request and drops it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use strongroom_core::{Identity, VaultError};
use tracing::{info, warn};

use crate::transport::VaultTransport;

/// Single authoritative writer over the session identity.
///
/// Deliberately not `Clone`: one manager per process keeps the single-writer
/// rule trivially true.
pub struct SessionManager {
    identity: Arc<ArcSwapOption<Identity>>,
}

impl SessionManager {
    /// Creates a manager in the Anonymous state.
    pub fn new() -> Self {
        Self {
            identity: Arc::new(ArcSwapOption::const_empty()),
        }
    }

    /// Returns a read-only view for injection into the transport.
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            identity: Arc::clone(&self.identity),
        }
    }

    /// Registers a new account and establishes the session.
    ///
    /// The master secret participates only in the registration request body;
    /// it is never stored here. On failure the state remains Anonymous.
    pub async fn register(
        &self,
        transport: &VaultTransport,
        username: &str,
        login_secret: &SecretString,
        master_secret: &SecretString,
    ) -> Result<Identity, VaultError> {
        let identity = transport
            .register(username, login_secret, master_secret)
            .await?;
        info!(username = %identity.username, "registered, session established");
        self.identity.store(Some(Arc::new(identity.clone())));
        Ok(identity)
    }

    /// Authenticates with the login secret and establishes the session.
    ///
    /// On failure the state remains Anonymous.
    pub async fn login(
        &self,
        transport: &VaultTransport,
        username: &str,
        login_secret: &SecretString,
    ) -> Result<Identity, VaultError> {
        let identity = transport.login(username, login_secret).await?;
        info!(username = %identity.username, "logged in, session established");
        self.identity.store(Some(Arc::new(identity.clone())));
        Ok(identity)
    }

    /// Unconditionally clears the session. Idempotent.
    pub fn logout(&self) {
        self.identity.store(None);
        info!("session cleared");
    }

    /// Transitions to Anonymous after an externally observed auth failure
    /// (a `SessionExpired` classification from any authenticated call).
    pub fn invalidate(&self) {
        if self.identity.swap(None).is_some() {
            warn!("session invalidated, re-authentication required");
        }
    }

    /// True when a session is established. Never fails.
    pub fn is_authenticated(&self) -> bool {
        self.identity.load().is_some()
    }

    /// The current username, if authenticated. Never fails.
    pub fn current_username(&self) -> Option<String> {
        self.identity.load().as_ref().map(|id| id.username.clone())
    }

    /// The current bearer token, if authenticated. Never fails.
    pub fn current_token(&self) -> Option<SecretString> {
        self.identity.load().as_ref().map(|id| id.token.clone())
    }

    /// Installs an identity directly, bypassing the network. Test-only.
    #[cfg(test)]
    pub(crate) fn install_identity(&self, identity: Identity) {
        self.identity.store(Some(Arc::new(identity)));
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the session identity.
///
/// Cheap to clone; every clone observes the manager's writes.
#[derive(Clone)]
pub struct SessionReader {
    identity: Arc<ArcSwapOption<Identity>>,
}

impl SessionReader {
    /// True when a session is established.
    pub fn is_authenticated(&self) -> bool {
        self.identity.load().is_some()
    }

    /// The current username, if authenticated.
    pub fn current_username(&self) -> Option<String> {
        self.identity.load().as_ref().map(|id| id.username.clone())
    }

    /// The current bearer token, if authenticated.
    pub fn current_token(&self) -> Option<SecretString> {
        self.identity.load().as_ref().map(|id| id.token.clone())
    }
}
