// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Strongroom workspace.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Identifier of a vault entry, as assigned by the provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An authenticated identity: the logged-in username and the bearer token.
///
/// The token exists only in process memory for the lifetime of the session;
/// it is never written to durable storage. Debug output omits it.
#[derive(Clone)]
pub struct Identity {
    pub username: String,
    pub token: SecretString,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// One vault entry as returned by the listing endpoint.
///
/// `masked_secret` is a display-only redaction; plaintext never appears in
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub id: EntryId,
    pub app_name: String,
    pub app_username: String,
    #[serde(rename = "maskedPassword")]
    pub masked_secret: String,
}
