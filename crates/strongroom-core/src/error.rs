// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongroom vault client.

use thiserror::Error;

use crate::validation::ValidationError;

/// The primary error type used across all Strongroom components.
///
/// Remote-call failures are classified into exactly one of these kinds at the
/// transport call site; callers dispatch on the variant, never on message
/// contents. `SessionExpired` always forces re-authentication, while
/// `Decryption` does not end the session.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Client-side input validation failed; no network call was made.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The login credentials were rejected by the identity provider.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Registration was rejected (duplicate username, server-side policy).
    #[error("registration failed: {0}")]
    Registration(String),

    /// A 401 response on an authenticated call; the session must be
    /// re-established before retrying.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// The master secret attempt did not decrypt the entry.
    #[error("decryption refused: wrong master secret")]
    Decryption,

    /// The requested vault entry does not exist (e.g. already deleted).
    #[error("vault entry not found")]
    NotFound,

    /// Network failure or an unclassified provider response.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A client-side contract violation (e.g. a duplicate in-flight decrypt).
    #[error("internal error: {0}")]
    Internal(String),
}
