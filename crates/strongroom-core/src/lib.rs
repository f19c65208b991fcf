// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongroom vault client.
//!
//! This crate provides the error taxonomy, the shared data model, and the
//! pure validation engine used throughout the Strongroom workspace. It has no
//! I/O of its own; the transport and state machines live in
//! `strongroom-client`.

pub mod error;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use types::{EntryId, Identity, VaultEntry};
pub use validation::{secret_strength, validate_pin, SecretStrength, ValidationError};
