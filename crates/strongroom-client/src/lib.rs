// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side protocol core for the Strongroom vault.
//!
//! Four cooperating pieces:
//!
//! - [`session::SessionManager`]: the in-memory bearer token and the
//!   Anonymous/Authenticated state, with lock-free [`session::SessionReader`]
//!   views for everyone else.
//! - [`transport::VaultTransport`]: the HTTP layer that talks to the remote
//!   vault provider and classifies failures into the [`VaultError`] taxonomy.
//! - [`reveal::RevealController`]: the one gate through which plaintext
//!   secrets pass, with generation tagging and a 30 second auto-hide.
//! - [`registry::EntryRegistry`]: the wholesale-refreshed cache of entry
//!   metadata and masked secrets.
//!
//! [`VaultError`]: strongroom_core::VaultError

pub mod registry;
pub mod reveal;
pub mod session;
pub mod transport;

mod wire;

pub use registry::EntryRegistry;
pub use reveal::{DecryptTicket, RevealController, RevealStatus, REVEAL_TTL};
pub use session::{SessionManager, SessionReader};
pub use transport::VaultTransport;
