// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reveal lifecycle: the only path through which an entry's plaintext secret
//! ever becomes visible.
//!
//! The controller walks Idle, PromptingSecret, Decrypting, Revealed and back
//! to Idle. At most one entry is ever in a non-Idle phase. Every transition
//! out of Revealed drops the plaintext immediately; the auto-hide timer
//! ([`REVEAL_TTL`]) guarantees an upper bound on exposure even if the user
//! walks away.
//!
//! Decrypt requests are tagged with a generation so a response that arrives
//! after the user has moved on (closed the prompt, opened another entry) is
//! discarded instead of revealing the wrong secret.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use secrecy::SecretString;
use strongroom_core::{EntryId, VaultError};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::transport::VaultTransport;

/// How long a revealed secret stays visible before it is hidden again.
pub const REVEAL_TTL: Duration = Duration::from_secs(30);

/// Observable phase of the reveal lifecycle. Never carries the plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStatus {
    Idle,
    PromptingSecret(EntryId),
    Decrypting(EntryId),
    Revealed(EntryId),
}

/// Proof that a decrypt was started for a specific entry in a specific
/// lifecycle generation. [`RevealController::complete_submit`] uses it to
/// discard responses the user has since navigated away from.
#[derive(Debug, Clone, Copy)]
pub struct DecryptTicket {
    entry_id: EntryId,
    generation: u64,
}

enum Phase {
    Idle,
    PromptingSecret(EntryId),
    Decrypting(EntryId),
    Revealed(EntryId, SecretString),
}

struct RevealState {
    phase: Phase,
    // Bumped on every open and close; a response or timer from an older
    // generation must not touch the state.
    generation: u64,
    expiry_cancel: Option<CancellationToken>,
}

impl RevealState {
    /// Drops any plaintext and cancels any armed timer, then bumps the
    /// generation. Leaves the state Idle.
    fn reset(&mut self) {
        if let Some(cancel) = self.expiry_cancel.take() {
            cancel.cancel();
        }
        self.phase = Phase::Idle;
        self.generation += 1;
    }
}

/// Controller for the single reveal slot.
pub struct RevealController {
    state: Arc<Mutex<RevealState>>,
}

impl RevealController {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RevealState {
                phase: Phase::Idle,
                generation: 0,
                expiry_cancel: None,
            })),
        }
    }

    /// Current phase, without the plaintext.
    pub fn status(&self) -> RevealStatus {
        let state = self.lock();
        match state.phase {
            Phase::Idle => RevealStatus::Idle,
            Phase::PromptingSecret(id) => RevealStatus::PromptingSecret(id),
            Phase::Decrypting(id) => RevealStatus::Decrypting(id),
            Phase::Revealed(id, _) => RevealStatus::Revealed(id),
        }
    }

    /// The plaintext of the currently revealed entry, if any.
    pub fn revealed_plaintext(&self) -> Option<SecretString> {
        let state = self.lock();
        match &state.phase {
            Phase::Revealed(_, plaintext) => Some(plaintext.clone()),
            _ => None,
        }
    }

    /// Opens the master-secret prompt for `entry_id`.
    ///
    /// Whatever was in flight or revealed before is discarded first, so two
    /// entries can never be exposed at once.
    pub fn open(&self, entry_id: EntryId) {
        let mut state = self.lock();
        state.reset();
        state.phase = Phase::PromptingSecret(entry_id);
        debug!(entry_id = %entry_id, "reveal prompt opened");
    }

    /// Synchronously discards any plaintext, cancels the auto-hide timer,
    /// and returns to Idle. Idempotent.
    pub fn close(&self) {
        let mut state = self.lock();
        let was_revealed = matches!(state.phase, Phase::Revealed(..));
        state.reset();
        if was_revealed {
            debug!("revealed secret hidden");
        }
    }

    /// Reveals the secret for the entry currently being prompted.
    ///
    /// Any failure closes the prompt and returns to Idle; a wrong master
    /// secret is never retried automatically and never lingers in the modal.
    /// If the user navigated away while the request was in flight, the
    /// response is discarded and `Ok(false)` is returned.
    pub async fn submit(
        &self,
        transport: &VaultTransport,
        master_secret_attempt: &SecretString,
    ) -> Result<bool, VaultError> {
        let ticket = self.begin_submit()?;
        let outcome = transport
            .reveal_entry(ticket.entry_id, master_secret_attempt)
            .await;
        self.complete_submit(ticket, outcome)
    }

    /// Marks the prompted entry as Decrypting and hands back the ticket the
    /// eventual response must present.
    ///
    /// Rejects a second submit while one is already in flight.
    pub fn begin_submit(&self) -> Result<DecryptTicket, VaultError> {
        let mut state = self.lock();
        match state.phase {
            Phase::PromptingSecret(entry_id) => {
                state.phase = Phase::Decrypting(entry_id);
                Ok(DecryptTicket {
                    entry_id,
                    generation: state.generation,
                })
            }
            Phase::Decrypting(_) => Err(VaultError::Internal(
                "a decrypt attempt is already in flight".to_string(),
            )),
            _ => Err(VaultError::Internal(
                "no entry is being prompted for its master secret".to_string(),
            )),
        }
    }

    /// Applies a decrypt outcome to the lifecycle.
    ///
    /// Returns `Ok(true)` when the secret is now revealed, `Ok(false)` when
    /// the response was stale and discarded.
    pub fn complete_submit(
        &self,
        ticket: DecryptTicket,
        outcome: Result<SecretString, VaultError>,
    ) -> Result<bool, VaultError> {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            debug!(entry_id = %ticket.entry_id, "stale decrypt response discarded");
            return Ok(false);
        }
        match outcome {
            Ok(plaintext) => {
                state.phase = Phase::Revealed(ticket.entry_id, plaintext);
                self.arm_expiry(&mut state);
                info!(entry_id = %ticket.entry_id, "secret revealed");
                Ok(true)
            }
            Err(err) => {
                // Failure closes the modal; no stale attempt is retained.
                state.reset();
                Err(err)
            }
        }
    }

    /// Spawns the auto-hide task for the current generation.
    ///
    /// The timer holds no plaintext; it only knows which generation it may
    /// clear. `close` and `open` cancel it through the token.
    fn arm_expiry(&self, state: &mut RevealState) {
        let cancel = CancellationToken::new();
        state.expiry_cancel = Some(cancel.clone());
        let armed_generation = state.generation;
        let shared = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(REVEAL_TTL) => {
                    let mut state = shared
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    if state.generation == armed_generation {
                        state.reset();
                        info!("revealed secret auto-hidden");
                    }
                }
            }
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RevealState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        let mut state = self.lock();
        state.reset();
    }
}
