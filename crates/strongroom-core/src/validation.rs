// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure validation of usernames, login secrets, master secrets, and PINs.
//!
//! Every check here mirrors the provider's acceptance rule bit-for-bit so
//! client and server never disagree about acceptability. All functions are
//! deterministic, side-effect free, and cheap enough to run on every
//! keystroke.

use thiserror::Error;

/// Minimum accepted username length, in characters.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// Maximum accepted username length, in characters.
pub const USERNAME_MAX_LENGTH: usize = 50;
/// Minimum accepted secret length, in characters.
pub const SECRET_MIN_LENGTH: usize = 8;

/// The fixed set of special characters the strength rule accepts.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Per-criterion strength flags for a candidate secret.
///
/// Each flag is computed independently; a candidate is "strong" iff all five
/// are true. Appending a character can only flip a flag from false to true,
/// never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecretStrength {
    pub min_length: bool,
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_number: bool,
    pub has_special_char: bool,
}

impl SecretStrength {
    /// True when every criterion is satisfied.
    pub fn is_strong(self) -> bool {
        self.min_length
            && self.has_upper_case
            && self.has_lower_case
            && self.has_number
            && self.has_special_char
    }
}

/// Validation failures surfaced before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must be 3 to 50 characters, got {0}")]
    UsernameLength(usize),

    #[error("login secret does not meet the strength policy")]
    WeakLoginSecret(SecretStrength),

    #[error("master secret does not meet the strength policy")]
    WeakMasterSecret(SecretStrength),

    #[error("master secret must be exactly 4 digits")]
    InvalidPin,

    #[error("master secret confirmation does not match")]
    ConfirmationMismatch,
}

/// Computes the five independent strength flags for a candidate secret.
pub fn secret_strength(candidate: &str) -> SecretStrength {
    SecretStrength {
        min_length: candidate.chars().count() >= SECRET_MIN_LENGTH,
        has_upper_case: candidate.chars().any(|c| c.is_ascii_uppercase()),
        has_lower_case: candidate.chars().any(|c| c.is_ascii_lowercase()),
        has_number: candidate.chars().any(|c| c.is_ascii_digit()),
        has_special_char: candidate.chars().any(|c| SPECIAL_CHARS.contains(c)),
    }
}

/// True iff the candidate is exactly 4 decimal digits, nothing else.
pub fn validate_pin(candidate: &str) -> bool {
    candidate.len() == 4 && candidate.chars().all(|c| c.is_ascii_digit())
}

/// Validates all registration inputs, failing fast before submission.
///
/// The login secret and master secret are checked against the same strength
/// policy but are never compared to each other; only the master secret and
/// its confirmation are required to match, by exact equality.
pub fn validate_registration(
    username: &str,
    login_secret: &str,
    master_secret: &str,
    master_confirmation: &str,
) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
        return Err(ValidationError::UsernameLength(len));
    }
    let login = secret_strength(login_secret);
    if !login.is_strong() {
        return Err(ValidationError::WeakLoginSecret(login));
    }
    let master = secret_strength(master_secret);
    if !master.is_strong() {
        return Err(ValidationError::WeakMasterSecret(master));
    }
    if master_secret != master_confirmation {
        return Err(ValidationError::ConfirmationMismatch);
    }
    Ok(())
}
