// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-format request and response bodies for the vault provider API.
//!
//! Request bodies borrow their secret fields so nothing outlives the call
//! that serializes them. None of these types derive `Debug`; secrets must
//! not be printable by accident.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub login_password: &'a str,
    pub master_password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub login_password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub username: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddEntryRequest<'a> {
    pub app_name: &'a str,
    pub app_username: &'a str,
    pub password: &'a str,
    pub master_password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RevealRequest<'a> {
    pub master_password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct RevealResponse {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_uses_camel_case_wire_names() {
        let body = RegisterRequest {
            username: "alice",
            login_password: "Secret1!",
            master_password: "Master1!",
        };
        let json = serde_json::to_value(&body).expect("should serialize");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["loginPassword"], "Secret1!");
        assert_eq!(json["masterPassword"], "Master1!");
    }

    #[test]
    fn reveal_request_carries_only_the_master_secret() {
        let body = RevealRequest {
            master_password: "Master1!",
        };
        let json = serde_json::to_value(&body).expect("should serialize");
        assert_eq!(
            json.as_object().map(|o| o.len()),
            Some(1),
            "reveal body must contain nothing but the master secret"
        );
        assert_eq!(json["masterPassword"], "Master1!");
    }
}
