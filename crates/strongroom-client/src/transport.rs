// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote vault provider API.
//!
//! Provides [`VaultTransport`], which handles request construction, bearer
//! token attachment, and classification of provider responses into the
//! closed [`VaultError`] taxonomy. The transport classifies only; it never
//! mutates the session and never decides navigation.
//!
//! There is no retry anywhere in this module: a failed decrypt or login must
//! only be resubmitted by an explicit user action.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use strongroom_core::{EntryId, Identity, VaultEntry, VaultError};
use strongroom_config::ApiConfig;
use tracing::debug;

use crate::session::SessionReader;
use crate::wire::{
    AddEntryRequest, AuthResponse, LoginRequest, RegisterRequest, RevealRequest, RevealResponse,
};

/// Authenticated request layer over the remote vault API.
///
/// Cheap to clone; clones share the connection pool and the session view.
#[derive(Clone)]
pub struct VaultTransport {
    http: reqwest::Client,
    base_url: String,
    session: SessionReader,
}

impl VaultTransport {
    /// Creates a transport for the configured API origin.
    ///
    /// The session view is read-only here: the transport attaches the current
    /// bearer token but only the session manager ever changes it.
    pub fn new(config: &ApiConfig, session: SessionReader) -> Result<Self, VaultError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VaultError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Registers a new account. Unauthenticated endpoint.
    ///
    /// The master secret rides along in this one request so the provider can
    /// set up encryption; neither secret is retained after the call returns.
    pub async fn register(
        &self,
        username: &str,
        login_secret: &SecretString,
        master_secret: &SecretString,
    ) -> Result<Identity, VaultError> {
        let body = RegisterRequest {
            username,
            login_password: login_secret.expose_secret(),
            master_password: master_secret.expose_secret(),
        };
        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, "register response received");
        if status.is_success() {
            let auth: AuthResponse = response.json().await.map_err(bad_response_body)?;
            Ok(Identity {
                username: auth.username,
                token: SecretString::from(auth.token),
            })
        } else {
            Err(VaultError::Registration(error_body(response).await))
        }
    }

    /// Authenticates with the login secret. Unauthenticated endpoint.
    pub async fn login(
        &self,
        username: &str,
        login_secret: &SecretString,
    ) -> Result<Identity, VaultError> {
        let body = LoginRequest {
            username,
            login_password: login_secret.expose_secret(),
        };
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, "login response received");
        if status.is_success() {
            let auth: AuthResponse = response.json().await.map_err(bad_response_body)?;
            Ok(Identity {
                username: auth.username,
                token: SecretString::from(auth.token),
            })
        } else {
            Err(VaultError::Authentication(error_body(response).await))
        }
    }

    /// Fetches all entries for the authenticated user: metadata plus masked
    /// secrets, never plaintext.
    pub async fn list_entries(&self) -> Result<Vec<VaultEntry>, VaultError> {
        let token = self.bearer_token()?;
        let response = self
            .http
            .get(format!("{}/vault/passwords", self.base_url))
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, "list response received");
        if status == StatusCode::UNAUTHORIZED {
            return Err(VaultError::SessionExpired);
        }
        if status.is_success() {
            response.json().await.map_err(bad_response_body)
        } else {
            Err(VaultError::Transport {
                message: format!(
                    "listing entries failed with {status}: {}",
                    error_body(response).await
                ),
                source: None,
            })
        }
    }

    /// Stores a new entry. The plaintext secret and the master secret travel
    /// together in this one request so encryption happens provider-side with
    /// a master-secret-derived key; neither is retained client-side after the
    /// call returns, success or failure.
    pub async fn add_entry(
        &self,
        app_name: &str,
        app_username: &str,
        plaintext_secret: &SecretString,
        master_secret: &SecretString,
    ) -> Result<(), VaultError> {
        let token = self.bearer_token()?;
        let body = AddEntryRequest {
            app_name,
            app_username,
            password: plaintext_secret.expose_secret(),
            master_password: master_secret.expose_secret(),
        };
        let response = self
            .http
            .post(format!("{}/vault/add", self.base_url))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, "add response received");
        if status == StatusCode::UNAUTHORIZED {
            return Err(VaultError::SessionExpired);
        }
        if status.is_success() {
            Ok(())
        } else {
            Err(VaultError::Transport {
                message: format!(
                    "adding entry failed with {status}: {}",
                    error_body(response).await
                ),
                source: None,
            })
        }
    }

    /// One-shot decryption of a single entry's secret.
    ///
    /// Only the master secret attempt for this one id is submitted. The
    /// plaintext is returned exactly once; the caller owns its lifetime from
    /// here. A wrong attempt is a [`VaultError::Decryption`], which must
    /// never be confused with session expiry.
    pub async fn reveal_entry(
        &self,
        id: EntryId,
        master_secret_attempt: &SecretString,
    ) -> Result<SecretString, VaultError> {
        let token = self.bearer_token()?;
        let body = RevealRequest {
            master_password: master_secret_attempt.expose_secret(),
        };
        let response = self
            .http
            .post(format!("{}/vault/show/{id}", self.base_url))
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, entry_id = %id, "reveal response received");
        if status == StatusCode::UNAUTHORIZED {
            return Err(VaultError::SessionExpired);
        }
        if status.is_success() {
            let reveal: RevealResponse = response.json().await.map_err(bad_response_body)?;
            return Ok(SecretString::from(reveal.password));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound);
        }
        // The provider answers both failure modes with a 400 and a message
        // body; a missing entry names itself, everything else is a rejected
        // master secret.
        let body = error_body(response).await;
        if body.to_ascii_lowercase().contains("not found") {
            Err(VaultError::NotFound)
        } else {
            Err(VaultError::Decryption)
        }
    }

    /// Irreversibly deletes an entry.
    pub async fn delete_entry(&self, id: EntryId) -> Result<(), VaultError> {
        let token = self.bearer_token()?;
        let response = self
            .http
            .delete(format!("{}/vault/delete/{id}", self.base_url))
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, entry_id = %id, "delete response received");
        if status == StatusCode::UNAUTHORIZED {
            return Err(VaultError::SessionExpired);
        }
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound);
        }
        let body = error_body(response).await;
        if body.to_ascii_lowercase().contains("not found") {
            Err(VaultError::NotFound)
        } else {
            Err(VaultError::Transport {
                message: format!("deleting entry failed with {status}: {body}"),
                source: None,
            })
        }
    }

    /// Current bearer token, or `SessionExpired` without a network call when
    /// the session is Anonymous.
    fn bearer_token(&self) -> Result<SecretString, VaultError> {
        self.session.current_token().ok_or(VaultError::SessionExpired)
    }
}

fn request_failed(e: reqwest::Error) -> VaultError {
    VaultError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn bad_response_body(e: reqwest::Error) -> VaultError {
    VaultError::Transport {
        message: format!("failed to decode provider response: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Reads the provider's error message body, with a fallback for empty bodies.
async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "provider rejected the request".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionManager;
    use strongroom_core::Identity;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn authenticated_fixture(base_url: &str) -> (SessionManager, VaultTransport) {
        let session = SessionManager::new();
        session.install_identity(Identity {
            username: "alice".into(),
            token: SecretString::from("tok-123".to_string()),
        });
        let config = ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
        };
        let transport = VaultTransport::new(&config, session.reader()).expect("client builds");
        (session, transport)
    }

    #[tokio::test]
    async fn list_attaches_the_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .and(header("Authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "appName": "github", "appUsername": "alice", "maskedPassword": "********"}
            ])))
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let entries = transport.list_entries().await.expect("list should succeed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, EntryId(1));
        assert_eq!(entries[0].masked_secret, "********");
    }

    #[tokio::test]
    async fn list_with_anonymous_session_short_circuits() {
        let server = MockServer::start().await;
        let session = SessionManager::new();
        let config = ApiConfig {
            base_url: server.uri(),
            request_timeout_secs: 5,
        };
        let transport = VaultTransport::new(&config, session.reader()).expect("client builds");

        // No mock mounted: an Anonymous session must not reach the network.
        let err = transport.list_entries().await.expect_err("must fail");
        assert!(matches!(err, VaultError::SessionExpired));
    }

    #[tokio::test]
    async fn unauthorized_list_is_classified_as_session_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vault/passwords"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let err = transport.list_entries().await.expect_err("must fail");
        assert!(matches!(err, VaultError::SessionExpired));
    }

    #[tokio::test]
    async fn wrong_master_secret_is_a_decryption_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vault/show/7"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string("Failed to decrypt password: Invalid master password"),
            )
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let err = transport
            .reveal_entry(EntryId(7), &SecretString::from("0000".to_string()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, VaultError::Decryption), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_entry_on_reveal_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vault/show/99"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("Password entry not found"),
            )
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let err = transport
            .reveal_entry(EntryId(99), &SecretString::from("1234".to_string()))
            .await
            .expect_err("must fail");
        assert!(matches!(err, VaultError::NotFound), "got {err:?}");
    }

    #[tokio::test]
    async fn reveal_returns_the_plaintext_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vault/show/7"))
            .and(header("Authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "password": "hunter2"
            })))
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let plaintext = transport
            .reveal_entry(EntryId(7), &SecretString::from("1234".to_string()))
            .await
            .expect("reveal should succeed");
        assert_eq!(plaintext.expose_secret(), "hunter2");
    }

    #[tokio::test]
    async fn delete_of_absent_entry_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/vault/delete/3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (_session, transport) = authenticated_fixture(&server.uri());
        let err = transport.delete_entry(EntryId(3)).await.expect_err("must fail");
        assert!(matches!(err, VaultError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_the_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Username already exists"))
            .mount(&server)
            .await;

        let session = SessionManager::new();
        let config = ApiConfig {
            base_url: server.uri(),
            request_timeout_secs: 5,
        };
        let transport = VaultTransport::new(&config, session.reader()).expect("client builds");
        let err = transport
            .register(
                "alice",
                &SecretString::from("Secret1!".to_string()),
                &SecretString::from("Master1!".to_string()),
            )
            .await
            .expect_err("must fail");
        match err {
            VaultError::Registration(msg) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected Registration, got {other:?}"),
        }
    }
}
