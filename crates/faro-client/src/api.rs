// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP transport for the registry API.
//
// Every response body is an envelope `{ success, message?, data? }`. The
// client attaches the session's bearer token, decodes envelopes, and turns
// failures into `FaroError`:
//   - 401 on an authenticated request  -> session cleared, `Unauthorized`
//   - any other non-2xx                -> `Api { status, message }`
//   - transport / decoding failures    -> `Network`
// Endpoint wrappers live in the sibling modules as further `impl ApiClient`
// blocks.

use std::time::Duration;

use faro_core::AppConfig;
use faro_core::error::{FaroError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::session::Session;

/// Response wrapper used by every endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// The payload of a successful envelope.
    ///
    /// `success: false` becomes an `Api` error carrying the server message;
    /// a successful envelope without `data` is `MissingData`.
    pub fn into_data(self, what: &str) -> Result<T> {
        if !self.success {
            return Err(FaroError::Api {
                status: StatusCode::OK.as_u16(),
                message: self.message,
            });
        }
        self.data
            .ok_or_else(|| FaroError::MissingData(format!("{what}: response has no data")))
    }

    /// Succeed unless the envelope reports `success: false`.
    pub fn ensure_success(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(FaroError::Api {
                status: StatusCode::OK.as_u16(),
                message: self.message,
            })
        }
    }
}

/// Typed client bound to one API base URL and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl ApiClient {
    /// Client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        Self::with_timeout(base_url, session, None)
    }

    /// Client configured from `config`: base URL and request timeout.
    pub fn from_config(config: &AppConfig, session: Session) -> Result<Self> {
        let timeout = Some(config.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self::with_timeout(&config.api_base_url, session, timeout)
    }

    fn with_timeout(base_url: &str, session: Session, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| FaroError::Config(format!("invalid API base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FaroError::Config(format!(
                "API base URL '{base_url}' cannot carry paths"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FaroError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` with `segments` appended, each percent-encoded as one segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // -- request helpers ------------------------------------------------------

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>> {
        let builder = self.http.get(self.endpoint(segments)).query(query);
        let response = self.send(builder).await?;
        decode(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiEnvelope<T>> {
        let builder = self.http.post(self.endpoint(segments)).json(body);
        let response = self.send(builder).await?;
        decode(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: reqwest::multipart::Form,
    ) -> Result<ApiEnvelope<T>> {
        let builder = self.http.post(self.endpoint(segments)).multipart(form);
        let response = self.send(builder).await?;
        decode(response).await
    }

    /// POST a JSON body and return the raw response bytes.
    pub(crate) async fn post_for_bytes<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Vec<u8>> {
        let builder = self.http.post(self.endpoint(segments)).json(body);
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FaroError::Network(format!("failed to read response body: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Attach the bearer token, send, and map error statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let token = self.session.token();
        let builder = match &token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        };

        let request = builder
            .build()
            .map_err(|e| FaroError::Network(format!("failed to build request: {e}")))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, authenticated = token.is_some(), "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FaroError::Network(format!("{method} {}: {e}", url.path())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A 401 only means "your session is gone" when we sent one. Failed
        // logins also answer 401 and are reported like any other API error.
        if status == StatusCode::UNAUTHORIZED && token.is_some() {
            let surface = self.session.expire();
            warn!(%method, path = url.path(), %surface, "token rejected, session cleared");
            return Err(FaroError::Unauthorized { surface });
        }

        let message = error_message(response).await;
        warn!(%method, path = url.path(), status = status.as_u16(), ?message, "API request failed");
        Err(FaroError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<ApiEnvelope<T>> {
    let body = response
        .bytes()
        .await
        .map_err(|e| FaroError::Network(format!("failed to read response body: {e}")))?;
    serde_json::from_slice(&body)
        .map_err(|e| FaroError::Network(format!("unexpected response body: {e}")))
}

/// Server message from an error response body, if it has one.
async fn error_message(response: Response) -> Option<String> {
    let body = response.bytes().await.ok()?;
    let envelope: ApiEnvelope<Value> = serde_json::from_slice(&body).ok()?;
    message_from_envelope(envelope)
}

fn message_from_envelope(envelope: ApiEnvelope<Value>) -> Option<String> {
    // Student login flags accounts that still need a password.
    let password_not_set = envelope
        .data
        .as_ref()
        .and_then(|d| d.get("passwordNotSet"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if password_not_set {
        return Some("Please set your password first".into());
    }
    envelope.message
}
