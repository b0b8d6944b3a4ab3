//! FCM HTTP v1 implementation of the transport seam.
//!
//! The v1 API has no batch endpoint, so one `send_multicast` invocation
//! issues the per-destination `messages:send` requests concurrently and
//! collects their results in submission order. Callers still observe exactly
//! one transport invocation per dispatch.

use crate::error::{PushError, PushErrorExt};
use crate::message::{MulticastMessage, MulticastReceipt, SendFailure, SendOutcome};
use crate::transport::PushTransport;
use async_trait::async_trait;
use futures_util::future::join_all;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

const MESSAGING_SCOPES: &[&str] = &["https://www.googleapis.com/auth/firebase.messaging"];
const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

struct FcmInner {
    client: Client,
    auth: Arc<dyn TokenProvider>,
    send_url: Url,
}

/// FCM client handle; cheap to clone, safe to share.
#[derive(Clone)]
pub struct FcmTransport {
    inner: Arc<FcmInner>,
}

impl std::fmt::Debug for FcmTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FcmTransport")
            .field("send_url", &self.inner.send_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FcmTransport {
    /// Creates a new [`FcmBuilder`].
    pub fn builder() -> FcmBuilder {
        FcmBuilder::new()
    }

    async fn bearer(&self) -> Result<Arc<gcp_auth::Token>, PushError> {
        self.inner.auth.token(MESSAGING_SCOPES).await.context("Obtaining FCM access token")
    }

    async fn send_one(&self, bearer: &str, message: &MulticastMessage, token: &str) -> SendOutcome {
        let response = self
            .inner
            .client
            .post(self.inner.send_url.clone())
            .bearer_auth(bearer)
            .json(&message.body_for(token))
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => {
                trace!(token = %token_suffix(token), "Destination accepted");
                SendOutcome::DELIVERED
            },
            Ok(r) => {
                let status = r.status();
                let body = r.bytes().await.unwrap_or_default();
                let failure = classify_rejection(status, body.as_ref());
                warn!(
                    %status,
                    ?failure,
                    token = %token_suffix(token),
                    "FCM rejected a destination"
                );
                SendOutcome::failed(failure)
            },
            Err(e) => {
                warn!(error = %e, token = %token_suffix(token), "FCM request failed");
                SendOutcome::failed(SendFailure::Transient)
            },
        }
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send_multicast(&self, message: &MulticastMessage) -> Result<MulticastReceipt, PushError> {
        if message.tokens().is_empty() {
            return Ok(MulticastReceipt::default());
        }

        let bearer = self.bearer().await?;

        let sends =
            message.tokens().iter().map(|token| self.send_one(bearer.as_str(), message, token));
        let outcomes = join_all(sends).await;

        let receipt = MulticastReceipt::from_outcomes(outcomes);
        debug!(
            submitted = message.tokens().len(),
            delivered = receipt.success_count,
            failed = receipt.failure_count,
            "Multicast batch completed"
        );

        Ok(receipt)
    }
}

/// Maps one FCM rejection onto the per-destination failure taxonomy.
///
/// `UNREGISTERED` and `INVALID_ARGUMENT` mark the registration as
/// permanently dead; everything else (quota, auth hiccups, 5xx) is
/// transient and simply reported.
fn classify_rejection(status: StatusCode, body: &[u8]) -> SendFailure {
    match error_code(body).as_deref() {
        Some("UNREGISTERED" | "INVALID_ARGUMENT" | "NOT_FOUND") => SendFailure::TokenInvalid,
        Some(_) => SendFailure::Transient,
        None if status == StatusCode::NOT_FOUND => SendFailure::TokenInvalid,
        None => SendFailure::Transient,
    }
}

/// Extracts the most specific error code from an FCM error document:
/// the `errorCode` detail when present, the coarse `error.status` otherwise.
fn error_code(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let error = value.get("error")?;

    if let Some(details) = error.get("details").and_then(Value::as_array) {
        for detail in details {
            if let Some(code) = detail.get("errorCode").and_then(Value::as_str) {
                return Some(code.to_owned());
            }
        }
    }

    error.get("status").and_then(Value::as_str).map(str::to_owned)
}

fn token_suffix(token: &str) -> &str {
    token.get(token.len().saturating_sub(8)..).unwrap_or("…")
}

/// A fluent builder for configuring and establishing the FCM client.
///
/// Credentials are loaded once here and injected into the handle; nothing
/// reads them from ambient process state afterwards.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct FcmBuilder {
    project_id: Option<String>,
    credentials_file: Option<PathBuf>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl FcmBuilder {
    /// Creates a new [`FcmBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Firebase project id.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the path to the service-account JSON file.
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Overrides the API endpoint (e.g. for a local proxy).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Bounds every send request; defaults to 10 seconds.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Consumes the builder and constructs the transport handle.
    ///
    /// # Errors
    /// Returns [`PushError::Validation`] for a missing project id or an
    /// unparsable endpoint, [`PushError::Credentials`] when the
    /// service-account file cannot be loaded, and [`PushError::Unavailable`]
    /// when the HTTP client cannot be constructed.
    pub fn init(self) -> Result<FcmTransport, PushError> {
        let project_id = self
            .project_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PushError::Validation {
                message: "FCM project id is required".into(),
                context: None,
            })?;

        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let raw_url =
            format!("{}/v1/projects/{project_id}/messages:send", endpoint.trim_end_matches('/'));
        let send_url = Url::parse(&raw_url).map_err(|e| PushError::Validation {
            message: format!("Invalid FCM endpoint '{endpoint}': {e}").into(),
            context: None,
        })?;

        let credentials_file = self.credentials_file.ok_or_else(|| PushError::Validation {
            message: "Service-account credentials file is required".into(),
            context: None,
        })?;
        let account = CustomServiceAccount::from_file(&credentials_file)
            .context("Loading service-account credentials")?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| PushError::Unavailable {
                message: format!("Failed to build FCM HTTP client: {e}").into(),
                context: None,
            })?;

        Ok(FcmTransport {
            inner: Arc::new(FcmInner { client, auth: Arc::new(account), send_url }),
        })
    }
}
