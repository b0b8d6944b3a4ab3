//! # Device Directory Infrastructure
//!
//! This crate provides a read-only HTTP client for the external device
//! directory: the key-value store mapping `user -> device -> push token`
//! that every fan-out dispatch starts from.
//!
//! ## Key Features
//! - **Single fetch**: one `GET` per resolve reads the whole per-user sub-tree.
//! - **Typed boundary**: the loosely-typed wire records are decoded into
//!   [`DeviceRegistration`] values at this boundary; nothing untyped leaks out.
//! - **Seam for doubles**: the [`DeviceDirectory`] trait lets callers swap in
//!   a test double; [`Registry`] is the production implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rcast_registry::{DeviceDirectory, Registry};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), rcast_registry::RegistryError> {
//! let registry = Registry::builder()
//!     .url("https://directory.example.net")
//!     .timeout(Duration::from_secs(5))
//!     .init()?;
//!
//! let devices = registry.devices_for("u1").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod snapshot;

pub use error::{RegistryError, RegistryErrorExt};

use async_trait::async_trait;
use rcast_domain::registration::DeviceRegistration;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The read seam between the fan-out core and the external directory.
///
/// Returning an empty vector is a normal outcome (no devices ever
/// registered), not an error. Implementations must either yield the complete
/// current sub-tree for the user or fail the whole call; partial resolution
/// is not allowed.
#[async_trait]
pub trait DeviceDirectory: Send + Sync + std::fmt::Debug {
    /// Reads every registration currently stored for `user_id`.
    async fn devices_for(&self, user_id: &str) -> Result<Vec<DeviceRegistration>, RegistryError>;
}

#[derive(Debug)]
struct RegistryInner {
    client: Client,
    base: Url,
    auth: Option<String>,
}

/// Directory client wrapper that provides thread-safety and contextual error handling.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Creates a new [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn devices_url(&self, user_id: &str) -> Result<Url, RegistryError> {
        let mut url = self.inner.base.clone();
        url.path_segments_mut()
            .map_err(|()| RegistryError::Validation {
                message: "Registry base URL cannot be a base".into(),
                context: None,
            })?
            .pop_if_empty()
            .extend(["users", user_id, "devices.json"]);

        if let Some(auth) = &self.inner.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }

        Ok(url)
    }
}

#[async_trait]
impl DeviceDirectory for Registry {
    async fn devices_for(&self, user_id: &str) -> Result<Vec<DeviceRegistration>, RegistryError> {
        if user_id.is_empty() {
            return Err(RegistryError::Validation {
                message: "User id cannot be empty".into(),
                context: None,
            });
        }

        let url = self.devices_url(user_id)?;

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .context("Fetching device sub-tree")?;

        let status = response.status();
        let body = response.bytes().await.context("Reading device sub-tree body")?;

        if !status.is_success() {
            warn!(%status, user = %user_id, "Directory refused the device lookup");
            return Err(RegistryError::Rejected {
                message: rejected_message(status, body.as_ref()).into(),
                context: None,
            });
        }

        let devices = snapshot::decode_devices(body.as_ref())?;
        debug!(user = %user_id, count = devices.len(), "Resolved device sub-tree");

        Ok(devices)
    }
}

fn rejected_message(status: StatusCode, body: &[u8]) -> String {
    let detail = std::str::from_utf8(body).unwrap_or("<non-utf8 body>");
    let detail = detail.trim();
    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail:.200}")
    }
}

/// A fluent builder for configuring the directory client.
///
/// The base URL is mandatory; the auth token and timeout are optional.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    url: Option<String>,
    auth: Option<String>,
    timeout: Option<Duration>,
}

impl RegistryBuilder {
    /// Creates a new [`RegistryBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory base URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the access token the directory expects as an `auth` query parameter.
    pub fn auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Bounds every directory read; defaults to 5 seconds.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Consumes the builder and constructs the client handle.
    ///
    /// # Errors
    /// Returns [`RegistryError::Validation`] when the base URL is missing or
    /// unparsable, and [`RegistryError::Unavailable`] when the underlying
    /// HTTP client cannot be constructed.
    pub fn init(self) -> Result<Registry, RegistryError> {
        let url = self.url.ok_or_else(|| RegistryError::Validation {
            message: "Registry URL is required".into(),
            context: None,
        })?;

        let base = Url::parse(&url).map_err(|e| RegistryError::Validation {
            message: format!("Invalid registry URL '{url}': {e}").into(),
            context: None,
        })?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("Building registry HTTP client")?;

        Ok(Registry { inner: Arc::new(RegistryInner { client, base, auth: self.auth }) })
    }
}
