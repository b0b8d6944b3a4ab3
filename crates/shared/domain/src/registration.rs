//! Device registrations as surfaced by the external directory.

use serde::{Deserialize, Serialize};

/// One device's current push-addressability for a user.
///
/// A registration with an absent or empty token is non-addressable: it is
/// surfaced by the resolver but excluded from delivery, never treated as an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    pub push_token: Option<String>,
}

impl DeviceRegistration {
    pub fn new(device_id: impl Into<String>, push_token: Option<String>) -> Self {
        Self { device_id: device_id.into(), push_token }
    }

    /// Returns the push token when the device can actually be reached.
    #[must_use]
    pub fn addressable_token(&self) -> Option<&str> {
        self.push_token.as_deref().filter(|token| !token.is_empty())
    }
}
