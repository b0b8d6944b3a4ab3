//! The triggering input of a fan-out dispatch.

use serde::{Deserialize, Serialize};

/// A call accepted on one specific device.
///
/// All four fields are required and non-empty; enforcing that is the inbound
/// boundary's job, so this type carries only validated values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAcceptance {
    pub user_id: String,
    pub accepted_device_id: String,
    /// Call/session identifier the clients use to match their ringing state.
    pub channel: String,
    /// Session credential forwarded opaquely to the cancelled devices.
    pub session_token: String,
}
