//! The multicast transport seam.

use crate::error::PushError;
use crate::message::{MulticastMessage, MulticastReceipt};
use async_trait::async_trait;

/// The write seam between the fan-out core and the vendor push service.
///
/// One call delivers the whole batch — the request count is bounded
/// regardless of fan-out size and the transport is free to parallelize
/// internally. The receipt's outcome rows correspond **positionally** to the
/// submitted tokens; implementations must preserve submission order. An
/// `Err` means the whole batch failed and nothing can be said about
/// individual destinations; implementations must not retry internally.
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug {
    /// Delivers `message` to every destination token it carries.
    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<MulticastReceipt, PushError>;
}
