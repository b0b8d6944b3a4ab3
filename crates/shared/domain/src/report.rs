//! Delivery reports produced by the fan-out dispatcher.

use serde::{Deserialize, Serialize};

/// Why a single destination was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryFailure {
    /// The transport reported the registration as permanently dead.
    /// Candidates for registry cleanup by an external collaborator.
    TokenInvalid,
    /// Anything else (throttling, connectivity, server hiccups).
    /// Reported, never retried by this service.
    Transient,
}

/// One row per attempted destination, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub device_id: String,
    pub push_token: String,
    pub delivered: bool,
    pub failure: Option<DeliveryFailure>,
}

/// The reconciled result of one fan-out dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub success_count: u32,
    pub failure_count: u32,
    pub outcomes: Vec<CancellationOutcome>,
}

impl DeliveryReport {
    /// A report with nothing to deliver. This is success, not an error.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a report from reconciled outcomes, recomputing both counters
    /// from the rows rather than trusting transport-provided tallies.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<CancellationOutcome>) -> Self {
        let delivered = outcomes.iter().filter(|o| o.delivered).count();
        let failed = outcomes.len() - delivered;
        Self {
            success_count: u32::try_from(delivered).unwrap_or(u32::MAX),
            failure_count: u32::try_from(failed).unwrap_or(u32::MAX),
            outcomes,
        }
    }

    /// Device ids whose registrations the transport reported as permanently
    /// invalid. Surfaced for an external cleanup collaborator; this service
    /// never mutates the registry itself.
    #[must_use]
    pub fn stale_device_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.failure == Some(DeliveryFailure::TokenInvalid))
            .map(|o| o.device_id.as_str())
            .collect()
    }
}
