//! Cancellation feature slice: fan a call-taken signal out to a user's
//! other registered devices after one device accepts an incoming call.
//!
//! The slice owns no state beyond its injected collaborators: the device
//! directory it resolves from, the push transport it dispatches through,
//! and the event bus it surfaces stale registrations on.

mod error;
mod event;

pub mod dispatcher;
pub mod resolver;
#[cfg(feature = "server")]
pub mod routes;

pub use crate::error::{CancellationError, CancellationErrorExt};
pub use crate::event::StaleRegistrations;

use rcast_domain::acceptance::CallAcceptance;
use rcast_domain::report::DeliveryReport;
use rcast_event_bus::EventBus;
use rcast_kernel::domain::registry::InitializedSlice;
use rcast_kernel::safe_nanoid;
use rcast_push::PushTransport;
use rcast_registry::DeviceDirectory;
use std::sync::Arc;
use tracing::{Instrument, warn};

/// Cancellation feature state.
#[rcast_derive::rcast_slice]
pub struct Cancellation {
    pub directory: Arc<dyn DeviceDirectory>,
    pub transport: Arc<dyn PushTransport>,
    pub events: EventBus,
}

impl Cancellation {
    /// Runs one full acceptance event: resolve, dispatch, reconcile.
    ///
    /// Invalid-token outcomes are additionally published as a
    /// [`StaleRegistrations`] event for an external cleanup collaborator;
    /// a missing subscriber is fine, the report still carries the same view.
    ///
    /// # Errors
    /// [`CancellationError::Registry`] or [`CancellationError::Transport`]
    /// when either collaborator fails wholesale.
    pub async fn handle_acceptance(
        &self,
        acceptance: &CallAcceptance,
    ) -> Result<DeliveryReport, CancellationError> {
        let span = tracing::info_span!(
            "call_fanout",
            dispatch = %safe_nanoid!(),
            user = %acceptance.user_id,
            device = %acceptance.accepted_device_id,
        );

        async {
            let devices =
                resolver::resolve_devices(self.directory.as_ref(), &acceptance.user_id).await?;

            let report = dispatcher::dispatch(
                self.transport.as_ref(),
                &devices,
                &acceptance.accepted_device_id,
                &acceptance.channel,
                &acceptance.session_token,
            )
            .await?;

            self.surface_stale(&acceptance.user_id, &report);

            Ok(report)
        }
        .instrument(span)
        .await
    }

    fn surface_stale(&self, user_id: &str, report: &DeliveryReport) {
        let device_ids: Vec<String> =
            report.stale_device_ids().into_iter().map(str::to_owned).collect();
        if device_ids.is_empty() {
            return;
        }

        warn!(count = device_ids.len(), "Dead registrations flagged for external cleanup");

        let event = StaleRegistrations { user_id: user_id.to_owned(), device_ids };
        if let Err(e) = self.events.publish(event) {
            warn!(error = %e, "Failed to surface stale registrations");
        }
    }
}

/// Initialize the cancellation feature with its collaborators.
///
/// # Errors
///
#[cfg(feature = "server")]
pub fn init(
    directory: Arc<dyn DeviceDirectory>,
    transport: Arc<dyn PushTransport>,
    events: EventBus,
) -> Result<InitializedSlice, CancellationError> {
    tracing::info!("Cancellation server slice initialized");

    let inner = CancellationInner { directory, transport, events };

    let slice = Cancellation::new(inner);

    Ok(InitializedSlice::new(slice))
}
