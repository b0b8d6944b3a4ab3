//! Device set resolution.

use crate::error::{CancellationError, CancellationErrorExt};
use rcast_domain::registration::DeviceRegistration;
use rcast_registry::DeviceDirectory;
use tracing::debug;

/// Reads the complete, current device set registered for `user_id`.
///
/// An empty result is a normal outcome (nothing ever registered), not an
/// error. Entries without a usable token are kept: surfacing what exists is
/// this stage's job, filtering by intent is the dispatcher's.
///
/// # Errors
/// A directory failure aborts the whole operation as
/// [`CancellationError::Registry`]; there is no partial resolution.
pub async fn resolve_devices(
    directory: &dyn DeviceDirectory,
    user_id: &str,
) -> Result<Vec<DeviceRegistration>, CancellationError> {
    let devices = directory.devices_for(user_id).await.context("Resolving device set")?;

    debug!(
        user = %user_id,
        devices = devices.len(),
        addressable = devices.iter().filter(|d| d.addressable_token().is_some()).count(),
        "Device set resolved"
    );

    Ok(devices)
}
