//! Decoding of directory snapshots into typed registrations.

use crate::error::{RegistryError, RegistryErrorExt};
use rcast_domain::registration::DeviceRegistration;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One per-device record as stored in the directory.
///
/// The directory is loosely typed and carries arbitrary per-device fields;
/// only the push token matters here, everything else is ignored on decode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceRecord {
    #[serde(default)]
    fcm_token: Option<String>,
}

/// Decodes a user's device sub-tree.
///
/// The wire document is either `null` (no devices ever registered — a normal
/// outcome) or an unordered object keyed by device id. A `BTreeMap` pins the
/// output to device-id order so downstream reports are deterministic.
pub(crate) fn decode_devices(body: &[u8]) -> Result<Vec<DeviceRegistration>, RegistryError> {
    let snapshot: Option<BTreeMap<String, DeviceRecord>> =
        serde_json::from_slice(body).context("Decoding device sub-tree")?;

    Ok(snapshot
        .unwrap_or_default()
        .into_iter()
        .map(|(device_id, record)| DeviceRegistration::new(device_id, record.fcm_token))
        .collect())
}
