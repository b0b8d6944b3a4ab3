//! Cancellation fan-out: filter, batch, invoke, reconcile.

use crate::error::{CancellationError, CancellationErrorExt};
use rcast_domain::registration::DeviceRegistration;
use rcast_domain::report::{CancellationOutcome, DeliveryFailure, DeliveryReport};
use rcast_push::{MulticastMessage, MulticastReceipt, PushTransport, SendFailure};
use tracing::{debug, info};

/// A device that will actually receive the cancellation signal.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    device_id: String,
    push_token: String,
}

/// Every registered device except the accepting one and the non-addressable
/// ones, in resolver order.
fn candidates(devices: &[DeviceRegistration], accepted_device_id: &str) -> Vec<Candidate> {
    devices
        .iter()
        .filter(|device| device.device_id != accepted_device_id)
        .filter_map(|device| match device.addressable_token() {
            Some(token) => Some(Candidate {
                device_id: device.device_id.clone(),
                push_token: token.to_owned(),
            }),
            None => {
                debug!(device = %device.device_id, "Skipping non-addressable device");
                None
            },
        })
        .collect()
}

/// Zips candidates against the transport receipt, row by row.
///
/// Positional correspondence is the transport's hard contract; a row-count
/// mismatch means that contract is broken and no outcome can be attributed
/// safely, so the dispatch aborts instead of guessing.
fn reconcile(
    candidates: Vec<Candidate>,
    receipt: &MulticastReceipt,
) -> Result<DeliveryReport, CancellationError> {
    if receipt.outcomes.len() != candidates.len() {
        return Err(CancellationError::Internal {
            message: format!(
                "Transport returned {} outcomes for {} destinations",
                receipt.outcomes.len(),
                candidates.len()
            )
            .into(),
            context: None,
        });
    }

    let outcomes = candidates
        .into_iter()
        .zip(&receipt.outcomes)
        .map(|(candidate, outcome)| CancellationOutcome {
            device_id: candidate.device_id,
            push_token: candidate.push_token,
            delivered: outcome.delivered,
            failure: outcome.failure.map(|failure| match failure {
                SendFailure::TokenInvalid => DeliveryFailure::TokenInvalid,
                SendFailure::Transient => DeliveryFailure::Transient,
            }),
        })
        .collect();

    Ok(DeliveryReport::from_outcomes(outcomes))
}

/// Fans the cancellation signal out to every other registered device.
///
/// The accepting device and devices without a usable token are filtered
/// first; an empty candidate list short-circuits with a zero-count report
/// and never touches the transport. Otherwise the whole batch goes out in
/// one transport invocation and the per-token receipt is reconciled into a
/// [`DeliveryReport`]. Per-token failures never abort the batch and are
/// never retried here.
///
/// # Errors
/// [`CancellationError::Transport`] when the whole batch fails, and
/// [`CancellationError::Internal`] when the receipt violates the positional
/// contract.
pub async fn dispatch(
    transport: &dyn PushTransport,
    devices: &[DeviceRegistration],
    accepted_device_id: &str,
    channel: &str,
    session_token: &str,
) -> Result<DeliveryReport, CancellationError> {
    let candidates = candidates(devices, accepted_device_id);

    if candidates.is_empty() {
        info!(device = %accepted_device_id, "No other devices to notify");
        return Ok(DeliveryReport::empty());
    }

    let tokens = candidates.iter().map(|c| c.push_token.clone()).collect();
    let message = MulticastMessage::cancellation(channel, session_token, tokens);

    let receipt =
        transport.send_multicast(&message).await.context("Dispatching cancellation batch")?;

    let report = reconcile(candidates, &receipt)?;
    info!(
        delivered = report.success_count,
        failed = report.failure_count,
        stale = report.stale_device_ids().len(),
        "Cancellation fan-out reconciled"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcast_push::SendOutcome;

    fn device(id: &str, token: Option<&str>) -> DeviceRegistration {
        DeviceRegistration::new(id, token.map(str::to_owned))
    }

    fn delivered() -> SendOutcome {
        SendOutcome { delivered: true, failure: None }
    }

    fn failed(failure: SendFailure) -> SendOutcome {
        SendOutcome { delivered: false, failure: Some(failure) }
    }

    #[test]
    fn accepting_device_is_never_a_candidate() {
        let devices = vec![device("d1", Some("tokA")), device("d2", Some("tokB"))];
        let list = candidates(&devices, "d1");

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].device_id, "d2");
        assert!(list.iter().all(|c| c.push_token != "tokA"));
    }

    #[test]
    fn tokenless_devices_are_filtered() {
        let devices =
            vec![device("d1", Some("tokA")), device("d2", None), device("d3", Some(""))];
        let list = candidates(&devices, "d1");
        assert!(list.is_empty());
    }

    #[test]
    fn reconcile_maps_rows_positionally() {
        let list = vec![
            Candidate { device_id: "d2".to_owned(), push_token: "tokB".to_owned() },
            Candidate { device_id: "d3".to_owned(), push_token: "tokC".to_owned() },
        ];
        let receipt = MulticastReceipt::from_outcomes(vec![
            failed(SendFailure::TokenInvalid),
            delivered(),
        ]);

        let report = reconcile(list, &receipt).unwrap();
        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.outcomes[0].device_id, "d2");
        assert_eq!(report.outcomes[0].failure, Some(DeliveryFailure::TokenInvalid));
        assert_eq!(report.outcomes[1].device_id, "d3");
        assert!(report.outcomes[1].delivered);
        assert_eq!(report.stale_device_ids(), vec!["d2"]);
    }

    #[test]
    fn reconcile_rejects_row_count_mismatch() {
        let list = vec![Candidate { device_id: "d2".to_owned(), push_token: "tokB".to_owned() }];
        let receipt = MulticastReceipt::from_outcomes(vec![delivered(), delivered()]);

        let err = reconcile(list, &receipt).unwrap_err();
        assert!(matches!(err, CancellationError::Internal { .. }));
    }
}
