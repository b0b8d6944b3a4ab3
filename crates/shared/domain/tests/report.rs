use rcast_domain::registration::DeviceRegistration;
use rcast_domain::report::{CancellationOutcome, DeliveryFailure, DeliveryReport};

fn outcome(device: &str, delivered: bool, failure: Option<DeliveryFailure>) -> CancellationOutcome {
    CancellationOutcome {
        device_id: device.to_owned(),
        push_token: format!("tok-{device}"),
        delivered,
        failure,
    }
}

#[test]
fn counters_are_recomputed_from_rows() {
    let report = DeliveryReport::from_outcomes(vec![
        outcome("d1", true, None),
        outcome("d2", false, Some(DeliveryFailure::Transient)),
        outcome("d3", false, Some(DeliveryFailure::TokenInvalid)),
    ]);

    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 2);
    assert_eq!(report.outcomes.len(), 3);
}

#[test]
fn stale_view_lists_only_invalid_tokens() {
    let report = DeliveryReport::from_outcomes(vec![
        outcome("d1", true, None),
        outcome("d2", false, Some(DeliveryFailure::TokenInvalid)),
        outcome("d3", false, Some(DeliveryFailure::Transient)),
    ]);

    assert_eq!(report.stale_device_ids(), vec!["d2"]);
}

#[test]
fn empty_report_has_zero_counts() {
    let report = DeliveryReport::empty();
    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 0);
    assert!(report.outcomes.is_empty());
    assert!(report.stale_device_ids().is_empty());
}

#[test]
fn empty_token_is_not_addressable() {
    let registration = DeviceRegistration::new("d1", Some(String::new()));
    assert!(registration.addressable_token().is_none());

    let registration = DeviceRegistration::new("d1", None);
    assert!(registration.addressable_token().is_none());

    let registration = DeviceRegistration::new("d1", Some("tok".to_owned()));
    assert_eq!(registration.addressable_token(), Some("tok"));
}
