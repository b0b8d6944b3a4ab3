//! Positional-stability properties of the reconciliation step.

mod fixtures;

use fixtures::{FakeTransport, device};
use proptest::prelude::*;
use rcast_cancellation::dispatcher::dispatch;
use rcast_domain::registration::DeviceRegistration;
use rcast_push::{SendFailure, SendOutcome};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime should build")
        .block_on(future)
}

fn build_devices(token_presence: &[bool]) -> Vec<DeviceRegistration> {
    token_presence
        .iter()
        .enumerate()
        .map(|(i, has_token)| {
            let token = has_token.then(|| format!("token-{i}"));
            device(&format!("d{i}"), token.as_deref())
        })
        .collect()
}

proptest! {
    /// Whatever the transport answers, row `i` of the report refers to the
    /// `i`-th submitted candidate: reordering the response rows reorders the
    /// reconciled report identically.
    #[test]
    fn report_rows_follow_submission_order(
        token_presence in proptest::collection::vec(any::<bool>(), 0..8),
        accepted_index in 0usize..8,
        delivery_flags in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let devices = build_devices(&token_presence);
        let accepted_id = format!("d{accepted_index}");

        let expected: Vec<&DeviceRegistration> = devices
            .iter()
            .filter(|d| d.device_id != accepted_id && d.addressable_token().is_some())
            .collect();

        let outcomes: Vec<SendOutcome> = delivery_flags
            .iter()
            .take(expected.len())
            .map(|&ok| SendOutcome {
                delivered: ok,
                failure: (!ok).then_some(SendFailure::Transient),
            })
            .collect();

        let transport = FakeTransport::scripted(outcomes.clone());
        let report = block_on(dispatch(&transport, &devices, &accepted_id, "c-1", "sess-1"))
            .expect("dispatch should succeed");

        prop_assert_eq!(report.outcomes.len(), expected.len());
        for (i, outcome) in report.outcomes.iter().enumerate() {
            prop_assert_eq!(&outcome.device_id, &expected[i].device_id);
            prop_assert_eq!(
                Some(outcome.push_token.as_str()),
                expected[i].addressable_token()
            );
            prop_assert_eq!(outcome.delivered, outcomes[i].delivered);
        }

        // The accepting device's token never leaves the building.
        if let Some(batch) = transport.last_tokens() {
            let accepted_token = format!("token-{}", accepted_index);
            prop_assert!(!batch.contains(&accepted_token));
            prop_assert_eq!(batch.len(), expected.len());
        }
    }
}
