//! Multicast message and receipt types.

use rcast_domain::constants::CALL_TAKEN;
use serde_json::{Value, json};

/// One logical cancellation batch: a fixed data payload plus every
/// destination token, in the order they were filtered.
///
/// The payload is delivered as transport-level data only (no user-visible
/// alert) with delivery hints asking both mobile platforms for immediate,
/// silent, background-capable delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastMessage {
    channel: String,
    session_token: String,
    tokens: Vec<String>,
}

impl MulticastMessage {
    /// Builds the cancellation batch for one accepted call.
    pub fn cancellation(
        channel: impl Into<String>,
        session_token: impl Into<String>,
        tokens: Vec<String>,
    ) -> Self {
        Self { channel: channel.into(), session_token: session_token.into(), tokens }
    }

    /// Destination tokens in submission order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The FCM v1 request body for a single destination of this batch.
    ///
    /// Data-only (no `notification` block) so clients decide how to react;
    /// priority hints wake backgrounded apps on both platforms.
    #[must_use]
    pub(crate) fn body_for(&self, token: &str) -> Value {
        json!({
            "message": {
                "token": token,
                "data": {
                    "type": CALL_TAKEN,
                    "channel": self.channel,
                    "token": self.session_token,
                },
                "android": { "priority": "high" },
                "apns": {
                    "headers": {
                        "apns-priority": "10",
                        "apns-push-type": "background",
                    },
                    "payload": { "aps": { "content-available": 1 } },
                },
                "webpush": { "headers": { "Urgency": "high" } },
            }
        })
    }
}

/// Why a single destination failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// The registration is permanently dead; the token will never work again.
    TokenInvalid,
    /// Throttling, connectivity, upstream hiccups. May work next time.
    Transient,
}

/// Per-destination result, positionally matching the submitted token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub delivered: bool,
    pub failure: Option<SendFailure>,
}

impl SendOutcome {
    pub(crate) const DELIVERED: Self = Self { delivered: true, failure: None };

    pub(crate) const fn failed(failure: SendFailure) -> Self {
        Self { delivered: false, failure: Some(failure) }
    }
}

/// The transport's answer to one multicast invocation.
///
/// `outcomes[i]` corresponds to `tokens[i]` of the submitted message. This
/// positional correspondence is a hard contract of the
/// [`PushTransport`](crate::PushTransport) trait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MulticastReceipt {
    pub success_count: u32,
    pub failure_count: u32,
    pub outcomes: Vec<SendOutcome>,
}

impl MulticastReceipt {
    /// Builds a receipt, computing both counters from the rows.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<SendOutcome>) -> Self {
        let delivered = outcomes.iter().filter(|o| o.delivered).count();
        let failed = outcomes.len() - delivered;
        Self {
            success_count: u32::try_from(delivered).unwrap_or(u32::MAX),
            failure_count: u32::try_from(failed).unwrap_or(u32::MAX),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_data_payload_and_priority_hints() {
        let message = MulticastMessage::cancellation("c-77", "sess-1", vec!["tok".to_owned()]);
        let body = message.body_for("tok");

        assert_eq!(body["message"]["token"], "tok");
        assert_eq!(body["message"]["data"]["type"], "call_taken");
        assert_eq!(body["message"]["data"]["channel"], "c-77");
        assert_eq!(body["message"]["data"]["token"], "sess-1");
        assert_eq!(body["message"]["android"]["priority"], "high");
        assert_eq!(body["message"]["apns"]["headers"]["apns-priority"], "10");
        assert_eq!(body["message"]["apns"]["headers"]["apns-push-type"], "background");
        assert_eq!(body["message"]["apns"]["payload"]["aps"]["content-available"], 1);
    }

    #[test]
    fn body_has_no_user_visible_alert() {
        let message = MulticastMessage::cancellation("c-77", "sess-1", vec!["tok".to_owned()]);
        let body = message.body_for("tok");

        assert!(body["message"].get("notification").is_none());
        assert!(body["message"]["apns"]["payload"]["aps"].get("alert").is_none());
    }

    #[test]
    fn receipt_counters_match_rows() {
        let receipt = MulticastReceipt::from_outcomes(vec![
            SendOutcome::DELIVERED,
            SendOutcome::failed(SendFailure::TokenInvalid),
            SendOutcome::DELIVERED,
        ]);

        assert_eq!(receipt.success_count, 2);
        assert_eq!(receipt.failure_count, 1);
    }
}
