//! Inbound HTTP surface of the cancellation slice.

use crate::{Cancellation, CancellationError};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcast_derive::{api_handler, api_model};
use rcast_domain::acceptance::CallAcceptance;
use rcast_domain::constants::CALLS_TAG;
use rcast_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
/// A call accepted on one device; all fields required and non-empty.
pub struct CallAcceptedRequest {
    /// Owner of the ringing devices
    user_id: Option<String>,
    /// Device that accepted the call
    accepted_device_id: Option<String>,
    /// Call/session identifier
    channel: Option<String>,
    /// Opaque session credential
    token: Option<String>,
}

#[api_model]
/// Dispatch result; counters are omitted when nothing was dispatched.
pub struct CallAcceptedResponse {
    /// Human-readable outcome
    message: String,
    /// Destinations confirmed by the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    success_count: Option<u32>,
    /// Destinations the transport could not deliver to
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_count: Option<u32>,
}

#[api_model]
/// Structured error payload.
pub struct ApiErrorResponse {
    /// What went wrong
    error: String,
}

impl IntoResponse for CancellationError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Registry { .. } | Self::Transport { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        };

        (status, Json(ApiErrorResponse { error: self.to_string() })).into_response()
    }
}

#[api_handler(
    post,
    path = "/calls/accepted",
    request_body = CallAcceptedRequest,
    responses(
        (status = OK, description = "Fan-out completed (possibly with nothing to notify)", body = CallAcceptedResponse),
        (status = BAD_REQUEST, description = "Missing or empty required field", body = ApiErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Registry or push transport unavailable", body = ApiErrorResponse),
    ),
    tag = CALLS_TAG,
)]
pub(crate) async fn call_accepted_handler(
    State(state): State<ApiState>,
    Json(payload): Json<CallAcceptedRequest>,
) -> Result<Json<CallAcceptedResponse>, CancellationError> {
    let acceptance = validate(payload)?;

    let slice = state
        .try_get_slice::<Cancellation>()
        .map_err(|e| CancellationError::from(e.to_string()))?;

    let report = slice.handle_acceptance(&acceptance).await?;

    let response = if report.outcomes.is_empty() {
        CallAcceptedResponse {
            message: "No other devices to notify.".to_owned(),
            success_count: None,
            failure_count: None,
        }
    } else {
        CallAcceptedResponse {
            message: "Cancellation dispatched.".to_owned(),
            success_count: Some(report.success_count),
            failure_count: Some(report.failure_count),
        }
    };

    Ok(Json(response))
}

/// Routes contributed by this slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(call_accepted_handler))
}

fn validate(payload: CallAcceptedRequest) -> Result<CallAcceptance, CancellationError> {
    Ok(CallAcceptance {
        user_id: require(payload.user_id, "userId")?,
        accepted_device_id: require(payload.accepted_device_id, "acceptedDeviceId")?,
        channel: require(payload.channel, "channel")?,
        session_token: require(payload.token, "token")?,
    })
}

fn require(value: Option<String>, field: &'static str) -> Result<String, CancellationError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| CancellationError::Validation {
        message: format!("Missing required field: {field}").into(),
        context: None,
    })
}
