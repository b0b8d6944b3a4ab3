//! Shared string constants.

/// OpenAPI tag for system endpoints.
pub const SYSTEM_TAG: &str = "System";

/// OpenAPI tag for call endpoints.
pub const CALLS_TAG: &str = "Calls";

/// Payload type tag carried by every cancellation push.
pub const CALL_TAKEN: &str = "call_taken";
