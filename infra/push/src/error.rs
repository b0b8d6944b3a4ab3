use std::borrow::Cow;

/// A specialized [`PushError`] enum of this crate.
///
/// Per-token delivery failures are not errors; they are rows in the
/// [`MulticastReceipt`](crate::MulticastReceipt). An `Err` from the transport
/// means the whole batch failed.
#[rcast_derive::rcast_error]
pub enum PushError {
    /// Validation errors (bad endpoint, missing project id).
    #[error("Push transport validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Service-account credential failures (loading or token exchange).
    /// Without a bearer token no destination can be attempted, so the whole
    /// batch fails.
    #[error("Push credentials error{}: {source}", format_context(.context))]
    Credentials {
        #[source]
        source: gcp_auth::Error,
        context: Option<Cow<'static, str>>,
    },

    /// The transport as a whole could not be reached.
    #[error("Push transport unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal push transport error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
