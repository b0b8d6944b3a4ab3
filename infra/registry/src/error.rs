use std::borrow::Cow;

/// A specialized [`RegistryError`] enum of this crate.
#[rcast_derive::rcast_error]
pub enum RegistryError {
    /// Validation errors (bad base URL, empty user id).
    #[error("Registry validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Connectivity failures talking to the directory (timeouts included).
    /// The whole resolve aborts; there is no partial resolution.
    #[error("Registry unavailable{}: {source}", format_context(.context))]
    Unavailable {
        #[source]
        source: reqwest::Error,
        context: Option<Cow<'static, str>>,
    },

    /// The directory answered with a non-success status.
    #[error("Registry rejected the request{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The directory answered with a document this crate cannot decode.
    #[error("Registry snapshot decode error{}: {source}", format_context(.context))]
    Decode {
        #[source]
        source: serde_json::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
