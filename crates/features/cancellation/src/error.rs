use rcast_push::PushError;
use rcast_registry::RegistryError;
use std::borrow::Cow;

/// A specialized [`CancellationError`] enum of this crate.
#[rcast_derive::rcast_error]
pub enum CancellationError {
    /// A required inbound field is missing or empty. Client error; nothing
    /// external was called.
    #[error("Cancellation validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The device directory could not be read; the whole operation aborts.
    #[error("Device registry unavailable{}: {source}", format_context(.context))]
    Registry {
        #[source]
        source: RegistryError,
        context: Option<Cow<'static, str>>,
    },

    /// The push transport failed wholesale; nothing was delivered.
    #[error("Push transport unavailable{}: {source}", format_context(.context))]
    Transport {
        #[source]
        source: PushError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal cancellation error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
