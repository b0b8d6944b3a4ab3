//! Facade crate for `RingCast` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `rcast` with the `server` feature flag.
//! - Call `rcast::init` (server) to register feature slices; extend as new slices appear.

pub use rcast_domain as domain;
use rcast_event_bus::EventBus;
pub use rcast_kernel as kernel;
use rcast_push::PushTransport;
use rcast_registry::DeviceDirectory;
use std::sync::Arc;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use rcast_cancellation::routes::router as cancellation_router;
        pub use rcast_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use rcast_cancellation as cancellation;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "server")]
        "cancellation",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// The collaborators are constructed by the application shell and threaded
/// through here so every slice receives explicit handles instead of reaching
/// for process-global state.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    directory: Arc<dyn DeviceDirectory>,
    transport: Arc<dyn PushTransport>,
    events: &EventBus,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Cancellation fan-out
    slices.push(features::cancellation::init(directory, transport, events.clone())?);

    Ok(slices)
}
