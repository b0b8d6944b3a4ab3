//! Ergonomic re-exports for consumers of the kernel.

pub use crate::config::{ConfigError, load_config};
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateBuilder, ApiStateError};
pub use rcast_domain::config::ApiConfig;
