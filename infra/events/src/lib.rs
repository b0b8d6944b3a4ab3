//! # Event Bus
//!
//! A type-safe, asynchronous broadcast bus designed for vertical slice
//! architectures.
//!
//! ## Overview
//!
//! Provides a centralized [`EventBus`] with fan-out (broadcast) semantics to
//! connect decoupled components. Uses `tokio` primitives with minimal
//! overhead; channels are indexed by the Rust type of the event.
//!
//! # Example
//!
//! ```rust
//! use rcast_event_bus::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct CallTaken { channel: String }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<CallTaken>()?;
//!     bus.publish(CallTaken { channel: "c-1".to_owned() })?;
//!
//!     if let Some(event) = rx.recv_event().await {
//!         assert_eq!(event.channel, "c-1");
//!     }
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
