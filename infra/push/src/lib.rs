//! # Push Transport Infrastructure
//!
//! This crate provides the multicast push seam used by the fan-out core and
//! its production implementation over the
//! [FCM HTTP v1 API](https://firebase.google.com/docs/cloud-messaging).
//!
//! ## Key Features
//! - **One invocation per batch**: the [`PushTransport`] trait accepts the
//!   whole destination list at once and answers with a positional receipt.
//! - **Injected credentials**: the FCM client is built from an explicit
//!   service-account file; no hidden process-global setup.
//! - **Failure taxonomy**: per-destination rejections are classified into
//!   permanently-invalid vs. transient; whole-batch failures surface as
//!   [`PushError`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use rcast_push::{FcmTransport, MulticastMessage, PushTransport};
//!
//! # async fn example() -> Result<(), rcast_push::PushError> {
//! let transport = FcmTransport::builder()
//!     .project_id("my-project")
//!     .credentials_file("service-account.json")
//!     .init()?;
//!
//! let message = MulticastMessage::cancellation("c-1", "sess", vec!["tok".to_owned()]);
//! let receipt = transport.send_multicast(&message).await?;
//! assert_eq!(receipt.outcomes.len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
mod fcm;
mod message;
mod transport;

pub use error::{PushError, PushErrorExt};
pub use fcm::{FcmBuilder, FcmTransport};
pub use message::{MulticastMessage, MulticastReceipt, SendFailure, SendOutcome};
pub use transport::PushTransport;
