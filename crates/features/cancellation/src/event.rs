//! Events surfaced to external collaborators.

/// Registrations the transport reported as permanently dead.
///
/// Cleanup is not this service's call: an external collaborator subscribes
/// to this event and decides whether to drop the directory entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleRegistrations {
    pub user_id: String,
    pub device_ids: Vec<String>,
}
