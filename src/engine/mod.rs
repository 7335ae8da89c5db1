pub mod alerts;
pub mod callbacks;
pub mod controller;
pub mod state;

use crate::sensing::classifier::VisionProvider;

/// Outcome of an OS permission probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Blocked by policy (e.g. parental controls); the user cannot grant it.
    Restricted,
}

/// Host hook for querying OS capture permissions before a session starts.
pub trait PermissionGate: Send + Sync {
    fn camera_permission(&self) -> PermissionState;
    fn screen_permission(&self) -> PermissionState;
}

/// Host hook for checking that an API credential exists for a vision provider.
pub trait CredentialStore: Send + Sync {
    fn has_credential(&self, provider: VisionProvider) -> bool;
}
