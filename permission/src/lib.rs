//! Location permission status handling.
//!
//! This crate holds the authorization vocabulary shared by the geokit
//! location crates: the status values a platform reports for location
//! access, plus the projections the service layer needs when deciding
//! whether access is usable and what to tell observers.

#![warn(missing_docs)]

/// The authorization status of location access, as reported by the
/// platform.
///
/// The set is closed: a platform adapter must map whatever its native
/// status type reports onto one of these values. The service layer never
/// invents transitions, it only reacts to the reported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// The user has not been asked yet.
    NotDetermined,
    /// Granted while the app is in use.
    GrantedWhenInUse,
    /// Granted at all times, including in the background.
    GrantedAlways,
    /// The user has denied access.
    Denied,
    /// Access is blocked by device policy (e.g. parental controls) and
    /// the user cannot change it.
    Restricted,
}

impl PermissionStatus {
    /// Whether this status allows location access right now.
    ///
    /// Both granted variants count; everything else does not.
    #[must_use]
    pub const fn is_authorized(self) -> bool {
        matches!(self, Self::GrantedWhenInUse | Self::GrantedAlways)
    }

    /// Collapse this status into the granted/not-granted form used for
    /// change notifications.
    ///
    /// `NotDetermined` has no projection: the user has not answered yet,
    /// so there is nothing to announce.
    #[must_use]
    pub const fn granted(self) -> Option<bool> {
        match self {
            Self::NotDetermined => None,
            Self::GrantedWhenInUse | Self::GrantedAlways => Some(true),
            Self::Denied | Self::Restricted => Some(false),
        }
    }
}
