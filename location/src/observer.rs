//! Change notifications produced by the service.

use crate::{Location, LocationError};

/// Receives the service's change notifications.
///
/// The service holds its observer weakly and never extends its lifetime;
/// see [`LocationService::set_observer`](crate::LocationService::set_observer).
/// Callbacks run synchronously on whichever thread delivered the platform
/// event, so implementations should hand heavy work off elsewhere.
pub trait LocationServiceObserver: Send + Sync {
    /// Authorization flipped to granted (`true`) or not granted (`false`).
    ///
    /// Fired for every reported status that has a granted projection; a
    /// "not determined" status produces no call.
    fn on_authorization_changed(&self, granted: bool);

    /// A fresh fix was obtained and cached.
    fn on_location_changed(&self, location: Location);

    /// The platform failed to produce a fix. Cached data is unaffected.
    fn on_failure(&self, error: &LocationError);
}
