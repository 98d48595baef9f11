//! The platform seam: commands the service issues and events it receives.

use std::sync::Weak;

use geokit_permission::PermissionStatus;

use crate::{Location, LocationError};

/// Accuracy hint for the continuous update stream.
///
/// Platform adapters map these onto their native accuracy constants; a
/// platform without an exact match picks the nearest coarser setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    /// The best fix the hardware can produce.
    Best,
    /// Accurate to roughly ten meters.
    NearestTenMeters,
    /// Accurate to roughly a hundred meters. Enough for city-level
    /// features at a fraction of the power cost, hence the default.
    #[default]
    HundredMeters,
    /// Accurate to roughly a kilometer.
    Kilometer,
    /// Accurate to roughly three kilometers.
    ThreeKilometers,
}

/// Stream configuration, applied to the source once when the service is
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpdateConfig {
    /// Accuracy hint for the stream.
    pub accuracy: Accuracy,
    /// Minimum horizontal movement, in meters, before the platform reports
    /// a new fix. `None` leaves the platform default in place.
    pub distance_filter_m: Option<f64>,
}

/// Events pushed by the platform location stack.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// The authorization status changed: the user answered a prompt,
    /// toggled settings, or device policy changed.
    AuthorizationChanged {
        /// The newly reported status.
        status: PermissionStatus,
    },
    /// One or more fixes arrived.
    Updated {
        /// The batch of fixes; the most recent entry is last.
        locations: Vec<Location>,
    },
    /// The platform could not produce a fix.
    Failed {
        /// The reported failure.
        error: LocationError,
    },
}

/// Receives [`SourceEvent`]s from a [`LocationSource`].
///
/// [`LocationService`](crate::LocationService) implements this; platform
/// adapters deliver events through the weak handle given to
/// [`LocationSource::set_delegate`].
pub trait SourceDelegate: Send + Sync {
    /// Handle one platform event.
    ///
    /// Events must be delivered one at a time, in arrival order.
    fn on_event(&self, event: SourceEvent);
}

/// The platform location stack behind one trait.
///
/// Commands are fire-and-forget: their results arrive asynchronously as
/// [`SourceEvent`]s on the registered delegate. Implementations must be
/// callable from any thread.
pub trait LocationSource: Send + Sync {
    /// Register the event sink.
    ///
    /// The source holds the delegate weakly and drops deliveries once it
    /// is gone.
    fn set_delegate(&self, delegate: Weak<dyn SourceDelegate>);

    /// The current authorization status, queried live from the platform.
    fn current_status(&self) -> PermissionStatus;

    /// Ask the platform to put its permission prompt in front of the user.
    ///
    /// The outcome arrives later as [`SourceEvent::AuthorizationChanged`].
    fn request_authorization(&self);

    /// Start the continuous update stream.
    fn start_continuous_updates(&self);

    /// Stop the continuous update stream.
    fn stop_continuous_updates(&self);

    /// Request one immediate fix, delivered (or failed) as an event.
    fn request_single_fix(&self);

    /// The most recent fix the platform itself is holding, if any.
    fn last_fix(&self) -> Option<Location>;

    /// Apply stream configuration.
    ///
    /// Called once when the service is built. Sources without tunables can
    /// keep the default no-op.
    fn configure(&self, _config: UpdateConfig) {}
}
