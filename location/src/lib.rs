//! Device location service.
//!
//! This crate provides the location plumbing a mobile app needs, without
//! committing to any UI framework: a [`LocationService`] that tracks the
//! platform's permission status, keeps the best-known [`Location`] backed
//! by a persistent cache, fans changes out to an observer, and resolves
//! one-shot location requests. The platform stack (Core Location, the
//! fused provider, ...) stays behind the [`LocationSource`] trait, so the
//! same service logic runs on every OS and in tests.
//!
//! ```ignore
//! let service = LocationService::new(platform_source(), Arc::new(JsonFileStore::new(path)));
//!
//! service.set_observer(observer.clone());
//! service.start_monitoring(true);
//!
//! service.register_listener(token.clone(), |outcome| match outcome {
//!     Ok(location) => println!("fix: {location:?}"),
//!     Err(err) => println!("no fix: {err}"),
//! });
//! ```

#![warn(missing_docs)]

mod channel;
mod observer;
mod prompt;
mod registry;
mod service;
mod source;
mod store;

pub use geokit_permission::PermissionStatus;

pub use channel::{ChannelObserver, ServiceEvent};
pub use observer::LocationServiceObserver;
pub use prompt::{
    PermissionPrompt, PermissionPromptHost, PromptOutcome, PromptResponder, PromptSurface,
};
pub use registry::LocationCallback;
pub use service::LocationService;
pub use source::{Accuracy, LocationSource, SourceDelegate, SourceEvent, UpdateConfig};
pub use store::{JsonFileStore, LocationStore, MemoryStore, StoreError, STORED_LOCATION_KEY};

use serde::{Deserialize, Serialize};

/// A geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Location {
    /// Create a location from raw coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Errors the platform reports when it cannot produce a location fix.
///
/// These are forwarded verbatim to pending listeners and the observer; the
/// service never fabricates one itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location permission was not granted.
    #[error("location permission denied")]
    PermissionDenied,
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// The platform gave up waiting for a fix.
    #[error("location request timed out")]
    Timeout,
    /// No fix is currently available.
    #[error("location not available")]
    NotAvailable,
    /// Any other platform-level failure.
    #[error("platform error: {message}")]
    Platform {
        /// Platform-provided description of the failure.
        message: String,
    },
}
