//! # Geokit
//!
//! A small, cross-platform kit for the device-service plumbing mobile apps
//! need around geolocation.
//!
//! Geokit provides a unified, UI-free API for tracking location permission
//! state, maintaining a best-known location backed by a persistent cache,
//! and fanning location/permission changes out to observers. The platform
//! location stack stays behind a trait, so the same service logic runs on
//! every OS and in tests.
//!
//! ## Features
//!
//! Geokit is modular. Enable only the features you need to keep your
//! dependencies minimal.
//!
//! - `permission`: Permission status types and projections.
//! - `location`: The device-location service (implies `permission`).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! geokit = { version = "0.1", features = ["location"] }
//! ```
//!
//! ```ignore
//! use geokit::location::{LocationService, MemoryStore};
//!
//! let service = LocationService::new(source, Arc::new(MemoryStore::new()));
//! service.start_monitoring(true);
//! if let Some(position) = service.current_location() {
//!     println!("Latitude: {}, Longitude: {}", position.latitude, position.longitude);
//! }
//! ```

#[cfg(feature = "location")]
pub use geokit_location as location;

#[cfg(feature = "permission")]
pub use geokit_permission as permission;
