//! Reactive access to service notifications.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use log::warn;

use crate::{Location, LocationError, LocationServiceObserver};

/// A service notification, as carried by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// Authorization flipped to granted or not granted.
    AuthorizationChanged {
        /// The granted projection of the new status.
        granted: bool,
    },
    /// A fresh fix was obtained and cached.
    LocationChanged {
        /// The new best-known location.
        location: Location,
    },
    /// The platform failed to produce a fix.
    Failed {
        /// The reported failure.
        error: LocationError,
    },
}

/// Observer adapter forwarding every notification into an unbounded
/// channel, decoupling consumers from the platform callback thread.
///
/// Keep the returned `Arc` alive for as long as events should flow; the
/// service holds its observer weakly. Events arriving after the receiving
/// side is gone are dropped with a warning.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: Sender<ServiceEvent>,
}

impl ChannelObserver {
    /// Create the adapter and the receiving end it feeds.
    #[must_use]
    pub fn unbounded() -> (Arc<Self>, Receiver<ServiceEvent>) {
        let (sender, receiver) = async_channel::unbounded();
        (Arc::new(Self { sender }), receiver)
    }

    fn forward(&self, event: ServiceEvent) {
        if let Err(err) = self.sender.try_send(event) {
            warn!("dropping location service event: {err}");
        }
    }
}

impl LocationServiceObserver for ChannelObserver {
    fn on_authorization_changed(&self, granted: bool) {
        self.forward(ServiceEvent::AuthorizationChanged { granted });
    }

    fn on_location_changed(&self, location: Location) {
        self.forward(ServiceEvent::LocationChanged { location });
    }

    fn on_failure(&self, error: &LocationError) {
        self.forward(ServiceEvent::Failed {
            error: error.clone(),
        });
    }
}
