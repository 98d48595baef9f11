//! The device-location service.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use geokit_permission::PermissionStatus;
use log::{debug, warn};

use crate::registry::{DrainedListeners, ListenerRegistry};
use crate::{
    Location, LocationError, LocationServiceObserver, LocationSource, LocationStore,
    PermissionPrompt, PermissionPromptHost, PromptOutcome, SourceDelegate, SourceEvent,
    UpdateConfig, STORED_LOCATION_KEY,
};

/// Tracks permission state, keeps the best-known location, and fans
/// changes out to an observer.
///
/// All methods are synchronous and non-blocking: each either acts
/// immediately or leaves the rest to a later platform event. The service
/// expects platform events one at a time, in arrival order, per
/// [`SourceDelegate::on_event`].
///
/// The service lives in an [`Arc`]; construction registers it as the
/// source's (weakly held) event delegate.
pub struct LocationService {
    source: Arc<dyn LocationSource>,
    store: Arc<dyn LocationStore>,
    observer: Mutex<Option<Weak<dyn LocationServiceObserver>>>,
    prompt_host: Mutex<Option<Weak<dyn PermissionPromptHost>>>,
    listeners: Mutex<ListenerRegistry>,
    // handed to prompt responders so their answers can find the way back
    self_handle: Weak<Self>,
}

impl fmt::Debug for LocationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService").finish_non_exhaustive()
    }
}

impl LocationService {
    /// Build a service over `source` and `store` with the default
    /// [`UpdateConfig`] and register it as the source's event delegate.
    #[must_use]
    pub fn new(source: Arc<dyn LocationSource>, store: Arc<dyn LocationStore>) -> Arc<Self> {
        Self::with_config(source, store, UpdateConfig::default())
    }

    /// Build a service with an explicit stream configuration.
    #[must_use]
    pub fn with_config(
        source: Arc<dyn LocationSource>,
        store: Arc<dyn LocationStore>,
        config: UpdateConfig,
    ) -> Arc<Self> {
        let service = Arc::new_cyclic(|handle| Self {
            source,
            store,
            observer: Mutex::new(None),
            prompt_host: Mutex::new(None),
            listeners: Mutex::new(ListenerRegistry::default()),
            self_handle: handle.clone(),
        });

        service.source.configure(config);
        let delegate: Weak<dyn SourceDelegate> = service.self_handle.clone();
        service.source.set_delegate(delegate);
        service
    }

    /// Register the observer that receives change notifications.
    ///
    /// Only one observer is held at a time, and only weakly: dropping the
    /// observer elsewhere silently ends the notifications.
    pub fn set_observer(&self, observer: Arc<dyn LocationServiceObserver>) {
        let mut slot = self.observer.lock().expect("observer mutex poisoned");
        *slot = Some(Arc::downgrade(&observer));
    }

    /// Detach the current observer, if any.
    pub fn clear_observer(&self) {
        let mut slot = self.observer.lock().expect("observer mutex poisoned");
        *slot = None;
    }

    /// Register the host asked for prompt presentation surfaces.
    ///
    /// Held weakly, like the observer.
    pub fn set_prompt_host(&self, host: Arc<dyn PermissionPromptHost>) {
        let mut slot = self.prompt_host.lock().expect("prompt host mutex poisoned");
        *slot = Some(Arc::downgrade(&host));
    }

    /// Detach the prompt host; future prompts are skipped.
    pub fn clear_prompt_host(&self) {
        let mut slot = self.prompt_host.lock().expect("prompt host mutex poisoned");
        *slot = None;
    }

    /// Start monitoring, driven by the current authorization status.
    ///
    /// - Not determined: ask the platform to request authorization; the
    ///   rest happens when the status-change event arrives.
    /// - Granted: start the continuous stream, request one immediate fix,
    ///   and notify the observer that access is granted.
    /// - Denied or restricted: when `notify` is true, present the matching
    ///   prompt; otherwise do nothing observable.
    pub fn start_monitoring(&self, notify: bool) {
        let status = self.source.current_status();
        match status {
            PermissionStatus::NotDetermined => self.source.request_authorization(),
            PermissionStatus::GrantedWhenInUse | PermissionStatus::GrantedAlways => {
                debug!("starting location updates ({status:?})");
                self.source.start_continuous_updates();
                self.source.request_single_fix();
                self.notify_authorization(status);
            }
            PermissionStatus::Denied => {
                if notify {
                    self.present_prompt(PermissionPrompt::Denied);
                }
            }
            PermissionStatus::Restricted => {
                if notify {
                    self.present_prompt(PermissionPrompt::Restricted);
                }
            }
        }
    }

    /// Stop the continuous update stream.
    ///
    /// Leaves the cached location, pending listeners, and permission state
    /// untouched; a later update still resolves parked listeners.
    pub fn stop_monitoring(&self) {
        debug!("stopping location updates");
        self.source.stop_continuous_updates();
    }

    /// Whether the current authorization status allows location access.
    #[must_use]
    pub fn status_granted(&self) -> bool {
        self.source.current_status().is_authorized()
    }

    /// The best-known location: the platform's live reading when present,
    /// else the persisted cache, else `None`.
    ///
    /// A pure read. Never prompts, never requests a new fix.
    #[must_use]
    pub fn current_location(&self) -> Option<Location> {
        self.source.last_fix().or_else(|| self.stored_location())
    }

    /// Resolve `listener` with the next available location.
    ///
    /// If a location is already available it is delivered synchronously,
    /// before this call returns, and nothing is retained. Otherwise the
    /// listener is parked under `key`'s identity until the next terminal
    /// event: a location update delivers `Ok` (the most recent fix of the
    /// batch), a failure delivers `Err`. Either way the listener fires at
    /// most once and is forgotten afterwards.
    ///
    /// `key` is an identity, not a name: the allocation behind the `Arc`
    /// identifies the registration. Parking a second listener under the
    /// same identity replaces the first, which is dropped uninvoked. The
    /// registry holds `key` weakly; once the caller's token is gone the
    /// parked listener is discarded instead of invoked.
    pub fn register_listener<F>(&self, key: Arc<dyn Any + Send + Sync>, listener: F)
    where
        F: FnOnce(Result<Location, LocationError>) + Send + 'static,
    {
        if let Some(location) = self.current_location() {
            listener(Ok(location));
            return;
        }

        let mut listeners = self.listeners.lock().expect("listener mutex poisoned");
        listeners.insert(&key, Box::new(listener));
    }

    /// Discard the unresolved listener parked under `key`'s identity, if
    /// any, without invoking it.
    pub fn deregister_listener(&self, key: &Arc<dyn Any + Send + Sync>) {
        let mut listeners = self.listeners.lock().expect("listener mutex poisoned");
        listeners.remove(key);
    }

    /// Drop the persisted cache record.
    ///
    /// Only the relaunch-survival copy is cleared; a live platform reading
    /// still satisfies [`Self::current_location`].
    pub fn reset_cached_location(&self) {
        if let Err(err) = self.store.reset(STORED_LOCATION_KEY) {
            warn!("failed to reset stored location: {err}");
        }
    }

    fn stored_location(&self) -> Option<Location> {
        match self.store.retrieve(STORED_LOCATION_KEY) {
            Ok(location) => location,
            Err(err) => {
                warn!("failed to read stored location: {err}");
                None
            }
        }
    }

    fn observer(&self) -> Option<Arc<dyn LocationServiceObserver>> {
        let slot = self.observer.lock().expect("observer mutex poisoned");
        slot.as_ref().and_then(Weak::upgrade)
    }

    fn prompt_host(&self) -> Option<Arc<dyn PermissionPromptHost>> {
        let slot = self.prompt_host.lock().expect("prompt host mutex poisoned");
        slot.as_ref().and_then(Weak::upgrade)
    }

    /// Announce `status`'s granted projection, if it has one.
    fn notify_authorization(&self, status: PermissionStatus) {
        let Some(granted) = status.granted() else {
            return;
        };
        if let Some(observer) = self.observer() {
            observer.on_authorization_changed(granted);
        }
    }

    fn present_prompt(&self, prompt: PermissionPrompt) {
        let Some(host) = self.prompt_host() else {
            debug!("skipping {prompt:?} prompt: no prompt host");
            return;
        };
        let Some(surface) = host.presentation_surface() else {
            debug!("skipping {prompt:?} prompt: no presentation surface");
            return;
        };

        let service = self.self_handle.clone();
        surface.present(
            prompt,
            Box::new(move |outcome| {
                if let Some(service) = service.upgrade() {
                    service.prompt_resolved(prompt, outcome);
                }
            }),
        );
    }

    fn prompt_resolved(&self, prompt: PermissionPrompt, outcome: PromptOutcome) {
        match outcome {
            PromptOutcome::OpenSettings => {
                if let Some(host) = self.prompt_host() {
                    host.open_settings();
                }
            }
            // Dismissing the denied prompt re-reads and re-announces the
            // live status; the restricted prompt is informational only.
            PromptOutcome::Dismissed => {
                if prompt == PermissionPrompt::Denied {
                    self.notify_authorization(self.source.current_status());
                }
            }
        }
    }

    fn authorization_changed(&self, status: PermissionStatus) {
        debug!("location authorization changed: {status:?}");

        if status.is_authorized() {
            self.source.start_continuous_updates();
            self.source.request_single_fix();
        }

        self.notify_authorization(status);
    }

    fn locations_updated(&self, locations: &[Location]) {
        // Last fix wins within a batch; an empty batch is a non-event.
        let Some(location) = locations.last().copied() else {
            return;
        };

        if let Err(err) = self.store.save(&location, STORED_LOCATION_KEY) {
            warn!("failed to persist location: {err}");
        }

        self.drain_listeners().resolve(&Ok(location));

        if let Some(observer) = self.observer() {
            observer.on_location_changed(location);
        }
    }

    fn fix_failed(&self, error: &LocationError) {
        warn!("location fix failed: {error}");

        self.drain_listeners().resolve(&Err(error.clone()));

        if let Some(observer) = self.observer() {
            observer.on_failure(error);
        }
    }

    /// Swap the whole pending set out under the lock; resolution then runs
    /// with the lock released, so callbacks may re-register freely.
    fn drain_listeners(&self) -> DrainedListeners {
        let mut listeners = self.listeners.lock().expect("listener mutex poisoned");
        listeners.take_all()
    }
}

impl SourceDelegate for LocationService {
    fn on_event(&self, event: SourceEvent) {
        match event {
            SourceEvent::AuthorizationChanged { status } => self.authorization_changed(status),
            SourceEvent::Updated { locations } => self.locations_updated(&locations),
            SourceEvent::Failed { error } => self.fix_failed(&error),
        }
    }
}
