//! Simulated walkthrough for geokit-location.
//!
//! Drives the service through a scripted platform source: first launch,
//! permission grant, a couple of fixes, a failure, and the cache fallback.
//!
//! Run with: cargo run -p geokit-location-sim

use std::sync::{Arc, Mutex, Weak};

use geokit_location::{
    ChannelObserver, Location, LocationError, LocationService, LocationSource, MemoryStore,
    ServiceEvent, SourceDelegate, SourceEvent,
};
use geokit_permission::PermissionStatus;

/// A platform source driven by the script in `main` instead of hardware.
struct ScriptedSource {
    status: Mutex<PermissionStatus>,
    last_fix: Mutex<Option<Location>>,
    delegate: Mutex<Option<Weak<dyn SourceDelegate>>>,
}

impl ScriptedSource {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(PermissionStatus::NotDetermined),
            last_fix: Mutex::new(None),
            delegate: Mutex::new(None),
        })
    }

    fn emit(&self, event: SourceEvent) {
        let delegate = self.delegate.lock().unwrap().clone();
        if let Some(delegate) = delegate.and_then(|delegate| delegate.upgrade()) {
            delegate.on_event(event);
        }
    }

    /// The user answers the system permission sheet.
    fn grant(&self, status: PermissionStatus) {
        *self.status.lock().unwrap() = status;
        self.emit(SourceEvent::AuthorizationChanged { status });
    }

    /// The platform streams one fix and keeps it as its live reading.
    fn fix(&self, latitude: f64, longitude: f64) {
        let location = Location::new(latitude, longitude);
        *self.last_fix.lock().unwrap() = Some(location);
        self.emit(SourceEvent::Updated {
            locations: vec![location],
        });
    }

    fn fail(&self, error: LocationError) {
        self.emit(SourceEvent::Failed { error });
    }

    /// The platform forgets its live reading (e.g. after a relaunch).
    fn drop_live_fix(&self) {
        *self.last_fix.lock().unwrap() = None;
    }
}

impl LocationSource for ScriptedSource {
    fn set_delegate(&self, delegate: Weak<dyn SourceDelegate>) {
        *self.delegate.lock().unwrap() = Some(delegate);
    }

    fn current_status(&self) -> PermissionStatus {
        *self.status.lock().unwrap()
    }

    fn request_authorization(&self) {
        println!("[platform] permission sheet requested");
    }

    fn start_continuous_updates(&self) {
        println!("[platform] continuous updates started");
    }

    fn stop_continuous_updates(&self) {
        println!("[platform] continuous updates stopped");
    }

    fn request_single_fix(&self) {
        println!("[platform] single fix requested");
    }

    fn last_fix(&self) -> Option<Location> {
        *self.last_fix.lock().unwrap()
    }
}

#[tokio::main]
async fn main() {
    println!("=== Geokit Location Walkthrough (simulated) ===\n");

    let source = ScriptedSource::new();
    let store = Arc::new(MemoryStore::new());
    let service = LocationService::new(source.clone(), store);

    let (observer, events) = ChannelObserver::unbounded();
    service.set_observer(observer.clone());

    // First launch: nothing decided yet.
    println!("Starting monitoring with status NotDetermined...");
    service.start_monitoring(true);
    println!("Current location: {:?}\n", service.current_location());

    // A one-shot request parked until the first fix arrives.
    let token = Arc::new(());
    service.register_listener(token.clone(), |outcome| match outcome {
        Ok(location) => println!("[listener] ✓ resolved: {:?}", location),
        Err(e) => println!("[listener] ✗ failed: {}", e),
    });

    // The user grants while-in-use access and the platform streams a fix.
    println!("User grants when-in-use access...");
    source.grant(PermissionStatus::GrantedWhenInUse);
    source.fix(48.8584, 2.2945);
    println!("Current location: {:?}\n", service.current_location());

    // A transient failure; the cache keeps serving afterwards.
    println!("Platform reports a timeout...");
    source.fail(LocationError::Timeout);
    source.drop_live_fix();
    println!("Current location (from cache): {:?}\n", service.current_location());

    service.stop_monitoring();

    // Drain everything the observer saw, in order.
    drop(observer);
    println!("\nObserver saw:");
    while let Ok(event) = events.recv().await {
        match event {
            ServiceEvent::AuthorizationChanged { granted } => {
                println!("  authorization granted: {}", granted);
            }
            ServiceEvent::LocationChanged { location } => {
                println!("  location changed: {:?}", location);
            }
            ServiceEvent::Failed { error } => {
                println!("  failure: {}", error);
            }
        }
    }

    drop(token);
    println!("\nDone.");
}
