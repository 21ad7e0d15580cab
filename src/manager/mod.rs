//! Discovery, connection lifecycle, and event dispatch.
//!
//! The [`Manager`] owns the native discovery context and the single event
//! sink registered with it. Events arrive on the native delivery thread and
//! are re-dispatched to the registered [`EventObserver`] with a strict
//! ordering contract:
//!
//! - connect and ready-to-pair: the camera is added to the device list
//!   before the observer runs, so [`Manager::cameras`] already reports it.
//! - disconnect: the observer runs first, then the camera is removed, so the
//!   observer can still reach the device.
//! - error: the observer is notified and nothing else changes; only a
//!   disconnect event removes a camera.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::sdk::{CameraToken, EventSink, ManagerToken, NativeSdk, Status};

bitflags::bitflags! {
    /// Transports scanned for cameras.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DiscoveryMode: u32 {
        /// Discover cameras on USB.
        const USB = 0x01;
        /// Discover cameras on SPI.
        const SPI = 0x02;
    }
}

/// Connection lifecycle events delivered to the [`EventObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CameraEvent {
    /// A paired camera connected.
    Connect = 0,
    /// A camera disconnected.
    Disconnect = 1,
    /// A camera error occurred; the camera remains connected.
    Error = 2,
    /// An unpaired camera connected.
    ReadyToPair = 3,
}

impl CameraEvent {
    /// Maps a raw event value, returning `None` for unknown values.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(CameraEvent::Connect),
            1 => Some(CameraEvent::Disconnect),
            2 => Some(CameraEvent::Error),
            3 => Some(CameraEvent::ReadyToPair),
            _ => None,
        }
    }
}

impl fmt::Display for CameraEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraEvent::Connect => "connect",
            CameraEvent::Disconnect => "disconnect",
            CameraEvent::Error => "error",
            CameraEvent::ReadyToPair => "ready_to_pair",
        };
        f.write_str(name)
    }
}

/// Receiver for connection lifecycle events.
///
/// Invoked on the native delivery thread. `error` is `Some` exactly for
/// [`CameraEvent::Error`]. Closures with the matching signature implement
/// this trait directly.
pub trait EventObserver: Send + Sync {
    /// Called once per lifecycle event.
    fn on_event(&self, camera: &Camera, event: CameraEvent, error: Option<Error>);
}

impl<F> EventObserver for F
where
    F: Fn(&Camera, CameraEvent, Option<Error>) + Send + Sync,
{
    fn on_event(&self, camera: &Camera, event: CameraEvent, error: Option<Error>) {
        self(camera, event, error)
    }
}

struct State {
    cameras: Vec<Camera>,
    observer: Option<Arc<dyn EventObserver>>,
}

struct Shared {
    sdk: Arc<dyn NativeSdk>,
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dispatch(&self, token: CameraToken, event_raw: u32, status: Status) {
        let Some(event) = CameraEvent::from_raw(event_raw) else {
            tracing::warn!(raw = event_raw, "dropping unknown camera event");
            return;
        };
        match event {
            CameraEvent::Connect | CameraEvent::ReadyToPair => self.attach(token, event),
            CameraEvent::Disconnect => self.detach(token),
            CameraEvent::Error => self.report(token, status),
        }
    }

    fn attach(&self, token: CameraToken, event: CameraEvent) {
        let camera = match Camera::bind(self.sdk.clone(), token) {
            Ok(camera) => camera,
            Err(err) => {
                tracing::warn!(?token, %err, "failed to bind connecting camera");
                return;
            }
        };
        tracing::info!(camera = %camera, %event, "camera attached");
        let observer = {
            let mut state = self.lock();
            state.cameras.push(camera.clone());
            state.observer.clone()
        };
        // Guard released: the observer may call back into this manager.
        if let Some(observer) = observer {
            observer.on_event(&camera, event, None);
        }
    }

    fn detach(&self, token: CameraToken) {
        let (camera, observer) = {
            let state = self.lock();
            let Some(camera) = state.cameras.iter().find(|c| c.token() == token) else {
                tracing::warn!(?token, "disconnect for unknown camera");
                return;
            };
            (camera.clone(), state.observer.clone())
        };
        tracing::info!(camera = %camera, "camera detached");
        // The observer sees the camera while it is still listed.
        if let Some(observer) = observer {
            observer.on_event(&camera, CameraEvent::Disconnect, None);
        }
        self.lock().cameras.retain(|c| *c != camera);
    }

    fn report(&self, token: CameraToken, status: Status) {
        let (camera, observer) = {
            let state = self.lock();
            let Some(camera) = state.cameras.iter().find(|c| c.token() == token) else {
                tracing::warn!(?token, code = status.code(), "error event for unknown camera");
                return;
            };
            (camera.clone(), state.observer.clone())
        };
        let error = Error::from_status(status);
        tracing::warn!(camera = %camera, %error, "camera reported an error");
        if let Some(observer) = observer {
            observer.on_event(&camera, CameraEvent::Error, Some(error));
        }
    }
}

/// Owner of the native discovery context and the device list.
///
/// Dropping a manager destroys the native context; [`Manager::destroy`] does
/// the same but surfaces the native status.
pub struct Manager {
    shared: Arc<Shared>,
    token: ManagerToken,
    destroyed: bool,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("token", &self.token)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Manager {
    /// Creates the discovery context and starts listening for lifecycle
    /// events on the given transports.
    pub fn create(sdk: Arc<dyn NativeSdk>, discovery: DiscoveryMode) -> Result<Self> {
        let token = sdk.manager_create(discovery.bits())?;
        let shared = Arc::new(Shared {
            sdk: sdk.clone(),
            state: Mutex::new(State {
                cameras: Vec::new(),
                observer: None,
            }),
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let sink: EventSink = Box::new(move |camera, event, status| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(camera, event, status);
            }
        });
        if let Err(status) = sdk.manager_register_event_callback(token, sink) {
            let _ = sdk.manager_destroy(token);
            return Err(status.into());
        }

        tracing::info!(?token, ?discovery, "camera manager created");
        Ok(Manager {
            shared,
            token,
            destroyed: false,
        })
    }

    /// Registers the lifecycle observer, silently replacing any previous
    /// registration. Events arriving while no observer is registered still
    /// update the device list but are not delivered.
    pub fn register_event_callback(&self, observer: impl EventObserver + 'static) {
        self.shared.lock().observer = Some(Arc::new(observer));
    }

    /// Snapshot of the cameras currently known to the manager.
    pub fn cameras(&self) -> Vec<Camera> {
        self.shared.lock().cameras.clone()
    }

    /// Destroys the native context, surfacing the native status.
    pub fn destroy(mut self) -> Result<()> {
        self.destroyed = true;
        tracing::info!(token = ?self.token, "camera manager destroyed");
        Ok(self.shared.sdk.manager_destroy(self.token)?)
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        if !self.destroyed {
            let _ = self.shared.sdk.manager_destroy(self.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::camera::ChipId;
    use crate::sdk::MockSdk;

    type EventLog = Arc<Mutex<Vec<(ChipId, CameraEvent, Option<Error>, usize)>>>;

    // Records each event along with the device-list length observed during
    // the callback, which is what the ordering contract is about.
    fn recording_observer(manager: &Arc<Manager>, log: &EventLog) -> impl EventObserver {
        let manager = manager.clone();
        let log = log.clone();
        move |camera: &Camera, event: CameraEvent, error: Option<Error>| {
            log.lock()
                .unwrap()
                .push((camera.chip_id(), event, error, manager.cameras().len()));
        }
    }

    #[test]
    fn test_connect_lists_camera_before_callback() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Arc::new(Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap());
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        manager.register_event_callback(recording_observer(&manager, &log));

        sdk.connect("ABC123");

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![(ChipId::from("ABC123"), CameraEvent::Connect, None, 1)]
        );
        assert_eq!(manager.cameras().len(), 1);
        assert_eq!(manager.cameras()[0].chip_id(), ChipId::from("ABC123"));
    }

    #[test]
    fn test_disconnect_callback_runs_before_removal() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Arc::new(Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap());
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        manager.register_event_callback(recording_observer(&manager, &log));

        let camera = sdk.connect("ABC123");
        sdk.disconnect(camera);

        let events = log.lock().unwrap().clone();
        assert_eq!(events.len(), 2);
        // Still listed while the disconnect callback observes it.
        assert_eq!(
            events[1],
            (ChipId::from("ABC123"), CameraEvent::Disconnect, None, 1)
        );
        assert!(manager.cameras().is_empty());
    }

    #[test]
    fn test_error_event_carries_error_and_mutates_nothing() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Arc::new(Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap());
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        manager.register_event_callback(recording_observer(&manager, &log));

        let camera = sdk.connect("ABC123");
        sdk.emit_error(camera, crate::sdk::Status::new(-7));

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events[1],
            (
                ChipId::from("ABC123"),
                CameraEvent::Error,
                Some(Error::Timeout),
                1
            )
        );
        assert_eq!(manager.cameras().len(), 1);
    }

    #[test]
    fn test_ready_to_pair_is_listed_like_connect() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Arc::new(Manager::create(sdk.clone(), DiscoveryMode::all()).unwrap());
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        manager.register_event_callback(recording_observer(&manager, &log));

        sdk.ready_to_pair("UNPAIRED01");

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![(
                ChipId::from("UNPAIRED01"),
                CameraEvent::ReadyToPair,
                None,
                1
            )]
        );
    }

    #[test]
    fn test_registration_silently_replaces_previous_observer() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap();

        let first: EventLog = Arc::new(Mutex::new(Vec::new()));
        let second: EventLog = Arc::new(Mutex::new(Vec::new()));
        let first_log = first.clone();
        manager.register_event_callback(
            move |camera: &Camera, event: CameraEvent, error: Option<Error>| {
                first_log
                    .lock()
                    .unwrap()
                    .push((camera.chip_id(), event, error, 0));
            },
        );
        let second_log = second.clone();
        manager.register_event_callback(
            move |camera: &Camera, event: CameraEvent, error: Option<Error>| {
                second_log
                    .lock()
                    .unwrap()
                    .push((camera.chip_id(), event, error, 0));
            },
        );

        sdk.connect("ABC123");
        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_events_without_observer_still_update_device_list() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap();
        sdk.connect("ABC123");
        assert_eq!(manager.cameras().len(), 1);
    }

    #[test]
    fn test_destroy_releases_native_context() {
        let sdk = Arc::new(MockSdk::new());
        let manager = Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap();
        let token = manager.token;
        assert!(sdk.manager_alive(token));
        manager.destroy().unwrap();
        assert!(!sdk.manager_alive(token));
    }

    #[test]
    fn test_drop_releases_native_context() {
        let sdk = Arc::new(MockSdk::new());
        let token = {
            let manager = Manager::create(sdk.clone(), DiscoveryMode::USB).unwrap();
            manager.token
        };
        assert!(!sdk.manager_alive(token));
    }
}
