use std::sync::Arc;
use std::time::Duration;

use async_channel::Receiver;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::api::{DeviceLocationAPI, NotificationAPI, Permission};
use crate::entities::{Coordinate, EmergencyContact, PositionFix, TrackingSession};
use crate::error::{invalid_invocation_error, permission_denied_error, Error};

const INTERPOLATION_INTERVAL: Duration = Duration::from_secs(1);
const INTERPOLATION_FRACTION: f64 = 0.1;
const ETA_INTERVAL: Duration = Duration::from_secs(60);
const ETA_STEP_SECONDS: u64 = 60;

// the interpolation approaches the user asymptotically and never lands
// exactly; inside this radius the counterparty counts as arrived
const ARRIVAL_THRESHOLD_METERS: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Uninitialized,
    PermissionPending,
    Tracking,
    Stopped,
}

/// Owns the live position/ETA model for an en-route vehicle.
///
/// Explicit `start()`/`stop()` lifecycle: `stop()` cancels the location
/// subscription and both periodic schedules in one deterministic call.
/// The session is mutated only by the tracker's own scheduled tasks.
pub struct LiveTracker {
    locations: Arc<dyn DeviceLocationAPI>,
    notifier: Arc<dyn NotificationAPI>,
    status: Mutex<Status>,
    session: Arc<Mutex<Option<TrackingSession>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    watch: Mutex<Option<Receiver<PositionFix>>>,
}

impl LiveTracker {
    pub fn new(locations: Arc<dyn DeviceLocationAPI>, notifier: Arc<dyn NotificationAPI>) -> Self {
        Self {
            locations,
            notifier,
            status: Mutex::new(Status::Uninitialized),
            session: Arc::new(Mutex::new(None)),
            tasks: Mutex::new(vec![]),
            watch: Mutex::new(None),
        }
    }

    /// Request location permission and, if granted, begin tracking the
    /// counterparty supplied by the caller (position and ETA are flavor data
    /// owned by the screen, not generated here).
    #[tracing::instrument(skip(self))]
    pub async fn start(
        &self,
        counterparty: Coordinate,
        eta_seconds: u64,
    ) -> Result<(), Error> {
        {
            let mut status = self.status.lock().await;
            match *status {
                Status::Uninitialized => *status = Status::PermissionPending,
                _ => return Err(invalid_invocation_error()),
            }
        }

        match self.locations.request_permission().await {
            Ok(Permission::Granted) => {}
            Ok(Permission::Denied) => {
                *self.status.lock().await = Status::Stopped;
                return Err(permission_denied_error());
            }
            Err(err) => {
                *self.status.lock().await = Status::Stopped;
                return Err(err);
            }
        }

        let fix = match self.locations.current_position().await {
            Ok(fix) => fix,
            Err(err) => {
                *self.status.lock().await = Status::Stopped;
                return Err(err);
            }
        };

        {
            let mut status = self.status.lock().await;

            // torn down while the permission flow was suspended
            if *status != Status::PermissionPending {
                return Err(invalid_invocation_error());
            }

            *status = Status::Tracking;
        }

        *self.session.lock().await =
            Some(TrackingSession::new(fix.coordinate, counterparty, eta_seconds));

        let rx = self.locations.watch_position();
        *self.watch.lock().await = Some(rx.clone());

        let mut tasks = self.tasks.lock().await;
        tasks.push(tokio::spawn(consume_fixes(rx, self.session.clone())));
        tasks.push(tokio::spawn(interpolate_counterparty(self.session.clone())));
        tasks.push(tokio::spawn(count_down_eta(self.session.clone())));

        tracing::info!("tracking started");

        Ok(())
    }

    /// Cancel the location subscription and both periodic schedules. Only
    /// after this returns is the tracker terminal.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), Error> {
        {
            let mut status = self.status.lock().await;
            match *status {
                Status::PermissionPending | Status::Tracking => *status = Status::Stopped,
                _ => return Err(invalid_invocation_error()),
            }
        }

        if let Some(rx) = self.watch.lock().await.take() {
            rx.close();
        }

        let tasks: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for task in &tasks {
            task.abort();
        }

        // wait the tasks out so the state is terminal once this returns
        futures::future::join_all(tasks).await;

        if let Some(session) = self.session.lock().await.as_mut() {
            session.active = false;
        }

        tracing::info!("tracking stopped");

        Ok(())
    }

    /// One-shot emergency fan-out. Available only while tracking; does not
    /// change the state machine. Best-effort: failures are logged, never
    /// surfaced.
    #[tracing::instrument(skip(self, contacts, message))]
    pub async fn trigger_panic(
        &self,
        contacts: Vec<EmergencyContact>,
        message: String,
    ) -> Result<(), Error> {
        if *self.status.lock().await != Status::Tracking {
            return Err(invalid_invocation_error());
        }

        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            if let Err(err) = notifier.notify(&contacts, &message).await {
                tracing::warn!(?err, "panic notification failed");
            }
        });

        Ok(())
    }

    pub async fn status(&self) -> Status {
        *self.status.lock().await
    }

    pub async fn session(&self) -> Option<TrackingSession> {
        self.session.lock().await.clone()
    }
}

async fn consume_fixes(rx: Receiver<PositionFix>, session: Arc<Mutex<Option<TrackingSession>>>) {
    while let Ok(fix) = rx.recv().await {
        if let Some(session) = session.lock().await.as_mut() {
            session.user_position = fix.coordinate;
        }
    }
}

async fn interpolate_counterparty(session: Arc<Mutex<Option<TrackingSession>>>) {
    let mut interval = tokio::time::interval(INTERPOLATION_INTERVAL);
    interval.tick().await; // the first tick resolves immediately

    loop {
        interval.tick().await;

        if let Some(session) = session.lock().await.as_mut() {
            session.counterparty_position = session
                .counterparty_position
                .move_toward(&session.user_position, INTERPOLATION_FRACTION);

            let remaining = session
                .counterparty_position
                .distance_meters(&session.user_position);

            if remaining <= ARRIVAL_THRESHOLD_METERS {
                session.arrived = true;
            }
        }
    }
}

async fn count_down_eta(session: Arc<Mutex<Option<TrackingSession>>>) {
    let mut interval = tokio::time::interval(ETA_INTERVAL);
    interval.tick().await;

    loop {
        interval.tick().await;

        let mut guard = session.lock().await;
        let Some(session) = guard.as_mut() else {
            continue;
        };

        if session.eta_seconds > ETA_STEP_SECONDS {
            session.eta_seconds -= ETA_STEP_SECONDS;
        } else {
            session.eta_seconds = 0;
            session.arrived = true;

            // terminal: the countdown stops, interpolation keeps running
            break;
        }
    }
}
