//! Live-tracker lifecycle: permission handling, interpolation and ETA
//! schedules, teardown, and the panic fan-out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use reboque::api::{DeviceLocationAPI, NotificationAPI, Permission};
use reboque::entities::{Coordinate, EmergencyContact, PositionFix};
use reboque::error::Error;
use reboque::tracker::{LiveTracker, Status};

const USER: Coordinate = Coordinate {
    latitude: -23.5505,
    longitude: -46.6333,
};

const DRIVER: Coordinate = Coordinate {
    latitude: -23.5605,
    longitude: -46.6433,
};

fn fix_at(coordinate: Coordinate) -> PositionFix {
    PositionFix {
        coordinate,
        accuracy: 5.0,
        timestamp: Utc::now(),
    }
}

struct FakeLocations {
    permission: Permission,
    tx: Sender<PositionFix>,
    rx: Receiver<PositionFix>,
}

impl FakeLocations {
    fn new(permission: Permission) -> Arc<Self> {
        let (tx, rx) = async_channel::unbounded();
        Arc::new(Self { permission, tx, rx })
    }
}

#[async_trait]
impl DeviceLocationAPI for FakeLocations {
    async fn request_permission(&self) -> Result<Permission, Error> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<PositionFix, Error> {
        Ok(fix_at(USER))
    }

    fn watch_position(&self) -> Receiver<PositionFix> {
        self.rx.clone()
    }
}

#[derive(Default)]
struct FakeNotifier {
    deliveries: AtomicUsize,
    last_message: Mutex<Option<String>>,
}

#[async_trait]
impl NotificationAPI for FakeNotifier {
    async fn notify(&self, contacts: &[EmergencyContact], message: &str) -> Result<(), Error> {
        assert!(!contacts.is_empty());
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().await = Some(message.to_string());
        Ok(())
    }
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn permission_denial_stops_the_tracker_before_it_starts() {
    let tracker = LiveTracker::new(
        FakeLocations::new(Permission::Denied),
        Arc::new(FakeNotifier::default()),
    );

    let err = tracker.start(DRIVER, 480).await.unwrap_err();
    assert_eq!(err.code, 103);
    assert_eq!(tracker.status().await, Status::Stopped);
    assert!(tracker.session().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn interpolation_moves_ten_percent_of_the_remaining_distance() {
    let tracker = LiveTracker::new(
        FakeLocations::new(Permission::Granted),
        Arc::new(FakeNotifier::default()),
    );

    tracker.start(DRIVER, 480).await.unwrap();
    assert_eq!(tracker.status().await, Status::Tracking);
    settle().await;

    let before = tracker.session().await.unwrap();
    let gap_before = before.counterparty_position.distance_meters(&before.user_position);

    tokio::time::advance(Duration::from_secs(1)).await;
    settle().await;

    let after = tracker.session().await.unwrap();
    let gap_after = after.counterparty_position.distance_meters(&after.user_position);

    assert!((gap_after / gap_before - 0.9).abs() < 0.01);
    assert!(!after.arrived);

    tracker.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn counterparty_close_enough_counts_as_arrived() {
    let tracker = LiveTracker::new(
        FakeLocations::new(Permission::Granted),
        Arc::new(FakeNotifier::default()),
    );

    // ~15 m away: two 10% steps stay out, many steps converge under 5 m
    let nearby = Coordinate {
        latitude: USER.latitude + 0.000135,
        longitude: USER.longitude,
    };

    tracker.start(nearby, 480).await.unwrap();
    settle().await;

    for _ in 0..30 {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }

    let session = tracker.session().await.unwrap();
    let gap = session.counterparty_position.distance_meters(&session.user_position);
    assert!(gap <= 5.0);
    assert!(session.arrived);

    tracker.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn eta_reaches_zero_and_the_countdown_stops() {
    let tracker = LiveTracker::new(
        FakeLocations::new(Permission::Granted),
        Arc::new(FakeNotifier::default()),
    );

    // one unit on the countdown
    tracker.start(DRIVER, 60).await.unwrap();
    settle().await;

    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;

    let session = tracker.session().await.unwrap();
    assert_eq!(session.eta_seconds, 0);
    assert!(session.arrived);

    // a further tick must not underflow past zero
    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(tracker.session().await.unwrap().eta_seconds, 0);

    tracker.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn incoming_fixes_update_the_user_position() {
    let locations = FakeLocations::new(Permission::Granted);
    let tracker = LiveTracker::new(locations.clone(), Arc::new(FakeNotifier::default()));

    tracker.start(DRIVER, 480).await.unwrap();
    settle().await;

    let moved = Coordinate {
        latitude: -23.5550,
        longitude: -46.6380,
    };
    locations.tx.send(fix_at(moved)).await.unwrap();
    settle().await;

    assert_eq!(tracker.session().await.unwrap().user_position, moved);

    tracker.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_subscription_and_schedules() {
    let locations = FakeLocations::new(Permission::Granted);
    let tracker = LiveTracker::new(locations.clone(), Arc::new(FakeNotifier::default()));

    tracker.start(DRIVER, 480).await.unwrap();
    settle().await;

    tracker.stop().await.unwrap();
    settle().await;

    assert_eq!(tracker.status().await, Status::Stopped);

    let session = tracker.session().await.unwrap();
    assert!(!session.active);

    // the watch channel was closed on teardown
    assert!(locations.tx.send(fix_at(USER)).await.is_err());

    // the schedules no longer mutate the session
    let frozen = session.counterparty_position;
    tokio::time::advance(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(
        tracker.session().await.unwrap().counterparty_position,
        frozen
    );

    // stopping twice is an invalid invocation
    assert!(tracker.stop().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn panic_trigger_fans_out_only_while_tracking() {
    let notifier = Arc::new(FakeNotifier::default());
    let tracker = LiveTracker::new(FakeLocations::new(Permission::Granted), notifier.clone());

    let contacts = vec![EmergencyContact {
        name: "Maria".into(),
        phone: "+55 11 91234-5678".into(),
    }];

    // not tracking yet
    assert!(tracker
        .trigger_panic(contacts.clone(), "socorro".into())
        .await
        .is_err());

    tracker.start(DRIVER, 480).await.unwrap();
    settle().await;

    tracker
        .trigger_panic(contacts.clone(), "socorro".into())
        .await
        .unwrap();
    settle().await;

    assert_eq!(notifier.deliveries.load(Ordering::SeqCst), 1);
    assert_eq!(
        notifier.last_message.lock().await.as_deref(),
        Some("socorro")
    );

    // tracking state is unchanged by the side action
    assert_eq!(tracker.status().await, Status::Tracking);

    tracker.stop().await.unwrap();

    // and unavailable after teardown
    assert!(tracker
        .trigger_panic(contacts, "socorro".into())
        .await
        .is_err());
}
