// Notification inbox, toast queue and simulated push timers

use crate::model::{Notification, NotificationKind};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

// Inbox shown in the bell panel, newest first
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_notifications())
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub fn default_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "n1".to_string(),
            title: "Booking confirmed".to_string(),
            message: "Your Hoi An food tour is confirmed for Saturday.".to_string(),
            kind: NotificationKind::Info,
            time: "2h".to_string(),
            read: false,
        },
        Notification {
            id: "n2".to_string(),
            title: "Weekend deal".to_string(),
            message: "Da Nang beach resorts up to 30% off this weekend.".to_string(),
            kind: NotificationKind::Promo,
            time: "1d".to_string(),
            read: true,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.queue.push(Toast {
            id,
            message: message.into(),
            kind,
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> &[Toast] {
        &self.queue
    }
}

// A delivered push: the inbox entry plus the banner text shown as a toast
#[derive(Debug, Clone, PartialEq)]
pub struct Push {
    pub notification: Notification,
    pub banner: String,
}

#[derive(Debug, Clone)]
pub struct ScheduledPush {
    pub delay: Duration,
    pub push: Push,
}

// The two pushes the app simulates after start-up
pub fn default_pushes() -> Vec<ScheduledPush> {
    let stamp = Utc::now().timestamp_millis();
    vec![
        ScheduledPush {
            delay: Duration::from_secs(8),
            push: Push {
                banner: "VietJet zero-fare tickets!".to_string(),
                notification: Notification {
                    id: format!("push-{}", stamp),
                    title: "VietJet zero-fare tickets!".to_string(),
                    message: "Golden hour 12h-14h today only. Limited seats.".to_string(),
                    kind: NotificationKind::Alert,
                    time: "Just now".to_string(),
                    read: false,
                },
            },
        },
        ScheduledPush {
            delay: Duration::from_secs(20),
            push: Push {
                banner: "New message from the Weather Assistant".to_string(),
                notification: Notification {
                    id: format!("push-weather-{}", stamp),
                    title: "Da Lat weather forecast".to_string(),
                    message: "Drizzle and 14°C this weekend in Da Lat. Pack something warm."
                        .to_string(),
                    kind: NotificationKind::Info,
                    time: "Just now".to_string(),
                    read: false,
                },
            },
        },
    ]
}

// Owns the timer tasks delivering simulated pushes. Dropping it cancels
// every timer that has not fired yet.
pub struct PushSimulator {
    timers: Vec<JoinHandle<()>>,
}

impl PushSimulator {
    // Must be called inside a tokio runtime
    pub fn start(pushes: Vec<ScheduledPush>) -> (Self, mpsc::UnboundedReceiver<Push>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = pushes
            .into_iter()
            .map(|scheduled| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(scheduled.delay).await;
                    debug!("Delivering simulated push {}", scheduled.push.notification.id);
                    let _ = tx.send(scheduled.push);
                })
            })
            .collect();
        (Self { timers }, rx)
    }

    pub fn cancel(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| !t.is_finished()).count()
    }
}

impl Drop for PushSimulator {
    fn drop(&mut self) {
        self.cancel();
    }
}

// Flash-sale countdown shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    pub const FLASH_SALE: Countdown = Countdown::new(12, 30, 45);

    pub const fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    // One second less, borrowing from minutes and hours; stays at zero
    pub fn tick(self) -> Self {
        if self.is_finished() {
            return self;
        }
        let Countdown {
            mut hours,
            mut minutes,
            mut seconds,
        } = self;
        if seconds > 0 {
            seconds -= 1;
        } else {
            seconds = 59;
            if minutes > 0 {
                minutes -= 1;
            } else {
                minutes = 59;
                hours -= 1;
            }
        }
        Self::new(hours, minutes, seconds)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

// Interval task ticking a countdown once per period until it reaches zero.
// Cancelled on `cancel()` and on drop, like `PushSimulator`.
pub struct CountdownTimer {
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn start(from: Countdown, period: Duration) -> (Self, watch::Receiver<Countdown>) {
        let (tx, rx) = watch::channel(from);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // first tick completes immediately
            interval.tick().await;
            let mut current = from;
            while !current.is_finished() {
                interval.tick().await;
                current = current.tick();
                if tx.send(current).is_err() {
                    return;
                }
            }
            debug!("Countdown reached zero");
        });
        (Self { task: Some(task) }, rx)
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_all_read() {
        let mut center = NotificationCenter::with_defaults();
        assert_eq!(center.unread_count(), 1);
        center.push(default_pushes().remove(0).push.notification);
        assert_eq!(center.unread_count(), 2);
        assert!(center.items()[0].id.starts_with("push-"));

        center.mark_all_read();
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_toasts() {
        let mut toasts = Toasts::default();
        let a = toasts.add("Saved", ToastKind::Success);
        let b = toasts.add("No results", ToastKind::Info);
        assert_ne!(a, b);
        assert!(toasts.remove(a));
        assert!(!toasts.remove(a));
        assert_eq!(toasts.pending().len(), 1);
        assert_eq!(toasts.pending()[0].message, "No results");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pushes_arrive_in_order() {
        let (_sim, mut rx) = PushSimulator::start(default_pushes());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.notification.kind, NotificationKind::Alert);
        assert_eq!(first.banner, first.notification.title);
        let second = rx.recv().await.unwrap();
        assert!(second.notification.id.starts_with("push-weather-"));
        assert_eq!(second.banner, "New message from the Weather Assistant");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_pushes() {
        let (mut sim, mut rx) = PushSimulator::start(default_pushes());
        sim.cancel();
        assert_eq!(sim.pending(), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        // every sender was dropped with its aborted task
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_countdown_tick_borrows() {
        assert_eq!(Countdown::new(1, 0, 0).tick(), Countdown::new(0, 59, 59));
        assert_eq!(Countdown::new(0, 1, 0).tick(), Countdown::new(0, 0, 59));
        assert_eq!(Countdown::new(0, 0, 1).tick(), Countdown::new(0, 0, 0));
        assert_eq!(Countdown::FLASH_SALE.tick(), Countdown::new(12, 30, 44));
        assert_eq!(Countdown::new(0, 0, 0).tick(), Countdown::new(0, 0, 0));
        assert_eq!(Countdown::new(3, 5, 9).to_string(), "03:05:09");
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_timer_runs_to_zero() {
        let (timer, rx) =
            CountdownTimer::start(Countdown::new(0, 1, 2), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(*rx.borrow(), Countdown::new(0, 0, 59));
        assert!(timer.is_running());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.borrow().is_finished());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_timer_cancel() {
        let (mut timer, rx) =
            CountdownTimer::start(Countdown::FLASH_SALE, Duration::from_secs(1));
        timer.cancel();
        assert!(!timer.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(*rx.borrow(), Countdown::FLASH_SALE);
    }
}
