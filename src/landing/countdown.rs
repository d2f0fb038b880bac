use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

pub const CLOSED_MESSAGE: &str = "Enrollment Closed";
pub const ERROR_MESSAGE: &str = "Timer Error";
pub const TICK: Duration = Duration::from_secs(1);

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const ENROLLMENT_WINDOW_DAYS: i64 = 30;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    fn from_millis(ms: i64) -> Self {
        Self {
            days: ms / 86_400_000,
            hours: (ms % 86_400_000) / 3_600_000,
            minutes: (ms % 3_600_000) / 60_000,
            seconds: (ms % 60_000) / 1000,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{:02}D : {:02}H : {:02}M : {:02}S",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(Remaining),
    Closed,
}

impl Tick {
    pub fn render(&self) -> String {
        match self {
            Tick::Remaining(r) => r.render(),
            Tick::Closed => CLOSED_MESSAGE.to_string(),
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` in local time, or a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_target(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT) {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| anyhow!("'{}' does not exist in the local timezone", raw));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(anyhow!("unrecognised countdown target '{}'", raw))
}

pub fn tick(target: DateTime<Utc>, now: DateTime<Utc>) -> Tick {
    let ms = (target - now).num_milliseconds();
    if ms <= 0 {
        Tick::Closed
    } else {
        Tick::Remaining(Remaining::from_millis(ms))
    }
}

/// End of the enrollment window: 30 days out at 23:59:59 local time.
pub fn default_target(now: DateTime<Local>) -> String {
    let day = (now + ChronoDuration::days(ENROLLMENT_WINDOW_DAYS)).date_naive();
    format!("{}T23:59:59", day.format("%Y-%m-%d"))
}

/// Running countdown. The ticker task lives exactly as long as this handle.
pub struct CountdownHandle {
    display: watch::Receiver<String>,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    pub fn start(raw_target: &str, clock: Arc<dyn Clock>) -> Self {
        let target = match parse_target(raw_target) {
            Ok(t) => t,
            Err(e) => {
                warn!("Invalid countdown target: {:#}", e);
                let (_tx, rx) = watch::channel(ERROR_MESSAGE.to_string());
                return Self {
                    display: rx,
                    task: None,
                };
            }
        };

        let first = tick(target, clock.now());
        let (tx, rx) = watch::channel(first.render());
        if first == Tick::Closed {
            info!("Countdown target {} already passed", target);
            return Self {
                display: rx,
                task: None,
            };
        }

        info!("Countdown running until {}", target);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            loop {
                interval.tick().await;
                let current = tick(target, clock.now());
                tx.send_replace(current.render());
                if current == Tick::Closed {
                    debug!("Countdown reached target, stopping");
                    break;
                }
            }
        });
        Self {
            display: rx,
            task: Some(task),
        }
    }

    pub fn display(&self) -> String {
        self.display.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<String> {
        self.display.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wall clock that follows tokio's (pausable) clock.
    struct PausedClock {
        base: DateTime<Utc>,
        started: Instant,
    }

    impl PausedClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                base: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
                started: Instant::now(),
            })
        }
    }

    impl Clock for PausedClock {
        fn now(&self) -> DateTime<Utc> {
            let elapsed = Instant::now() - self.started;
            self.base + ChronoDuration::from_std(elapsed).unwrap()
        }
    }

    #[test]
    fn decomposes_remaining_time() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let target = now
            + ChronoDuration::days(5)
            + ChronoDuration::hours(3)
            + ChronoDuration::minutes(7)
            + ChronoDuration::seconds(9);
        assert_eq!(tick(target, now).render(), "05D : 03H : 07M : 09S");
        assert_eq!(tick(now, now), Tick::Closed);
        assert_eq!(tick(now, target), Tick::Closed);
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(
            parse_target("2026-03-01T10:00:00Z").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_target("2026-03-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(parse_target("2026-03-01T23:59:59").is_ok());
        assert!(parse_target("next tuesday").is_err());
    }

    #[test]
    fn default_target_ends_thirty_days_out() {
        let now = Local.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap();
        assert_eq!(default_target(now), "2026-02-09T23:59:59");
    }

    #[tokio::test(start_paused = true)]
    async fn closes_after_target_and_stops() {
        let clock = PausedClock::new();
        let target = (clock.now() + ChronoDuration::seconds(5)).to_rfc3339();
        let handle = CountdownHandle::start(&target, clock);
        assert_eq!(handle.display(), "00D : 00H : 00M : 05S");
        assert!(handle.is_ticking());

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert_eq!(handle.display(), CLOSED_MESSAGE);
        assert!(!handle.is_ticking());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(handle.display(), CLOSED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_target_never_ticks() {
        let handle = CountdownHandle::start("not a date", PausedClock::new());
        assert_eq!(handle.display(), ERROR_MESSAGE);
        assert!(!handle.is_ticking());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.display(), ERROR_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels_ticker() {
        let clock = PausedClock::new();
        let target = (clock.now() + ChronoDuration::seconds(60)).to_rfc3339();
        let handle = CountdownHandle::start(&target, clock);
        let mut rx = handle.subscribe();
        drop(handle);
        tokio::task::yield_now().await;
        // Sender lives in the aborted task, so the channel closes.
        assert!(rx.changed().await.is_err());
    }
}
