//! Integration tests for the interval scheduler.
//!
//! Next-tick arithmetic runs against a manual clock. The firing tests use
//! short real periods and wait on a channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use chrono::{Local, TimeDelta, TimeZone};
use fluidbg_lib::scheduler::{IntervalScheduler, ManualClock};

fn clock_at(hour: u32, minute: u32, second: u32) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Local.with_ymd_and_hms(2024, 1, 15, hour, minute, second).unwrap()))
}

// ============================================================================
// Next tick
// ============================================================================

#[test]
fn test_next_tick_past_midnight_shows_date() {
    let clock = clock_at(23, 59, 50);
    let scheduler = IntervalScheduler::new(30.0, clock);

    scheduler.start();

    assert_eq!(scheduler.next_tick_timestamp(), "16/01/24 00:00:20");
    scheduler.stop();
}

#[test]
fn test_next_tick_later_today_shows_time_only() {
    let clock = clock_at(9, 0, 0);
    let scheduler = IntervalScheduler::new(90.0 * 60.0, clock);

    scheduler.start();

    assert_eq!(scheduler.next_tick_timestamp(), "10:30:00");
    scheduler.stop();
}

#[test]
fn test_change_interval_rearms_from_now() {
    let clock = clock_at(12, 0, 0);
    let scheduler = IntervalScheduler::new(30.0, clock.clone());
    scheduler.start();

    clock.advance(TimeDelta::seconds(10));
    scheduler.change_interval(50.0);

    assert_eq!(scheduler.next_tick_timestamp(), "12:01:00");
    assert!(scheduler.is_running());
    scheduler.stop();
}

#[test]
fn test_next_tick_is_never_before_first_start() {
    let scheduler = IntervalScheduler::new(30.0, clock_at(8, 0, 0));

    assert_eq!(scheduler.next_tick_timestamp(), "Never");
    assert!(scheduler.next_tick().is_none());
}

// ============================================================================
// Firing
// ============================================================================

#[test]
fn test_ticks_repeat_until_stopped() {
    let scheduler = IntervalScheduler::new(0.02, clock_at(8, 0, 0));
    let (tx, rx) = mpsc::channel();
    scheduler.set_callback(move || {
        let _ = tx.send(());
    });

    scheduler.start();
    for _ in 0..3 {
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    scheduler.stop();

    while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_stop_from_inside_callback() {
    let scheduler = Arc::new(IntervalScheduler::new(0.02, clock_at(8, 0, 0)));
    let fired = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    let weak = Arc::downgrade(&scheduler);
    let counter = Arc::clone(&fired);
    scheduler.set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(scheduler) = weak.upgrade() {
            scheduler.stop();
        }
        let _ = tx.send(());
    });

    scheduler.start();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    std::thread::sleep(Duration::from_millis(150));

    assert!(!scheduler.is_running());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_restart_after_stop_fires_again() {
    let scheduler = IntervalScheduler::new(0.02, clock_at(8, 0, 0));
    let (tx, rx) = mpsc::channel();
    scheduler.set_callback(move || {
        let _ = tx.send(());
    });

    scheduler.start();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    scheduler.stop();
    while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}

    scheduler.start();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    scheduler.stop();
}
