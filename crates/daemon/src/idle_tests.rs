use super::*;
use std::time::Duration;

#[test]
fn fires_lo_idle_by_default_with_no_subscribers() {
    let mut sched = IdleScheduler::with_intervals(Duration::from_millis(10), Duration::from_millis(10));
    let now = Instant::now();
    assert_eq!(sched.poll(now), IdleFire::Lo);
}

#[test]
fn fires_hi_idle_once_subscribed() {
    let mut sched = IdleScheduler::with_intervals(Duration::from_millis(10), Duration::from_millis(10));
    let sub = sched.subscribe();
    let now = Instant::now();
    assert_eq!(sched.poll(now), IdleFire::Hi);
    let _ = sub;
}

#[test]
fn does_not_fire_again_before_the_interval_elapses() {
    let mut sched = IdleScheduler::with_intervals(Duration::from_millis(50), Duration::from_millis(50));
    let t0 = Instant::now();
    assert_eq!(sched.poll(t0), IdleFire::Lo);
    assert_eq!(sched.poll(t0), IdleFire::None);
}

#[test]
fn unsubscribing_falls_back_to_lo_idle() {
    let mut sched = IdleScheduler::with_intervals(Duration::from_millis(10), Duration::from_millis(10));
    let sub = sched.subscribe();
    assert!(sched.has_subscribers());
    sched.unsubscribe(sub);
    assert!(!sched.has_subscribers());
}

#[test]
fn fires_again_after_the_interval_elapses() {
    let mut sched = IdleScheduler::with_intervals(Duration::from_millis(5), Duration::from_millis(5));
    let t0 = Instant::now();
    assert_eq!(sched.poll(t0), IdleFire::Lo);
    let t1 = t0 + Duration::from_millis(10);
    assert_eq!(sched.poll(t1), IdleFire::Lo);
}
