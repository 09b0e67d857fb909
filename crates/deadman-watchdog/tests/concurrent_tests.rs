//! Concurrency tests for the watchdog engine.

use deadman_watchdog::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn eventually(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

#[test]
fn test_concurrent_start_stop_never_panics() -> TestResult {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let engine = Arc::new(WatchdogEngine::try_new(
        "contended",
        WatchdogConfig::default(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )?);

    let mut handles = vec![];
    for i in 0..8u64 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for j in 0..200u64 {
                if (i + j) % 3 == 0 {
                    engine.stop();
                } else {
                    engine.start(Duration::from_secs(60));
                }
            }
        }));
    }
    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }

    // Every deadline was long; nothing may have fired.
    engine.stop();
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(engine.is_valid());
    Ok(())
}

#[test]
fn test_last_start_wins_across_threads() -> TestResult {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let engine = Arc::new(WatchdogEngine::try_new(
        "racing-starts",
        WatchdogConfig::default(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )?);

    let mut handles = vec![];
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                engine.start(Duration::from_millis(200));
            }
        }));
    }
    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }

    // Only one deadline is ever pending, so exactly one expiry follows.
    assert!(eventually(|| hits.load(Ordering::SeqCst) >= 1));
    thread::sleep(Duration::from_millis(300));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_many_watchdogs_are_independent() -> TestResult {
    let hits: Vec<Arc<AtomicU32>> = (0..6).map(|_| Arc::new(AtomicU32::new(0))).collect();
    let mut engines = Vec::new();
    for (index, counter) in hits.iter().enumerate() {
        let counter = Arc::clone(counter);
        let engine = WatchdogEngine::try_new(
            format!("worker-{index}"),
            WatchdogConfig::default(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )?;
        engines.push(engine);
    }

    // Arm only the even ones.
    for engine in engines.iter().step_by(2) {
        engine.start(Duration::from_millis(10));
    }
    for counter in hits.iter().step_by(2) {
        assert!(eventually(|| counter.load(Ordering::SeqCst) == 1));
    }
    for counter in hits.iter().skip(1).step_by(2) {
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
    Ok(())
}

#[test]
fn test_set_delay_from_other_threads() -> TestResult {
    let engine = Arc::new(WatchdogEngine::try_new(
        "delays",
        WatchdogConfig::default(),
        || {},
    )?);

    let mut handles = vec![];
    for ms in [100u64, 200, 300, 400] {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || engine.set_delay(Duration::from_millis(ms))));
    }
    for handle in handles {
        assert!(handle.join().is_ok(), "Thread should not panic");
    }

    let delay = engine.delay();
    assert!([100u64, 200, 300, 400]
        .iter()
        .any(|ms| delay == Duration::from_millis(*ms)));
    Ok(())
}

#[test]
fn test_drop_while_other_thread_services() -> TestResult {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let engine = Arc::new(WatchdogEngine::try_new(
        "servicing",
        WatchdogConfig::default(),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )?);

    let servicer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..100 {
                engine.start(Duration::from_millis(500));
                thread::sleep(Duration::from_micros(200));
                engine.stop();
            }
        })
    };
    assert!(servicer.join().is_ok(), "Thread should not panic");

    // Last reference: joins the background thread.
    drop(engine);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn test_drop_racing_natural_expiry_fires_at_most_once() -> TestResult {
    for round in 0..50u64 {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        let engine = WatchdogEngine::try_new(
            format!("race-{round}"),
            WatchdogConfig::default(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )?;

        engine.start(Duration::from_micros(round * 20));
        thread::sleep(Duration::from_micros(500));
        drop(engine);

        let fired = hits.load(Ordering::SeqCst);
        assert!(fired <= 1, "round {round} fired {fired} times");
        thread::sleep(Duration::from_millis(2));
        assert_eq!(hits.load(Ordering::SeqCst), fired);
    }
    Ok(())
}
