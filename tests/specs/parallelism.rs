//! Normal operations parallelize freely; exclusive operations may overlap
//! each other (documented non-exclusivity).

use crate::prelude::{fast_barrier, overlaps, Windows};
use std::time::{Duration, Instant};

// Scenario B: 10 concurrent normals, no exclusive active. All windows
// overlap; total wall time is one sleep, not ten.
#[test]
fn ten_normals_run_concurrently() {
    let barrier = fast_barrier("parallel-spec");
    let windows = Windows::new();
    let start = Instant::now();

    let workers: Vec<_> = (0..10)
        .map(|_| {
            let barrier = barrier.clone();
            let windows = windows.clone();
            std::thread::spawn(move || {
                let result: Result<(), String> = barrier.normal(|| {
                    windows.record(|| std::thread::sleep(Duration::from_millis(50)));
                    Ok(())
                });
                result.unwrap();
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(
        start.elapsed() < Duration::from_millis(300),
        "normals were serialized: {:?}",
        start.elapsed()
    );
    let all = windows.all();
    assert_eq!(all.len(), 10);
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert!(overlaps(*a, *b), "two normal windows did not overlap");
        }
    }
}

#[test]
fn two_exclusives_may_overlap() {
    let barrier = fast_barrier("exclusive-overlap-spec");
    let windows = Windows::new();

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let barrier = barrier.clone();
            let windows = windows.clone();
            std::thread::spawn(move || {
                let result: Result<(), String> = barrier.exclusive(|| {
                    windows.record(|| std::thread::sleep(Duration::from_millis(80)));
                    Ok(())
                });
                result.unwrap();
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let all = windows.all();
    assert_eq!(all.len(), 2);
    assert!(
        overlaps(all[0], all[1]),
        "exclusive calls are not serialized against each other"
    );
}
