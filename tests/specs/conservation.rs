//! Counter conservation: after any sequence of calls, including failing
//! and cancelled actions, all four counters return to zero.

use crate::prelude::fast_barrier;
use quiesce_core::{cancel, BarrierError, BarrierSnapshot, CancelToken};
use std::time::Duration;

#[test]
fn counters_zero_after_mixed_success_and_failure() {
    let barrier = fast_barrier("conservation-spec");

    let workers: Vec<_> = (0..8_u32)
        .map(|i| {
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                let result: Result<u32, String> = if i % 2 == 0 {
                    barrier.normal(|| {
                        if i % 4 == 0 {
                            Err("normal failure".to_string())
                        } else {
                            Ok(i)
                        }
                    })
                } else {
                    barrier.exclusive(|| {
                        if i % 3 == 0 {
                            Err("exclusive failure".to_string())
                        } else {
                            Ok(i)
                        }
                    })
                };
                // failures are expected; only conservation matters here
                let _ = result;
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(barrier.snapshot(), BarrierSnapshot::default());
}

#[tokio::test(flavor = "multi_thread")]
async fn counters_zero_after_cancelled_and_timed_out_calls() {
    let barrier = fast_barrier("conservation-async-spec");

    // cancelled while running
    let (handle, token) = cancel::pair();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });
    let cancelled: Result<(), BarrierError<String>> = barrier
        .normal_suspending(token, |_token| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        })
        .await;
    assert_eq!(cancelled, Err(BarrierError::Cancelled));

    // timed out action
    let limit = Duration::from_millis(20);
    let timed_out: Result<(), BarrierError<String>> = barrier
        .normal_suspending_timeout(CancelToken::never(), limit, |_token| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        })
        .await;
    assert_eq!(timed_out, Err(BarrierError::Timeout { limit }));

    // a healthy call still goes straight through afterwards
    let healthy: Result<u8, BarrierError<String>> = barrier
        .normal_suspending(CancelToken::never(), |_token| async { Ok(3) })
        .await;
    assert_eq!(healthy, Ok(3));

    assert_eq!(barrier.snapshot(), BarrierSnapshot::default());
}
