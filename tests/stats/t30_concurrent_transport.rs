use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
#[allow(unused_imports)] use pretty_assertions::assert_eq;
use raft_stats::PeerLatencyEstimator;
use raft_stats::RoleStats;
use raft_stats::ServerState;

use crate::fixtures::init_default_ut_tracing;

/// Concurrent transport test.
///
/// What does this test do?
///
/// - several tasks on a multi-thread runtime record sends and RPC latencies concurrently, while
///   a reporter task keeps reading snapshots.
/// - asserts no update is lost and no reading is torn.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transport() -> Result<()> {
    init_default_ut_tracing();

    let n_tasks = 8u64;
    let per_task = 250u64;
    let capacity = 100;

    let stats = Arc::new(RoleStats::<u64>::new(capacity));
    let latency = Arc::new(PeerLatencyEstimator::new());

    let reporter = {
        let stats = stats.clone();
        let latency = latency.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let snap = stats.snapshot();
                assert!(snap.send_pkg_rate.is_finite());
                assert!(snap.send_bandwidth_rate.is_finite());
                assert!(stats.send_window().len() <= capacity);

                let l = latency.stats();
                assert!(l.std_dev_latency_ms().is_finite());
                tokio::task::yield_now().await;
            }
        })
    };

    let mut senders = vec![];
    for t in 0..n_tasks {
        let stats = stats.clone();
        let latency = latency.clone();
        senders.push(tokio::spawn(async move {
            for i in 0..per_task {
                stats.record_send(&1, t * per_task + i + 1);
                if i % 5 == 0 {
                    latency.record_failure();
                } else {
                    latency.record_success(Duration::from_millis(2 + t % 3));
                }
            }
        }));
    }

    for h in senders {
        h.await?;
    }
    reporter.await?;

    let n = n_tasks * per_task;
    assert_eq!(ServerState::Leader, stats.server_state());
    assert_eq!(n, stats.send_count());
    assert_eq!(capacity, stats.send_window().len());

    let retained: u64 = stats.send_window().samples().iter().map(|s| s.size()).sum();
    assert_eq!(retained, stats.send_window().size());

    let l = latency.stats();
    assert_eq!(n / 5, l.failure_count());
    assert_eq!(n - n / 5, l.success_count());
    assert_eq!(2.0, l.min_latency_ms());
    assert_eq!(4.0, l.max_latency_ms());

    Ok(())
}
