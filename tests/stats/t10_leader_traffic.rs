use std::time::Duration;

use anyhow::Result;
use maplit::btreemap;
#[allow(unused_imports)] use pretty_assertions::assert_eq;
use raft_stats::MessageSummary;
use raft_stats::ServerState;
use raft_stats::TokioInstant;

use crate::fixtures::assert_close;
use crate::fixtures::init_default_ut_tracing;
use crate::fixtures::StatsNode;

/// Leader traffic test.
///
/// What does this test do?
///
/// - node 0 replicates to nodes 1, 2 and 3, one round every 100 ms.
/// - node 3 is unreachable and every RPC to it fails.
/// - asserts the node is leader since the first round, the send rate, and the latency of each
///   peer.
#[tokio::test(start_paused = true)]
async fn leader_traffic() -> Result<()> {
    init_default_ut_tracing();

    let node = StatsNode::<TokioInstant>::new(0, [1, 2, 3], 200);

    let rtt_ms = btreemap! {
        1 => [4, 6],
        2 => [10, 30],
    };

    tracing::info!("--- replicate 20 rounds");
    {
        for round in 0..20usize {
            node.broadcast(1024, |target| {
                rtt_ms.get(&target).map(|x| Duration::from_millis(x[round % 2]))
            });
            tokio::time::advance(Duration::from_millis(100)).await;
        }
    }

    tracing::info!("--- check role");
    {
        assert_eq!(ServerState::Leader, node.role.server_state());
        assert_eq!(Some(0), node.role.current_leader());
        assert_eq!(Some(Duration::from_secs(2)), node.role.leader_uptime());
    }

    tracing::info!("--- check send rate");
    {
        let snap = node.role.snapshot();
        tracing::info!("snapshot: {}", snap.summary());

        assert_eq!(60, snap.send_append_request_count);
        assert_eq!(0, snap.recv_append_request_count);

        // 60 requests from the first round at 0ms to the last at 1900ms.
        assert_close(60.0 / 1.9, snap.send_pkg_rate);
        assert_close(60.0 * 1024.0 / 1.9, snap.send_bandwidth_rate);
        assert_eq!(0.0, snap.recv_pkg_rate);
    }

    tracing::info!("--- check latency");
    {
        let l1 = node.latency(1).stats();
        tracing::info!("latency to 1: {}", l1.summary());
        assert_eq!(20, l1.success_count());
        assert_eq!(0, l1.failure_count());
        assert_close(5.0, l1.mean_latency_ms());
        assert_eq!(4.0, l1.min_latency_ms());
        assert_eq!(6.0, l1.max_latency_ms());
        assert_close(1.0, l1.std_dev_latency_ms());

        let l2 = node.latency(2).stats();
        assert_close(20.0, l2.mean_latency_ms());
        assert_close(10.0, l2.std_dev_latency_ms());

        let l3 = node.latency(3).stats();
        assert_eq!(0, l3.success_count());
        assert_eq!(20, l3.failure_count());
        assert_eq!(0.0, l3.mean_latency_ms());
        assert_eq!(0.0, l3.min_latency_ms());
        assert_eq!(0.0, l3.std_dev_latency_ms());
    }

    Ok(())
}
