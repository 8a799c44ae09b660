use std::time::Duration;

use anyhow::Result;
#[allow(unused_imports)] use pretty_assertions::assert_eq;
use raft_stats::RoleStats;
use raft_stats::ServerState;
use raft_stats::TokioInstant;

use crate::fixtures::assert_close;
use crate::fixtures::init_default_ut_tracing;

/// Follower traffic test.
///
/// What does this test do?
///
/// - node receives AppendEntries from leader 1, then from leader 2 after an election.
/// - the node becomes a candidate and then leader itself.
/// - asserts the leader and leader uptime follow the transitions, and that the receive window
///   only covers the most recent requests.
#[tokio::test(start_paused = true)]
async fn follower_traffic() -> Result<()> {
    init_default_ut_tracing();

    let stats = RoleStats::<u64, TokioInstant>::new(10);

    tracing::info!("--- receive from leader 1");
    {
        for _ in 0..30 {
            stats.record_receive(&1, 100);
            tokio::time::advance(Duration::from_millis(50)).await;
        }

        assert_eq!(ServerState::Follower, stats.server_state());
        assert_eq!(Some(1), stats.current_leader());
        assert_eq!(Some(Duration::from_millis(1500)), stats.leader_uptime());
    }

    tracing::info!("--- election: leader 2 takes over, with bigger requests at a lower rate");
    {
        stats.set_server_state(ServerState::Candidate);
        stats.record_receive(&2, 400);
        assert_eq!(ServerState::Follower, stats.server_state());
        assert_eq!(Some(Duration::ZERO), stats.leader_uptime());

        for _ in 0..9 {
            tokio::time::advance(Duration::from_millis(100)).await;
            stats.record_receive(&2, 400);
        }

        // The window holds only the 10 requests from leader 2, 900ms apart end to end.
        assert_eq!(10, stats.recv_window().len());
        assert_eq!(4000, stats.recv_window().size());
        let rate = stats.recv_window().rate();
        assert_close(10.0 / 0.9, rate.events_per_sec);
        assert_close(4000.0 / 0.9, rate.bytes_per_sec);
        assert_eq!(40, stats.recv_count());
    }

    tracing::info!("--- become leader");
    {
        stats.set_server_state(ServerState::Candidate);
        tokio::time::advance(Duration::from_millis(300)).await;
        stats.record_send(&3, 10);

        assert_eq!(ServerState::Leader, stats.server_state());
        assert_eq!(Some(3), stats.current_leader());
        assert_eq!(Some(Duration::ZERO), stats.leader_uptime());
        assert_eq!(1, stats.send_count());
    }

    Ok(())
}
