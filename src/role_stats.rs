use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use crate::Instant;
use crate::MessageSummary;
use crate::NodeId;
use crate::Rate;
use crate::RateWindow;
use crate::Sample;
use crate::ServerState;
use crate::StatsConfig;
use crate::DEFAULT_RATE_WINDOW_CAPACITY;

/// Role and append-entries traffic statistics of a Raft node.
///
/// It is created once per node and updated by the transport layer on every AppendEntries request
/// sent or received:
///
/// - Receiving a request means this node is a follower of the sender.
/// - Sending a request means this node is the leader.
///
/// Role and leader are guarded by one lock, the send and receive counters are atomics and each
/// [`RateWindow`] has its own lock. A reader collecting several fields may see them from
/// different points in time; every single field is read atomically.
#[derive(Debug)]
pub struct RoleStats<NID, I = std::time::Instant>
where
    NID: NodeId,
    I: Instant,
{
    start_time: I,

    role: Mutex<Role<NID, I>>,

    recv_count: AtomicU64,
    send_count: AtomicU64,

    /// AppendEntries requests received from the leader.
    recv_window: RateWindow<I>,

    /// AppendEntries requests sent to followers.
    send_window: RateWindow<I>,
}

#[derive(Debug, Clone)]
struct Role<NID, I>
where
    NID: NodeId,
    I: Instant,
{
    server_state: ServerState,

    leader: Option<NID>,

    /// When `leader` was last changed.
    leader_since: Option<I>,
}

impl<NID, I> Role<NID, I>
where
    NID: NodeId,
    I: Instant,
{
    /// Set the leader and reset `leader_since` if it is a different one.
    ///
    /// Returns the previous leader if it changed.
    fn update_leader(&mut self, leader: &NID, now: I) -> Option<Option<NID>> {
        if self.leader.as_ref() == Some(leader) {
            return None;
        }

        self.leader_since = Some(now);
        Some(self.leader.replace(leader.clone()))
    }
}

impl<NID, I> Default for RoleStats<NID, I>
where
    NID: NodeId,
    I: Instant,
{
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW_CAPACITY)
    }
}

impl<NID, I> RoleStats<NID, I>
where
    NID: NodeId,
    I: Instant,
{
    /// Create stats of a node that has just started, as a follower without a known leader.
    ///
    /// Each rate window retains the most recent `rate_window_capacity` requests.
    pub fn new(rate_window_capacity: usize) -> Self {
        Self {
            start_time: I::now(),
            role: Mutex::new(Role {
                server_state: ServerState::Follower,
                leader: None,
                leader_since: None,
            }),
            recv_count: AtomicU64::new(0),
            send_count: AtomicU64::new(0),
            recv_window: RateWindow::new(rate_window_capacity),
            send_window: RateWindow::new(rate_window_capacity),
        }
    }

    pub fn with_config(config: &StatsConfig) -> Self {
        Self::new(config.rate_window_capacity)
    }

    /// Account an AppendEntries request of `size` bytes received from `leader`.
    ///
    /// This node becomes a follower; if `leader` is not the known leader, it becomes the leader
    /// and the leader uptime starts over.
    pub fn record_receive(&self, leader: &NID, size: u64) {
        let now = I::now();

        let (prev_state, prev_leader) = {
            let mut role = self.role.lock().unwrap();
            let prev_state = role.server_state;
            role.server_state = ServerState::Follower;
            (prev_state, role.update_leader(leader, now))
        };

        self.recv_window.insert(Sample::new(now, size));
        self.recv_count.fetch_add(1, Ordering::Relaxed);

        if prev_state != ServerState::Follower {
            tracing::info!("server state: {} -> {}", prev_state, ServerState::Follower);
        }
        if let Some(prev_leader) = prev_leader {
            tracing::info!("leader changed: {:?} -> {}", prev_leader, leader);
        }
    }

    /// Account an AppendEntries request of `size` bytes sent by this node, `id`.
    ///
    /// Only a leader sends AppendEntries: if this node is not yet a leader it becomes one, with
    /// itself as the leader and the leader uptime starting over.
    pub fn record_send(&self, id: &NID, size: u64) {
        let now = I::now();

        let prev_state = {
            let mut role = self.role.lock().unwrap();
            let prev_state = role.server_state;
            if !prev_state.is_leader() {
                role.server_state = ServerState::Leader;
                role.leader = Some(id.clone());
                role.leader_since = Some(now);
            }
            prev_state
        };

        self.send_window.insert(Sample::new(now, size));
        self.send_count.fetch_add(1, Ordering::Relaxed);

        if !prev_state.is_leader() {
            tracing::info!("server state: {} -> {}, leader: {}", prev_state, ServerState::Leader, id);
        }
    }

    /// Assign the server state decided by the consensus layer.
    ///
    /// The known leader and its uptime are left as they are.
    pub fn set_server_state(&self, state: ServerState) {
        let prev = {
            let mut role = self.role.lock().unwrap();
            std::mem::replace(&mut role.server_state, state)
        };

        tracing::debug!("set server state: {} -> {}", prev, state);
    }

    pub fn server_state(&self) -> ServerState {
        self.role.lock().unwrap().server_state
    }

    pub fn current_leader(&self) -> Option<NID> {
        self.role.lock().unwrap().leader.clone()
    }

    /// When the current leader was first seen, `None` if no leader is known.
    pub fn leader_since(&self) -> Option<I> {
        self.role.lock().unwrap().leader_since
    }

    /// How long the current leader has been leading, `None` if no leader is known.
    ///
    /// It is only meaningful while this node is the leader or while it follows a leader; check
    /// [`Self::server_state`] first.
    pub fn leader_uptime(&self) -> Option<Duration> {
        let since = self.leader_since()?;
        Some(I::now().saturating_since(since))
    }

    pub fn start_time(&self) -> I {
        self.start_time
    }

    /// How long since these stats were created.
    pub fn uptime(&self) -> Duration {
        I::now().saturating_since(self.start_time)
    }

    /// Number of AppendEntries requests received.
    pub fn recv_count(&self) -> u64 {
        self.recv_count.load(Ordering::Relaxed)
    }

    /// Number of AppendEntries requests sent.
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::Relaxed)
    }

    pub fn recv_window(&self) -> &RateWindow<I> {
        &self.recv_window
    }

    pub fn send_window(&self) -> &RateWindow<I> {
        &self.send_window
    }

    /// Collect the current values into plain data for reporting.
    pub fn snapshot(&self) -> RoleStatsSnapshot<NID> {
        let role = self.role.lock().unwrap().clone();
        let recv_rate = self.recv_window.rate();
        let send_rate = self.send_window.rate();
        let now = I::now();

        RoleStatsSnapshot {
            state: role.server_state,
            leader: role.leader,
            uptime: now.saturating_since(self.start_time),
            leader_uptime: role.leader_since.map(|since| now.saturating_since(since)),
            recv_append_request_count: self.recv_count(),
            send_append_request_count: self.send_count(),
            recv_pkg_rate: recv_rate.events_per_sec,
            recv_bandwidth_rate: recv_rate.bytes_per_sec,
            send_pkg_rate: send_rate.events_per_sec,
            send_bandwidth_rate: send_rate.bytes_per_sec,
        }
    }
}

/// A point-in-time copy of [`RoleStats`], e.g., for a status endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(bound = "", rename_all = "camelCase")
)]
pub struct RoleStatsSnapshot<NID>
where NID: NodeId
{
    pub state: ServerState,

    pub leader: Option<NID>,

    /// Time since the stats were created.
    pub uptime: Duration,

    /// Time since the current leader was first seen, `None` if no leader is known.
    pub leader_uptime: Option<Duration>,

    #[cfg_attr(feature = "serde", serde(rename = "recvAppendRequestCnt"))]
    pub recv_append_request_count: u64,

    #[cfg_attr(feature = "serde", serde(rename = "sendAppendRequestCnt"))]
    pub send_append_request_count: u64,

    /// AppendEntries requests received per second, over the receive window.
    pub recv_pkg_rate: f64,

    /// Bytes received per second in AppendEntries requests, over the receive window.
    pub recv_bandwidth_rate: f64,

    /// AppendEntries requests sent per second, over the send window.
    pub send_pkg_rate: f64,

    /// Bytes sent per second in AppendEntries requests, over the send window.
    pub send_bandwidth_rate: f64,
}

impl<NID> RoleStatsSnapshot<NID>
where NID: NodeId
{
    pub fn recv_rate(&self) -> Rate {
        Rate {
            events_per_sec: self.recv_pkg_rate,
            bytes_per_sec: self.recv_bandwidth_rate,
        }
    }

    pub fn send_rate(&self) -> Rate {
        Rate {
            events_per_sec: self.send_pkg_rate,
            bytes_per_sec: self.send_bandwidth_rate,
        }
    }
}

impl<NID> MessageSummary for RoleStatsSnapshot<NID>
where NID: NodeId
{
    fn summary(&self) -> String {
        format!(
            "RoleStats{{{}, leader:{:?}, uptime:{:?}, leader_uptime:{:?}, recv:{}({}), send:{}({})}}",
            self.state,
            self.leader,
            self.uptime,
            self.leader_uptime,
            self.recv_append_request_count,
            self.recv_rate(),
            self.send_append_request_count,
            self.send_rate(),
        )
    }
}
