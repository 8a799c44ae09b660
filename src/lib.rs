#![doc = include_str!("../README.md")]
#![allow(clippy::bool_assert_comparison, clippy::type_complexity)]
#![deny(unused_qualifications)]

//! # Feature flags
//!
//! - `serde`: Add serde::Serialize and serde:Deserialize bound to data types. If you'd like to
//!   publish the statistics with `serde`, e.g., through a status endpoint.

mod config;
mod instant;
mod latency;
mod node;
mod rate;
mod rate_window;
mod role_stats;
mod sample;
mod server_state;
mod summary;


pub use anyerror;
pub use anyerror::AnyError;

pub use crate::config::ConfigError;
pub use crate::config::StatsConfig;
pub use crate::instant::Instant;
pub use crate::instant::TokioInstant;
pub use crate::latency::LatencyStats;
pub use crate::latency::PeerLatencyEstimator;
pub use crate::node::NodeId;
pub use crate::rate::Rate;
pub use crate::rate_window::RateWindow;
pub use crate::rate_window::DEFAULT_RATE_WINDOW_CAPACITY;
pub use crate::role_stats::RoleStats;
pub use crate::role_stats::RoleStatsSnapshot;
pub use crate::sample::Sample;
pub use crate::server_state::ServerState;
pub use crate::summary::MessageSummary;
