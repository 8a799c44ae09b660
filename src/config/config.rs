//! Statistics configuration.

use anyerror::AnyError;
use clap::Parser;

use crate::config::error::ConfigError;

/// The configuration of the statistics of a Raft node.
///
/// It is fixed once the statistics are built: there is no runtime reconfiguration.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StatsConfig {
    /// The number of most recent AppendEntries requests a rate window retains.
    ///
    /// Rates are estimated over the time these requests span: a larger window smooths bursts
    /// but reacts slower to a change of traffic.
    #[clap(long, env = "RAFT_STATS_RATE_WINDOW_CAPACITY", default_value = "200")]
    pub rate_window_capacity: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        <Self as Parser>::parse_from(Vec::<&'static str>::new())
    }
}

impl StatsConfig {
    /// Build a validated config from command line style arguments, the first being the program
    /// name.
    pub fn build(args: &[&str]) -> Result<StatsConfig, ConfigError> {
        let config = <Self as Parser>::try_parse_from(args).map_err(|e| ConfigError::ParseError {
            source: AnyError::new(&e),
            args: args.iter().map(|x| x.to_string()).collect(),
        })?;
        config.validate()
    }

    /// Validate the state of this config.
    pub fn validate(self) -> Result<StatsConfig, ConfigError> {
        if self.rate_window_capacity == 0 {
            return Err(ConfigError::RateWindowCapacityIs0);
        }

        Ok(self)
    }
}
