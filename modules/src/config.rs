//! Engine configuration, read from TOML.
//!
//! ```toml
//! commitment_prefix = "ibc"
//! max_expected_time_per_block = "30s"
//! max_history_size = 256
//! block_time = "3s"
//! default_trust_threshold = "1/3"
//! max_clock_drift = "10s"
//! trusting_period = "14days"
//! unbonding_period = "21days"
//! ```
//!
//! Every field is optional and falls back to the value shown above.

use core::time::Duration;
use std::path::Path;

use flex_error::{define_error, TraceError};
use serde_derive::{Deserialize, Serialize};

use crate::core::ics02_client::error::Error as ClientError;
use crate::core::ics02_client::trust_threshold::TrustThreshold;
use crate::core::ics23_commitment::commitment::CommitmentPrefix;

define_error! {
    Error {
        Io
            [ TraceError<std::io::Error> ]
            |_| { "config I/O error" },

        Decode
            [ TraceError<toml::de::Error> ]
            |_| { "invalid configuration" },

        Encode
            [ TraceError<toml::ser::Error> ]
            |_| { "invalid configuration" },

        EmptyCommitmentPrefix
            |_| { "the commitment prefix cannot be empty" },

        ZeroHistorySize
            |_| { "max_history_size must be greater than zero" },

        InvalidTrustThreshold
            [ ClientError ]
            |_| { "invalid default trust threshold" },

        InvalidTrustingPeriod
            { trusting_period: Duration, unbonding_period: Duration }
            |e| {
                format_args!("trusting period {:?} must be non-zero and shorter than the unbonding period {:?}",
                    e.trusting_period, e.unbonding_period)
            },
    }
}

pub mod default {
    use super::*;

    pub fn commitment_prefix() -> String {
        "ibc".to_string()
    }

    pub fn max_expected_time_per_block() -> Duration {
        Duration::from_secs(30)
    }

    pub fn max_history_size() -> usize {
        256
    }

    pub fn block_time() -> Duration {
        Duration::from_secs(3)
    }

    pub fn trust_threshold() -> TrustThreshold {
        TrustThreshold::ONE_THIRD
    }

    pub fn max_clock_drift() -> Duration {
        Duration::from_secs(10)
    }

    pub fn trusting_period() -> Duration {
        Duration::from_secs(14 * 24 * 3600)
    }

    pub fn unbonding_period() -> Duration {
        Duration::from_secs(21 * 24 * 3600)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Store prefix under which the host commits IBC state.
    #[serde(default = "default::commitment_prefix")]
    pub commitment_prefix: String,

    /// Upper bound on the host block interval. Turns a connection delay
    /// period into a number of blocks.
    #[serde(default = "default::max_expected_time_per_block", with = "humantime_serde")]
    pub max_expected_time_per_block: Duration,

    /// How many past host blocks (and store versions) are kept around.
    #[serde(default = "default::max_history_size")]
    pub max_history_size: usize,

    /// Interval between two blocks of a mock host.
    #[serde(default = "default::block_time", with = "humantime_serde")]
    pub block_time: Duration,

    #[serde(default = "default::trust_threshold", with = "trust_threshold")]
    pub default_trust_threshold: TrustThreshold,

    #[serde(default = "default::max_clock_drift", with = "humantime_serde")]
    pub max_clock_drift: Duration,

    #[serde(default = "default::trusting_period", with = "humantime_serde")]
    pub trusting_period: Duration,

    #[serde(default = "default::unbonding_period", with = "humantime_serde")]
    pub unbonding_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commitment_prefix: default::commitment_prefix(),
            max_expected_time_per_block: default::max_expected_time_per_block(),
            max_history_size: default::max_history_size(),
            block_time: default::block_time(),
            default_trust_threshold: default::trust_threshold(),
            max_clock_drift: default::max_clock_drift(),
            trusting_period: default::trusting_period(),
            unbonding_period: default::unbonding_period(),
        }
    }
}

impl EngineConfig {
    /// Attempt to load and parse the TOML config file as an `EngineConfig`.
    pub fn load(path: impl AsRef<Path>) -> Result<EngineConfig, Error> {
        let config_toml = std::fs::read_to_string(&path).map_err(Error::io)?;
        Self::parse(&config_toml)
    }

    pub fn parse(config_toml: &str) -> Result<EngineConfig, Error> {
        let config = toml::from_str::<EngineConfig>(config_toml).map_err(Error::decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(Error::encode)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.commitment_prefix.is_empty() {
            return Err(Error::empty_commitment_prefix());
        }

        if self.max_history_size == 0 {
            return Err(Error::zero_history_size());
        }

        // The threshold may have been deserialized from its raw parts.
        TrustThreshold::new(
            self.default_trust_threshold.numerator(),
            self.default_trust_threshold.denominator(),
        )
        .map_err(Error::invalid_trust_threshold)?;

        if self.trusting_period.is_zero() || self.trusting_period >= self.unbonding_period {
            return Err(Error::invalid_trusting_period(
                self.trusting_period,
                self.unbonding_period,
            ));
        }

        Ok(())
    }

    pub fn commitment_prefix(&self) -> Result<CommitmentPrefix, Error> {
        CommitmentPrefix::try_from(self.commitment_prefix.clone().into_bytes())
            .map_err(|_| Error::empty_commitment_prefix())
    }
}

/// A trust threshold is written either as `"1/3"` or as a table with
/// `numerator` and `denominator`.
mod trust_threshold {
    use core::str::FromStr;

    use serde::de::Error as _;
    use serde::{Deserializer, Serializer};
    use serde_derive::Deserialize;

    use crate::core::ics02_client::trust_threshold::TrustThreshold;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Fraction(String),
        Parts { numerator: u64, denominator: u64 },
    }

    pub fn serialize<S>(threshold: &TrustThreshold, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(threshold)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TrustThreshold, D::Error>
    where
        D: Deserializer<'de>,
    {
        let threshold = match <Repr as serde::Deserialize>::deserialize(deserializer)? {
            Repr::Fraction(s) => TrustThreshold::from_str(&s),
            Repr::Parts {
                numerator,
                denominator,
            } => TrustThreshold::new(numerator, denominator),
        };
        threshold.map_err(D::Error::custom)
    }
}
