use core::time::Duration;

use serde_derive::{Deserialize, Serialize};

use crate::clients::ics07_tendermint::header::Header;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::trust_threshold::TrustThreshold;
use crate::core::ics24_host::identifier::ChainId;
use crate::Height;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub chain_id: ChainId,
    pub trust_level: TrustThreshold,
    pub trusting_period: Duration,
    pub unbonding_period: Duration,
    pub max_clock_drift: Duration,
    pub latest_height: Height,
    pub allow_update: AllowUpdate,
    pub frozen_height: Option<Height>,
}

/// Under which circumstances governance may substitute this client.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowUpdate {
    pub after_expiry: bool,
    pub after_misbehaviour: bool,
}

impl ClientState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        max_clock_drift: Duration,
        latest_height: Height,
        allow_update: AllowUpdate,
    ) -> Result<ClientState, Error> {
        let client_state = Self {
            chain_id,
            trust_level,
            trusting_period,
            unbonding_period,
            max_clock_drift,
            latest_height,
            allow_update,
            frozen_height: None,
        };
        client_state.validate()?;

        Ok(client_state)
    }

    pub fn validate(&self) -> Result<(), Error> {
        // Basic validation of trusting period and unbonding period: each should be non-zero.
        if self.trusting_period == Duration::ZERO {
            return Err(Error::invalid_client_state(format!(
                "trusting period ({:?}) must be greater than zero",
                self.trusting_period
            )));
        }

        if self.trusting_period >= self.unbonding_period {
            return Err(Error::invalid_client_state(format!(
                "trusting period ({:?}) must be smaller than unbonding period ({:?})",
                self.trusting_period, self.unbonding_period,
            )));
        }

        // The threshold may have been deserialized without going through
        // `TrustThreshold::new`.
        TrustThreshold::new(self.trust_level.numerator(), self.trust_level.denominator())?;

        if self.latest_height.is_zero() {
            return Err(Error::invalid_client_state(
                "latest height must be greater than zero".to_string(),
            ));
        }

        if self.latest_height.revision_number != self.chain_id.version() {
            return Err(Error::invalid_client_state(format!(
                "latest height revision {} does not match chain id {}",
                self.latest_height.revision_number, self.chain_id
            )));
        }

        Ok(())
    }

    pub fn latest_height(&self) -> Height {
        self.latest_height
    }

    pub fn with_header(self, h: &Header) -> Self {
        ClientState {
            latest_height: core::cmp::max(self.latest_height, h.height()),
            ..self
        }
    }

    pub fn with_frozen_height(self, h: Height) -> Self {
        Self {
            frozen_height: Some(h),
            ..self
        }
    }

    /// Check if the state is expired when `elapsed` time has passed since the latest consensus
    /// state timestamp
    pub fn expired(&self, elapsed: Duration) -> bool {
        elapsed >= self.trusting_period
    }
}

impl crate::core::ics02_client::client_state::ClientState for ClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Tendermint
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn frozen_height(&self) -> Option<Height> {
        self.frozen_height
    }

    fn expired(&self, elapsed: Duration) -> bool {
        self.expired(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use test_log::test;

    use super::*;

    #[derive(Clone, Debug)]
    struct ClientStateParams {
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        latest_height: Height,
    }

    #[test]
    fn client_state_new() {
        let default_params = ClientStateParams {
            trust_level: TrustThreshold::ONE_THIRD,
            trusting_period: Duration::new(64000, 0),
            unbonding_period: Duration::new(128000, 0),
            latest_height: Height::new(0, 10),
        };

        struct Test {
            name: String,
            params: ClientStateParams,
            want_pass: bool,
        }

        let tests: Vec<Test> = vec![
            Test {
                name: "Valid parameters".to_string(),
                params: default_params.clone(),
                want_pass: true,
            },
            Test {
                name: "Invalid (too small) trusting period".to_string(),
                params: ClientStateParams {
                    trusting_period: Duration::new(0, 0),
                    ..default_params.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Invalid (equal) trusting period w.r.t. unbonding period".to_string(),
                params: ClientStateParams {
                    trusting_period: Duration::new(10000, 0),
                    unbonding_period: Duration::new(10000, 0),
                    ..default_params.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Invalid (too large) trusting period w.r.t. unbonding period".to_string(),
                params: ClientStateParams {
                    trusting_period: Duration::new(20000, 0),
                    unbonding_period: Duration::new(10000, 0),
                    ..default_params.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Invalid (zero) latest height".to_string(),
                params: ClientStateParams {
                    latest_height: Height::zero(),
                    ..default_params.clone()
                },
                want_pass: false,
            },
            Test {
                name: "Invalid revision number for the chain id".to_string(),
                params: ClientStateParams {
                    latest_height: Height::new(3, 10),
                    ..default_params
                },
                want_pass: false,
            },
        ]
        .into_iter()
        .collect();

        for test in tests {
            let p = test.params.clone();

            let cs_result = ClientState::new(
                ChainId::new("ibc".to_string(), 0),
                p.trust_level,
                p.trusting_period,
                p.unbonding_period,
                Duration::new(3, 0),
                p.latest_height,
                AllowUpdate::default(),
            );

            assert_eq!(
                test.want_pass,
                cs_result.is_ok(),
                "ClientState::new() failed for test {}, \nmsg{:?} with error {:?}",
                test.name,
                test.params.clone(),
                cs_result.err(),
            );
        }
    }

    #[test]
    fn expiry_is_inclusive_of_the_trusting_period() {
        let cs = ClientState::new(
            ChainId::new("ibc".to_string(), 0),
            TrustThreshold::ONE_THIRD,
            Duration::from_secs(100),
            Duration::from_secs(200),
            Duration::from_secs(3),
            Height::new(0, 1),
            AllowUpdate::default(),
        )
        .unwrap();

        assert!(!cs.expired(Duration::from_secs(99)));
        assert!(cs.expired(Duration::from_secs(100)));
    }
}
