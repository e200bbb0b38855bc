use core::time::Duration;

use crate::clients::ics06_solomachine::consensus_state::ConsensusState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::Height;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    /// The next sequence a header must carry. Also the latest height.
    pub sequence: u64,
    pub frozen_height: Option<Height>,
    pub consensus_state: ConsensusState,
    /// Whether governance may replace this client with a substitute.
    pub allow_update_after_proposal: bool,
}

impl ClientState {
    pub fn new(
        sequence: u64,
        consensus_state: ConsensusState,
        allow_update_after_proposal: bool,
    ) -> Result<Self, Error> {
        if sequence == 0 {
            return Err(Error::invalid_client_state(
                "solo machine sequence cannot be zero".to_string(),
            ));
        }
        consensus_state.validate_basic()?;

        Ok(Self {
            sequence,
            frozen_height: None,
            consensus_state,
            allow_update_after_proposal,
        })
    }

    pub fn latest_height(&self) -> Height {
        Height::new(0, self.sequence)
    }

    pub fn with_frozen_height(self, h: Height) -> Self {
        Self {
            frozen_height: Some(h),
            ..self
        }
    }
}

impl crate::core::ics02_client::client_state::ClientState for ClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Solomachine
    }

    fn latest_height(&self) -> Height {
        self.latest_height()
    }

    fn frozen_height(&self) -> Option<Height> {
        self.frozen_height
    }

    /// Solo machines never expire; they freeze.
    fn expired(&self, _elapsed: Duration) -> bool {
        false
    }
}
