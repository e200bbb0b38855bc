use core::time::Duration;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics24_host::identifier::ChainId;
use crate::Height;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    pub chain_id: ChainId,
    pub latest_height: Height,
}

impl ClientState {
    pub fn new(chain_id: ChainId, latest_height: Height) -> Self {
        Self {
            chain_id,
            latest_height,
        }
    }
}

impl crate::core::ics02_client::client_state::ClientState for ClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Localhost
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn frozen_height(&self) -> Option<Height> {
        None
    }

    fn expired(&self, _elapsed: Duration) -> bool {
        false
    }
}
