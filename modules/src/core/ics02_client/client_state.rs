use core::fmt::Debug;
use core::marker::{Send, Sync};
use core::time::Duration;

use crate::clients::ics06_solomachine::client_state::ClientState as SolomachineClientState;
use crate::clients::ics07_tendermint::client_state::ClientState as TendermintClientState;
use crate::clients::ics09_localhost::client_state::ClientState as LocalhostClientState;
use crate::core::ics02_client::client_type::ClientType;
use crate::Height;

pub trait ClientState: Clone + Debug + Send + Sync {
    /// Type of client associated with this state (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// Latest height of consensus state
    fn latest_height(&self) -> Height;

    /// Frozen height of the client
    fn frozen_height(&self) -> Option<Height>;

    /// Freeze status of the client
    fn is_frozen(&self) -> bool {
        self.frozen_height().is_some()
    }

    /// Whether a latest consensus state `elapsed` old is past the trust window.
    fn expired(&self, elapsed: Duration) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyClientState {
    Tendermint(TendermintClientState),
    Solomachine(SolomachineClientState),
    Localhost(LocalhostClientState),
}

impl ClientState for AnyClientState {
    fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(cs) => cs.client_type(),
            Self::Solomachine(cs) => cs.client_type(),
            Self::Localhost(cs) => cs.client_type(),
        }
    }

    fn latest_height(&self) -> Height {
        match self {
            Self::Tendermint(cs) => cs.latest_height(),
            Self::Solomachine(cs) => cs.latest_height(),
            Self::Localhost(cs) => cs.latest_height(),
        }
    }

    fn frozen_height(&self) -> Option<Height> {
        match self {
            Self::Tendermint(cs) => cs.frozen_height(),
            Self::Solomachine(cs) => cs.frozen_height(),
            Self::Localhost(cs) => cs.frozen_height(),
        }
    }

    fn expired(&self, elapsed: Duration) -> bool {
        match self {
            Self::Tendermint(cs) => cs.expired(elapsed),
            Self::Solomachine(cs) => cs.expired(elapsed),
            Self::Localhost(cs) => cs.expired(elapsed),
        }
    }
}

impl From<TendermintClientState> for AnyClientState {
    fn from(cs: TendermintClientState) -> Self {
        Self::Tendermint(cs)
    }
}

impl From<SolomachineClientState> for AnyClientState {
    fn from(cs: SolomachineClientState) -> Self {
        Self::Solomachine(cs)
    }
}

impl From<LocalhostClientState> for AnyClientState {
    fn from(cs: LocalhostClientState) -> Self {
        Self::Localhost(cs)
    }
}
