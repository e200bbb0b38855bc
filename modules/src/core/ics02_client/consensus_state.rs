use core::fmt::Debug;
use core::marker::{Send, Sync};

use crate::clients::ics06_solomachine::consensus_state::ConsensusState as SolomachineConsensusState;
use crate::clients::ics07_tendermint::consensus_state::ConsensusState as TendermintConsensusState;
use crate::clients::ics09_localhost::consensus_state::ConsensusState as LocalhostConsensusState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::timestamp::Timestamp;

pub trait ConsensusState: Clone + Debug + Send + Sync {
    /// Type of client associated with this consensus state (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// Commitment root of the consensus state, which is used for key-value pair verification.
    fn root(&self) -> CommitmentRoot;

    /// The timestamp of the consensus state
    fn timestamp(&self) -> Timestamp;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyConsensusState {
    Tendermint(TendermintConsensusState),
    Solomachine(SolomachineConsensusState),
    Localhost(LocalhostConsensusState),
}

impl ConsensusState for AnyConsensusState {
    fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(cs) => cs.client_type(),
            Self::Solomachine(cs) => cs.client_type(),
            Self::Localhost(cs) => cs.client_type(),
        }
    }

    fn root(&self) -> CommitmentRoot {
        match self {
            Self::Tendermint(cs) => cs.root(),
            Self::Solomachine(cs) => cs.root(),
            Self::Localhost(cs) => cs.root(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::Tendermint(cs) => cs.timestamp(),
            Self::Solomachine(cs) => cs.timestamp(),
            Self::Localhost(cs) => cs.timestamp(),
        }
    }
}

impl From<TendermintConsensusState> for AnyConsensusState {
    fn from(cs: TendermintConsensusState) -> Self {
        Self::Tendermint(cs)
    }
}

impl From<SolomachineConsensusState> for AnyConsensusState {
    fn from(cs: SolomachineConsensusState) -> Self {
        Self::Solomachine(cs)
    }
}

impl From<LocalhostConsensusState> for AnyConsensusState {
    fn from(cs: LocalhostConsensusState) -> Self {
        Self::Localhost(cs)
    }
}
