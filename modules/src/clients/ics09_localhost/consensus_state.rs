use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    pub timestamp: Timestamp,
}

impl ConsensusState {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }
}

impl crate::core::ics02_client::consensus_state::ConsensusState for ConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Localhost
    }

    /// There is nothing to commit to: proofs are reads of the live store.
    fn root(&self) -> CommitmentRoot {
        CommitmentRoot::from_bytes(&[])
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
