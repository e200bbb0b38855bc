use crate::clients::ics07_tendermint::header::Header;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::core::ics23_commitment::merkle::Hash;
use crate::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
    pub next_validators_hash: Hash,
}

impl ConsensusState {
    pub fn new(root: CommitmentRoot, timestamp: Timestamp, next_validators_hash: Hash) -> Self {
        Self {
            timestamp,
            root,
            next_validators_hash,
        }
    }
}

impl crate::core::ics02_client::consensus_state::ConsensusState for ConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Tendermint
    }

    fn root(&self) -> CommitmentRoot {
        self.root.clone()
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl From<Header> for ConsensusState {
    fn from(header: Header) -> Self {
        let block = header.signed_header.header;
        Self {
            root: block.app_hash,
            timestamp: block.time,
            next_validators_hash: block.next_validators_hash,
        }
    }
}
