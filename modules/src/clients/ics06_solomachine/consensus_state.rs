use crate::clients::crypto::PublicKey;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::timestamp::Timestamp;

/// The solo machine's current signing identity. The public key plays the
/// role a commitment root plays for other clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    pub public_key: PublicKey,
    /// Distinguishes several solo machines sharing one key.
    pub diversifier: String,
    pub timestamp: Timestamp,
}

impl ConsensusState {
    pub fn new(public_key: PublicKey, diversifier: String, timestamp: Timestamp) -> Self {
        Self {
            public_key,
            diversifier,
            timestamp,
        }
    }

    pub fn validate_basic(&self) -> Result<(), Error> {
        if !self.timestamp.is_set() {
            return Err(Error::invalid_consensus_state(
                "solo machine timestamp cannot be zero".to_string(),
            ));
        }
        if !self.diversifier.is_empty() && self.diversifier.trim().is_empty() {
            return Err(Error::invalid_consensus_state(
                "diversifier cannot consist of whitespace only".to_string(),
            ));
        }
        Ok(())
    }
}

impl crate::core::ics02_client::consensus_state::ConsensusState for ConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Solomachine
    }

    fn root(&self) -> CommitmentRoot {
        CommitmentRoot::from_bytes(&self.public_key.to_bytes())
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
