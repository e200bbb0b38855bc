//! Host chain types and methods, used by the context mock.
//!
//! Every block of a mock host is a validator-set header signed by the host's
//! validators, with the store root committed at that height as its app hash.
//! A counterparty tracks the mock host with an ordinary tendermint client.

use secp256k1::SecretKey;
use sha2::{Digest, Sha256};

use crate::clients::ics07_tendermint::consensus_state::ConsensusState as TmConsensusState;
use crate::clients::ics07_tendermint::header::{BlockHeader, Header as TmHeader, SignedHeader};
use crate::clients::ics07_tendermint::validator::ValidatorSet;
use crate::core::ics02_client::consensus_state::AnyConsensusState;
use crate::core::ics02_client::header::AnyHeader;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::core::ics24_host::identifier::ChainId;
use crate::timestamp::Timestamp;
use crate::Height;

/// Voting power of every mock validator.
pub const VALIDATOR_POWER: u64 = 10;

/// Derives a valid secp256k1 key from `seed`, rehashing in the (unlikely)
/// case a digest falls outside the curve order.
pub fn derive_secret_key(seed: &[u8]) -> SecretKey {
    let mut digest: [u8; 32] = Sha256::digest(seed).into();
    loop {
        if let Ok(sk) = SecretKey::from_slice(&digest) {
            return sk;
        }
        digest = Sha256::digest(digest).into();
    }
}

/// The validator keys of a mock host, a function of its chain id.
pub fn validator_keys(chain_id: &ChainId, count: usize) -> Vec<SecretKey> {
    (0..count)
        .map(|i| derive_secret_key(format!("{}/validator/{}", chain_id, i).as_bytes()))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostBlock {
    pub signed_header: SignedHeader,
    pub validator_set: ValidatorSet,
}

impl HostBlock {
    /// Produces the block at `height`, signed by every key in `validators`.
    /// The validator set never changes.
    pub fn generate(
        chain_id: &ChainId,
        height: u64,
        time: Timestamp,
        app_hash: CommitmentRoot,
        validators: &[SecretKey],
    ) -> Self {
        let validator_set = ValidatorSet::from_secret_keys(validators, VALIDATOR_POWER);
        let header = BlockHeader {
            chain_id: chain_id.clone(),
            height,
            time,
            app_hash,
            validators_hash: validator_set.hash(),
            next_validators_hash: validator_set.hash(),
        };

        Self {
            signed_header: SignedHeader::sign(header, validators),
            validator_set,
        }
    }

    pub fn height(&self) -> Height {
        let header = &self.signed_header.header;
        Height::new(header.chain_id.version(), header.height)
    }

    pub fn timestamp(&self) -> Timestamp {
        self.signed_header.header.time
    }

    pub fn app_hash(&self) -> &CommitmentRoot {
        &self.signed_header.header.app_hash
    }

    /// A header a counterparty client trusting `trusted_height` (and the
    /// validators it recorded there) can verify.
    pub fn into_header(
        self,
        trusted_height: Height,
        trusted_validator_set: ValidatorSet,
    ) -> TmHeader {
        TmHeader {
            signed_header: self.signed_header,
            validator_set: self.validator_set,
            trusted_height,
            trusted_validator_set,
        }
    }

    pub fn consensus_state(&self) -> TmConsensusState {
        let header = &self.signed_header.header;
        TmConsensusState::new(
            header.app_hash.clone(),
            header.time,
            header.next_validators_hash,
        )
    }
}

impl From<HostBlock> for AnyConsensusState {
    fn from(block: HostBlock) -> Self {
        AnyConsensusState::Tendermint(block.consensus_state())
    }
}

impl From<HostBlock> for AnyHeader {
    /// A header trusting its own validator set at the previous height.
    fn from(block: HostBlock) -> Self {
        let trusted_height = block.height().decrement().unwrap_or_else(|_| block.height());
        let trusted_validator_set = block.validator_set.clone();
        AnyHeader::Tendermint(block.into_header(trusted_height, trusted_validator_set))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics23_commitment::merkle::EMPTY_HASH;

    #[test]
    fn blocks_are_signed_by_the_host_validators() {
        let chain_id = ChainId::new("mockgaia".to_string(), 1);
        let keys = validator_keys(&chain_id, 2);
        let time = Timestamp::from_nanoseconds(1_000_000_000).unwrap();

        let block =
            HostBlock::generate(&chain_id, 7, time, CommitmentRoot::from(EMPTY_HASH), &keys);

        assert_eq!(block.height(), Height::new(1, 7));
        assert_eq!(block.timestamp(), time);
        assert_eq!(block.signed_header.commit.signatures.len(), 2);
        assert_eq!(
            block.validator_set.total_voting_power(),
            2 * VALIDATOR_POWER
        );
        assert_eq!(
            block.consensus_state().next_validators_hash,
            block.validator_set.hash()
        );

        // Keys are a function of the chain id only.
        assert_eq!(keys, validator_keys(&chain_id, 2));
        assert_ne!(
            keys,
            validator_keys(&ChainId::new("other".to_string(), 1), 2)
        );
    }
}
