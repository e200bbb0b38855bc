use core::fmt::{Display, Error as FmtError, Formatter};

use prost::Message;
use secp256k1::SecretKey;
use sha2::{Digest, Sha256};

use crate::clients::crypto::{self, PublicKey};
use crate::clients::ics07_tendermint::validator::ValidatorSet;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::core::ics23_commitment::merkle::Hash;
use crate::core::ics24_host::identifier::ChainId;
use crate::timestamp::Timestamp;
use crate::Height;

#[derive(Clone, PartialEq, Message)]
struct RawBlockHeader {
    #[prost(string, tag = "1")]
    chain_id: String,
    #[prost(uint64, tag = "2")]
    height: u64,
    #[prost(uint64, tag = "3")]
    time: u64,
    #[prost(bytes = "vec", tag = "4")]
    app_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    validators_hash: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    next_validators_hash: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct RawVote {
    #[prost(string, tag = "1")]
    chain_id: String,
    #[prost(uint64, tag = "2")]
    height: u64,
    #[prost(bytes = "vec", tag = "3")]
    block_hash: Vec<u8>,
}

/// The parts of a block header the light client reasons about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub chain_id: ChainId,
    pub height: u64,
    pub time: Timestamp,
    /// Root of the application store after this block.
    pub app_hash: CommitmentRoot,
    pub validators_hash: Hash,
    pub next_validators_hash: Hash,
}

impl BlockHeader {
    pub fn hash(&self) -> Hash {
        let raw = RawBlockHeader {
            chain_id: self.chain_id.to_string(),
            height: self.height,
            time: self.time.nanoseconds(),
            app_hash: self.app_hash.as_bytes().to_vec(),
            validators_hash: self.validators_hash.to_vec(),
            next_validators_hash: self.next_validators_hash.to_vec(),
        };
        Sha256::digest(raw.encode_to_vec()).into()
    }
}

/// Bytes each validator signs to vote for a block.
pub fn vote_sign_bytes(chain_id: &ChainId, height: u64, block_hash: &Hash) -> Vec<u8> {
    RawVote {
        chain_id: chain_id.to_string(),
        height,
        block_hash: block_hash.to_vec(),
    }
    .encode_to_vec()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSig {
    pub validator: PublicKey,
    pub signature: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub height: u64,
    pub block_hash: Hash,
    pub signatures: Vec<CommitSig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedHeader {
    pub header: BlockHeader,
    pub commit: Commit,
}

impl SignedHeader {
    /// Commits to `header` with a vote from each of `signers`.
    pub fn sign(header: BlockHeader, signers: &[SecretKey]) -> Self {
        let block_hash = header.hash();
        let sign_bytes = vote_sign_bytes(&header.chain_id, header.height, &block_hash);

        let signatures = signers
            .iter()
            .map(|sk| CommitSig {
                validator: PublicKey::from_secret_key(sk),
                signature: crypto::sign(sk, &sign_bytes),
            })
            .collect();

        Self {
            commit: Commit {
                height: header.height,
                block_hash,
                signatures,
            },
            header,
        }
    }
}

/// Tendermint consensus header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub signed_header: SignedHeader, // contains the commitment root
    pub validator_set: ValidatorSet, // the validator set that signed Header
    pub trusted_height: Height, // the height of a trusted header seen by client less than or equal to Header
    pub trusted_validator_set: ValidatorSet, // the last trusted validator set at trusted height
}

impl Header {
    pub fn height(&self) -> Height {
        Height::new(
            ChainId::chain_version(self.signed_header.header.chain_id.as_str()),
            self.signed_header.header.height,
        )
    }

    pub fn timestamp(&self) -> Timestamp {
        self.signed_header.header.time
    }
}

impl crate::core::ics02_client::header::Header for Header {
    fn client_type(&self) -> ClientType {
        ClientType::Tendermint
    }

    fn height(&self) -> Height {
        self.height()
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp()
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Header {{ height: {}, trusted_height: {}, signatures: {} }}",
            self.height(),
            self.trusted_height,
            self.signed_header.commit.signatures.len()
        )
    }
}
