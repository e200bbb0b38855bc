use core::fmt::{self, Debug, Display, Formatter};

use subtle_encoding::{Encoding, Hex};

use super::error::Error;
use super::merkle::{Hash, MerkleProof};

fn hex_upper(bytes: &[u8]) -> String {
    Hex::upper_case().encode_to_string(bytes).unwrap_or_default()
}

/// The root of a counterparty's state tree at some height.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommitmentRoot {
    bytes: Vec<u8>,
}

impl CommitmentRoot {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Vec::from(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for CommitmentRoot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentRoot({})", hex_upper(&self.bytes))
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<Hash> for CommitmentRoot {
    fn from(hash: Hash) -> Self {
        Self {
            bytes: hash.to_vec(),
        }
    }
}

/// The store prefix under which a chain commits its IBC state, e.g. `ibc`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommitmentPrefix {
    bytes: Vec<u8>,
}

impl CommitmentPrefix {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

/// The `ibc` store prefix used by Cosmos SDK chains.
impl Default for CommitmentPrefix {
    fn default() -> Self {
        Self {
            bytes: b"ibc".to_vec(),
        }
    }
}

impl TryFrom<Vec<u8>> for CommitmentPrefix {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Error::empty_commitment_prefix())
        } else {
            Ok(Self { bytes })
        }
    }
}

impl Debug for CommitmentPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match String::from_utf8(self.bytes.clone()) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<not valid UTF8: {}>", hex_upper(&self.bytes)),
        }
    }
}

impl Display for CommitmentPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// Opaque proof bytes as carried by handshake and packet messages. How they
/// are interpreted depends on the light client verifying them: a Merkle proof
/// for validator-set clients, a timestamped signature for solo machines.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommitmentProofBytes {
    bytes: Vec<u8>,
}

impl CommitmentProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CommitmentProofBytes({})", hex_upper(&self.bytes))
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Error::empty_merkle_proof())
        } else {
            Ok(Self { bytes })
        }
    }
}

impl From<CommitmentProofBytes> for Vec<u8> {
    fn from(p: CommitmentProofBytes) -> Vec<u8> {
        p.bytes
    }
}

impl From<MerkleProof> for CommitmentProofBytes {
    fn from(proof: MerkleProof) -> Self {
        Self {
            bytes: proof.encode_vec(),
        }
    }
}

impl TryFrom<&CommitmentProofBytes> for MerkleProof {
    type Error = Error;

    fn try_from(value: &CommitmentProofBytes) -> Result<Self, Self::Error> {
        MerkleProof::decode_vec(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn empty_prefix_and_proof_are_rejected() {
        assert!(CommitmentPrefix::try_from(vec![]).is_err());
        assert!(CommitmentProofBytes::try_from(vec![]).is_err());
        assert_eq!(
            CommitmentPrefix::try_from(b"ibc".to_vec()).unwrap().to_string(),
            "ibc"
        );
    }
}
