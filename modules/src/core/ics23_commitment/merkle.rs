//! A sparse Merkle tree of depth 256 keyed by the SHA-256 of the full store
//! key (`{prefix}/{path}`).
//!
//! - leaf: `sha256(0x00 || key_hash || sha256(value))`
//! - inner node: `sha256(0x01 || left || right)`
//! - an empty subtree hashes to 32 zero bytes, and an inner node with two
//!   empty children is itself empty
//!
//! A proof is the list of 256 sibling hashes on the path from the leaf to the
//! root. Non-membership is proven by showing that the empty leaf hashes up to
//! the same root.

use std::collections::BTreeMap;

use prost::Message;
use sha2::{Digest, Sha256};

use super::commitment::{CommitmentPrefix, CommitmentRoot};
use super::error::Error;

pub const HASH_LEN: usize = 32;
pub const TREE_DEPTH: usize = 256;

pub type Hash = [u8; HASH_LEN];

/// Hash of an empty subtree at any depth.
pub const EMPTY_HASH: Hash = [0; HASH_LEN];

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

fn key_hash(key: &[u8]) -> Hash {
    Sha256::digest(key).into()
}

fn leaf_hash(key_hash: &Hash, value: &[u8]) -> Hash {
    let value_hash = Sha256::digest(value);
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(key_hash);
    hasher.update(value_hash);
    hasher.finalize().into()
}

fn inner_hash(left: &Hash, right: &Hash) -> Hash {
    if left == &EMPTY_HASH && right == &EMPTY_HASH {
        return EMPTY_HASH;
    }
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Bit `depth` of `key`, most significant bit first. `true` goes right.
fn bit(key: &Hash, depth: usize) -> bool {
    (key[depth / 8] >> (7 - depth % 8)) & 1 == 1
}

/// A fully qualified key in the commitment tree: the chain's store prefix
/// followed by an ICS-24 path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    pub key_path: Vec<String>,
}

impl MerklePath {
    pub fn key(&self) -> Vec<u8> {
        self.key_path.join("/").into_bytes()
    }
}

pub fn apply_prefix(prefix: &CommitmentPrefix, path: String) -> MerklePath {
    MerklePath {
        key_path: vec![String::from_utf8_lossy(prefix.as_bytes()).into_owned(), path],
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct RawMerkleProof {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub siblings: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    /// Sibling hashes ordered from the leaf level up to the children of the root.
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    pub fn encode_vec(&self) -> Vec<u8> {
        RawMerkleProof {
            siblings: self.siblings.iter().map(|s| s.to_vec()).collect(),
        }
        .encode_to_vec()
    }

    pub fn decode_vec(bytes: &[u8]) -> Result<Self, Error> {
        let raw = RawMerkleProof::decode(bytes).map_err(Error::invalid_raw_merkle_proof)?;
        Self::try_from(raw)
    }

    pub fn verify_membership(
        &self,
        root: &CommitmentRoot,
        path: &MerklePath,
        value: &[u8],
    ) -> Result<(), Error> {
        if root.is_empty() {
            return Err(Error::empty_merkle_root());
        }
        if value.is_empty() {
            return Err(Error::empty_verified_value());
        }

        let key = key_hash(&path.key());
        let computed = self.compute_root(&key, leaf_hash(&key, value))?;
        if computed.as_slice() == root.as_bytes() {
            Ok(())
        } else {
            Err(Error::verification_failure())
        }
    }

    pub fn verify_non_membership(
        &self,
        root: &CommitmentRoot,
        path: &MerklePath,
    ) -> Result<(), Error> {
        if root.is_empty() {
            return Err(Error::empty_merkle_root());
        }

        let key = key_hash(&path.key());
        let computed = self.compute_root(&key, EMPTY_HASH)?;
        if computed.as_slice() == root.as_bytes() {
            Ok(())
        } else {
            Err(Error::verification_failure())
        }
    }

    fn compute_root(&self, key: &Hash, leaf: Hash) -> Result<Hash, Error> {
        if self.siblings.len() != TREE_DEPTH {
            return Err(Error::invalid_merkle_proof(TREE_DEPTH, self.siblings.len()));
        }

        let root = self
            .siblings
            .iter()
            .enumerate()
            .fold(leaf, |node, (i, sibling)| {
                if bit(key, TREE_DEPTH - 1 - i) {
                    inner_hash(sibling, &node)
                } else {
                    inner_hash(&node, sibling)
                }
            });

        Ok(root)
    }
}

impl TryFrom<RawMerkleProof> for MerkleProof {
    type Error = Error;

    fn try_from(raw: RawMerkleProof) -> Result<Self, Self::Error> {
        if raw.siblings.is_empty() {
            return Err(Error::empty_merkle_proof());
        }

        let siblings = raw
            .siblings
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                Hash::try_from(s.as_slice()).map_err(|_| Error::invalid_sibling_hash(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { siblings })
    }
}

/// An immutable snapshot of key/value pairs organised as a sparse Merkle tree.
#[derive(Clone, Debug, Default)]
pub struct MerkleTree {
    /// `(key_hash, leaf_hash)` sorted by key hash.
    leaves: Vec<(Hash, Hash)>,
}

impl MerkleTree {
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let leaves: BTreeMap<Hash, Hash> = entries
            .into_iter()
            .map(|(k, v)| {
                let key = key_hash(k.as_ref());
                (key, leaf_hash(&key, v.as_ref()))
            })
            .collect();

        Self {
            leaves: leaves.into_iter().collect(),
        }
    }

    pub fn root(&self) -> CommitmentRoot {
        CommitmentRoot::from(subtree_root(&self.leaves, 0))
    }

    /// Proof for `key`, valid as a membership proof if the tree holds the key
    /// and as a non-membership proof otherwise.
    pub fn prove(&self, key: &[u8]) -> MerkleProof {
        let key = key_hash(key);
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        let mut leaves = self.leaves.as_slice();

        for depth in 0..TREE_DEPTH {
            let (left, right) = split(leaves, depth);
            if bit(&key, depth) {
                siblings.push(subtree_root(left, depth + 1));
                leaves = right;
            } else {
                siblings.push(subtree_root(right, depth + 1));
                leaves = left;
            }
        }

        siblings.reverse();
        MerkleProof { siblings }
    }
}

/// Splits leaves sharing the first `depth` bits by the bit at `depth`.
fn split(leaves: &[(Hash, Hash)], depth: usize) -> (&[(Hash, Hash)], &[(Hash, Hash)]) {
    let at = leaves.partition_point(|(key, _)| !bit(key, depth));
    leaves.split_at(at)
}

fn subtree_root(leaves: &[(Hash, Hash)], depth: usize) -> Hash {
    match leaves {
        [] => EMPTY_HASH,
        [(_, leaf)] if depth == TREE_DEPTH => *leaf,
        _ => {
            let (left, right) = split(leaves, depth);
            inner_hash(&subtree_root(left, depth + 1), &subtree_root(right, depth + 1))
        }
    }
}
