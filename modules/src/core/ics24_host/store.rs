use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::core::ics23_commitment::merkle::MerkleProof;
use crate::core::ics24_host::path::Path;

/// The key-value contract the engine consumes from its host.
///
/// Values are written under ICS-24 [`Path`]s. At the end of every block the
/// host calls [`ProvableStore::commit`], which fixes a version and yields the
/// root a counterparty light client will track for that height. Proofs are
/// always produced against a committed version, never against pending writes.
pub trait ProvableStore {
    /// Reads the pending (uncommitted) value at `path`.
    fn get(&self, path: &Path) -> Option<Vec<u8>>;

    fn set(&mut self, path: Path, value: Vec<u8>);

    fn delete(&mut self, path: &Path);

    /// Seals the pending state as version `version` and returns its root.
    fn commit(&mut self, version: u64) -> CommitmentRoot;

    /// Root of a committed version, if it is still retained.
    fn root(&self, version: u64) -> Option<CommitmentRoot>;

    /// Membership or non-membership proof for `path` against the root of
    /// `version`. A proof is returned whether or not the path holds a value.
    fn proof(&self, version: u64, path: &Path) -> Option<MerkleProof>;

    /// Value at `path` as of a committed `version`.
    fn get_at(&self, version: u64, path: &Path) -> Option<Vec<u8>>;
}
