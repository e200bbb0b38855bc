//! An in-memory [`ProvableStore`]: pending writes go to a plain map, every
//! commit freezes them into a Merkle snapshot that proofs are served from.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tracing::trace;

use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentRoot};
use crate::core::ics23_commitment::merkle::{apply_prefix, MerkleProof, MerkleTree};
use crate::core::ics24_host::path::Path;
use crate::core::ics24_host::store::ProvableStore;

#[derive(Debug)]
struct Snapshot {
    version: u64,
    values: BTreeMap<Path, Vec<u8>>,
    tree: MerkleTree,
    root: CommitmentRoot,
}

/// Committed snapshots are shared, so cloning the store (as the routing
/// layer does to stage a message) only copies the pending writes.
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    prefix: CommitmentPrefix,
    pending: BTreeMap<Path, Vec<u8>>,
    /// Ascending by version.
    committed: VecDeque<Arc<Snapshot>>,
    max_history_size: usize,
}

impl InMemoryStore {
    pub fn new(prefix: CommitmentPrefix, max_history_size: usize) -> Self {
        Self {
            prefix,
            pending: BTreeMap::new(),
            committed: VecDeque::new(),
            max_history_size: max_history_size.max(1),
        }
    }

    pub fn prefix(&self) -> &CommitmentPrefix {
        &self.prefix
    }

    pub fn latest_version(&self) -> Option<u64> {
        self.committed.back().map(|s| s.version)
    }

    fn snapshot(&self, version: u64) -> Option<&Snapshot> {
        self.committed
            .binary_search_by_key(&version, |s| s.version)
            .ok()
            .map(|i| self.committed[i].as_ref())
    }

    fn key(&self, path: &Path) -> Vec<u8> {
        apply_prefix(&self.prefix, path.to_string()).key()
    }
}

impl ProvableStore for InMemoryStore {
    fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.pending.get(path).cloned()
    }

    fn set(&mut self, path: Path, value: Vec<u8>) {
        self.pending.insert(path, value);
    }

    fn delete(&mut self, path: &Path) {
        self.pending.remove(path);
    }

    fn commit(&mut self, version: u64) -> CommitmentRoot {
        let values = self.pending.clone();
        let tree = MerkleTree::new(
            values
                .iter()
                .filter(|(path, _)| path.is_provable())
                .map(|(path, value)| (self.key(path), value.clone())),
        );
        let root = tree.root();

        trace!("committed store version {} with {} entries", version, values.len());

        // Re-committing a version replaces it.
        while self.committed.back().map_or(false, |s| s.version >= version) {
            self.committed.pop_back();
        }
        self.committed.push_back(Arc::new(Snapshot {
            version,
            values,
            tree,
            root: root.clone(),
        }));
        while self.committed.len() > self.max_history_size {
            self.committed.pop_front();
        }

        root
    }

    fn root(&self, version: u64) -> Option<CommitmentRoot> {
        self.snapshot(version).map(|s| s.root.clone())
    }

    fn proof(&self, version: u64, path: &Path) -> Option<MerkleProof> {
        if !path.is_provable() {
            return None;
        }
        let snapshot = self.snapshot(version)?;
        Some(snapshot.tree.prove(&self.key(path)))
    }

    fn get_at(&self, version: u64, path: &Path) -> Option<Vec<u8>> {
        self.snapshot(version)?.values.get(path).cloned()
    }
}
