use std::collections::BTreeSet;

use secp256k1::SecretKey;
use sha2::{Digest, Sha256};

use crate::clients::crypto::PublicKey;
use crate::core::ics23_commitment::merkle::Hash;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    pub public_key: PublicKey,
    pub voting_power: u64,
}

impl Validator {
    pub fn new(public_key: PublicKey, voting_power: u64) -> Self {
        Self {
            public_key,
            voting_power,
        }
    }
}

/// A set of validators, kept sorted by public key so that two sets with the
/// same members always hash alike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    total_voting_power: u64,
}

impl ValidatorSet {
    pub fn new(mut validators: Vec<Validator>) -> Self {
        validators.sort_by(|a, b| a.public_key.cmp(&b.public_key));
        validators.dedup_by(|a, b| a.public_key == b.public_key);

        let total_voting_power = validators
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.voting_power));

        Self {
            validators,
            total_voting_power,
        }
    }

    /// A set where each of `keys` carries the same `voting_power`.
    pub fn from_secret_keys(keys: &[SecretKey], voting_power: u64) -> Self {
        Self::new(
            keys.iter()
                .map(|sk| Validator::new(PublicKey::from_secret_key(sk), voting_power))
                .collect(),
        )
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn total_voting_power(&self) -> u64 {
        self.total_voting_power
    }

    pub fn validator(&self, public_key: &PublicKey) -> Option<&Validator> {
        self.validators
            .binary_search_by(|v| v.public_key.cmp(public_key))
            .ok()
            .map(|i| &self.validators[i])
    }

    /// `sha256` over every `(public key, big-endian voting power)` pair.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        for v in &self.validators {
            hasher.update(v.public_key.to_bytes());
            hasher.update(v.voting_power.to_be_bytes());
        }
        hasher.finalize().into()
    }

    /// Voting power behind the given signers, each counted once. Signers
    /// outside the set contribute nothing.
    pub fn voting_power_of<'a>(&self, signers: impl IntoIterator<Item = &'a PublicKey>) -> u64 {
        let mut seen = BTreeSet::new();
        signers
            .into_iter()
            .filter(|pk| seen.insert(**pk))
            .filter_map(|pk| self.validator(pk))
            .fold(0u64, |acc, v| acc.saturating_add(v.voting_power))
    }
}
