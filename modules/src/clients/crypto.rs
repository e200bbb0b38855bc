//! secp256k1 keys and signatures shared by the validator-set and solo
//! machine clients. Messages are always signed as their SHA-256 digest.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};

use flex_error::define_error;
use secp256k1::{ecdsa, Message, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use subtle_encoding::{Encoding, Hex};

pub const PUBLIC_KEY_LEN: usize = 33;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    CryptoError {
        InvalidPublicKey
            | _ | { "invalid compressed secp256k1 public key" },

        InvalidSignatureFormat
            | _ | { "signature is not a 64 byte compact ecdsa signature" },

        SignatureMismatch
            | _ | { "signature does not verify against the public key" },
    }
}

fn digest(msg: &[u8]) -> Message {
    let hash: [u8; 32] = Sha256::digest(msg).into();
    // A 32 byte digest is always a valid message.
    Message::from_slice(&hash).unwrap_or_else(|_| unreachable!())
}

/// A compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::invalid_public_key())
    }

    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self(secp256k1::PublicKey::from_secret_key(
            &Secp256k1::signing_only(),
            secret_key,
        ))
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.serialize()
    }

    /// Key identity used wherever a security decision depends on two keys
    /// being the same: equal iff the compressed encodings are equal.
    pub fn same_key(&self, other: &PublicKey) -> bool {
        self.to_bytes() == other.to_bytes()
    }

    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let signature = ecdsa::Signature::from_compact(signature)
            .map_err(|_| CryptoError::invalid_signature_format())?;

        Secp256k1::verification_only()
            .verify_ecdsa(&digest(msg), &signature, &self.0)
            .map_err(|_| CryptoError::signature_mismatch())
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let hex = Hex::upper_case()
            .encode_to_string(self.to_bytes())
            .map_err(|_| fmt::Error)?;
        write!(f, "{}", hex)
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

/// Signs `msg` (hashed with SHA-256) and returns the 64 byte compact signature.
pub fn sign(secret_key: &SecretKey, msg: &[u8]) -> Vec<u8> {
    Secp256k1::signing_only()
        .sign_ecdsa(&digest(msg), secret_key)
        .serialize_compact()
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::get_dummy_secret_key;
    use test_log::test;

    #[test]
    fn signatures_verify_only_for_the_signed_message_and_key() {
        let sk = get_dummy_secret_key(1);
        let pk = PublicKey::from_secret_key(&sk);
        let other = PublicKey::from_secret_key(&get_dummy_secret_key(2));

        let sig = sign(&sk, b"hello");
        assert!(pk.verify(b"hello", &sig).is_ok());
        assert!(pk.verify(b"hellO", &sig).is_err());
        assert!(other.verify(b"hello", &sig).is_err());
        assert!(pk.verify(b"hello", &sig[1..]).is_err());
    }

    #[test]
    fn key_identity_follows_encoding() {
        let pk = PublicKey::from_secret_key(&get_dummy_secret_key(3));
        let decoded = PublicKey::from_bytes(&pk.to_bytes()).unwrap();
        assert!(pk.same_key(&decoded));
        assert!(!pk.same_key(&PublicKey::from_secret_key(&get_dummy_secret_key(4))));
        assert!(PublicKey::from_bytes(&[7u8; 10]).is_err());
    }
}
