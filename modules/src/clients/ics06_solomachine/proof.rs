//! What a solo machine signs, and how a signature travels as proof bytes.

use prost::Message;
use secp256k1::SecretKey;

use crate::clients::crypto;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::timestamp::Timestamp;

#[derive(Clone, PartialEq, Message)]
pub struct SignBytes {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    #[prost(string, tag = "3")]
    pub diversifier: String,
    #[prost(bytes = "vec", tag = "4")]
    pub path: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub data: Vec<u8>,
}

/// The data signed by a key-rotating header.
#[derive(Clone, PartialEq, Message)]
pub struct HeaderData {
    #[prost(bytes = "vec", tag = "1")]
    pub new_pub_key: Vec<u8>,
    #[prost(string, tag = "2")]
    pub new_diversifier: String,
}

/// Proof bytes of a solo machine: a signature plus the time it was made.
#[derive(Clone, PartialEq, Message)]
pub struct TimestampedSignatureData {
    #[prost(bytes = "vec", tag = "1")]
    pub signature_data: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
}

impl SignBytes {
    pub fn new(
        sequence: u64,
        timestamp: Timestamp,
        diversifier: &str,
        path: Vec<u8>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            sequence,
            timestamp: timestamp.nanoseconds(),
            diversifier: diversifier.to_string(),
            path,
            data,
        }
    }
}

impl TimestampedSignatureData {
    pub fn decode_proof(proof: &CommitmentProofBytes) -> Result<Self, Error> {
        Self::decode(proof.as_bytes())
            .map_err(|e| Error::invalid_signature_proof(format!("cannot decode proof: {}", e)))
    }
}

/// Produces the proof bytes a solo machine hands to a counterparty to prove
/// that `path` holds `data` (or, with empty `data`, that it holds nothing).
pub fn sign_proof(
    secret_key: &SecretKey,
    sequence: u64,
    diversifier: &str,
    timestamp: Timestamp,
    path: Vec<u8>,
    data: Vec<u8>,
) -> Result<CommitmentProofBytes, Error> {
    let sign_bytes = SignBytes::new(sequence, timestamp, diversifier, path, data).encode_to_vec();

    let proof = TimestampedSignatureData {
        signature_data: crypto::sign(secret_key, &sign_bytes),
        timestamp: timestamp.nanoseconds(),
    };

    CommitmentProofBytes::try_from(proof.encode_to_vec()).map_err(Error::invalid_proof)
}
