//! Packet and acknowledgement commitments, and the acknowledgement type.

use core::fmt::{Debug, Error as FmtError, Formatter};

use serde_derive::Serialize;
use sha2::{Digest, Sha256};
use subtle_encoding::{Encoding, Hex};

use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::timestamp::Timestamp;

/// The hash a sending chain stores for every packet in flight.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Debug for PacketCommitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let hex = Hex::upper_case().encode_to_string(&self.0).map_err(|_| FmtError)?;
        write!(f, "PacketCommitment({})", hex)
    }
}

/// The hash a receiving chain stores for every acknowledgement it writes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Debug for AcknowledgementCommitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let hex = Hex::upper_case().encode_to_string(&self.0).map_err(|_| FmtError)?;
        write!(f, "AcknowledgementCommitment({})", hex)
    }
}

/// The opaque acknowledgement an application returns for a received packet.
/// It is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Acknowledgement(
    #[serde(serialize_with = "crate::serializers::ser_hex_upper")] Vec<u8>,
);

impl Acknowledgement {
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::invalid_acknowledgement());
        }
        Ok(Self(bytes))
    }

    /// The conventional success envelope, `{"result":"AQ=="}`.
    pub fn success() -> Self {
        Self(br#"{"result":"AQ=="}"#.to_vec())
    }

    /// The conventional error envelope, `{"error":"<reason>"}`.
    pub fn from_error(reason: &str) -> Self {
        Self(serde_json::json!({ "error": reason }).to_string().into_bytes())
    }

    pub fn is_success(&self) -> bool {
        self.0.starts_with(br#"{"result""#)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

/// `sha256(timeout_timestamp ‖ revision_number ‖ revision_height ‖ sha256(data))`,
/// integers big-endian.
pub fn compute_packet_commitment(
    data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &Timestamp,
) -> PacketCommitment {
    let mut hasher = Sha256::new();
    hasher.update(timeout_timestamp.nanoseconds().to_be_bytes());
    hasher.update(timeout_height.commitment_revision_number().to_be_bytes());
    hasher.update(timeout_height.commitment_revision_height().to_be_bytes());
    hasher.update(Sha256::digest(data));
    PacketCommitment(hasher.finalize().to_vec())
}

pub fn compute_ack_commitment(ack: &Acknowledgement) -> AcknowledgementCommitment {
    AcknowledgementCommitment(Sha256::digest(ack.as_bytes()).to_vec())
}
