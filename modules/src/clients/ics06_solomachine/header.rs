use prost::Message;
use secp256k1::SecretKey;

use crate::clients::crypto::{self, PublicKey};
use crate::clients::ics06_solomachine::proof::{HeaderData, SignBytes};
use crate::clients::ics06_solomachine::SENTINEL_HEADER_PATH;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::timestamp::Timestamp;
use crate::Height;

/// Rotates the solo machine to a new key and diversifier. Signed with the
/// key being rotated out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub signature: Vec<u8>,
    pub new_public_key: PublicKey,
    pub new_diversifier: String,
}

impl Header {
    /// Builds and signs a header with `secret_key` (the current key).
    pub fn new_signed(
        secret_key: &SecretKey,
        sequence: u64,
        timestamp: Timestamp,
        diversifier: &str,
        new_public_key: PublicKey,
        new_diversifier: String,
    ) -> Self {
        let sign_bytes = Self::sign_bytes(
            sequence,
            timestamp,
            diversifier,
            &new_public_key,
            &new_diversifier,
        );
        Self {
            sequence,
            timestamp,
            signature: crypto::sign(secret_key, &sign_bytes),
            new_public_key,
            new_diversifier,
        }
    }

    pub fn sign_bytes(
        sequence: u64,
        timestamp: Timestamp,
        diversifier: &str,
        new_public_key: &PublicKey,
        new_diversifier: &str,
    ) -> Vec<u8> {
        let data = HeaderData {
            new_pub_key: new_public_key.to_bytes().to_vec(),
            new_diversifier: new_diversifier.to_string(),
        }
        .encode_to_vec();

        SignBytes::new(
            sequence,
            timestamp,
            diversifier,
            SENTINEL_HEADER_PATH.as_bytes().to_vec(),
            data,
        )
        .encode_to_vec()
    }

    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.sequence == 0 {
            return Err(Error::invalid_header("sequence cannot be zero".to_string()));
        }
        if !self.timestamp.is_set() {
            return Err(Error::invalid_header("timestamp cannot be zero".to_string()));
        }
        if self.signature.is_empty() {
            return Err(Error::invalid_header("signature cannot be empty".to_string()));
        }
        if !self.new_diversifier.is_empty() && self.new_diversifier.trim().is_empty() {
            return Err(Error::invalid_header(
                "diversifier cannot consist of whitespace only".to_string(),
            ));
        }
        Ok(())
    }
}

impl crate::core::ics02_client::header::Header for Header {
    fn client_type(&self) -> ClientType {
        ClientType::Solomachine
    }

    /// Height of the consensus state the header installs: the sequence after it.
    fn height(&self) -> Height {
        Height::new(0, self.sequence + 1)
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
