use crate::core::ics02_client::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::timestamp::Timestamp;
use crate::Height;

/// One signed statement: `data` at `path`, as of `timestamp`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureAndData {
    pub signature: Vec<u8>,
    pub path: Vec<u8>,
    pub data: Vec<u8>,
    pub timestamp: Timestamp,
}

/// Two different statements signed for the same sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Misbehaviour {
    pub client_id: ClientId,
    pub sequence: u64,
    pub signature_one: SignatureAndData,
    pub signature_two: SignatureAndData,
}

impl Misbehaviour {
    pub fn validate_basic(&self) -> Result<(), Error> {
        if self.sequence == 0 {
            return Err(Error::invalid_misbehaviour("sequence cannot be zero".to_string()));
        }
        for sd in [&self.signature_one, &self.signature_two] {
            if sd.signature.is_empty() || sd.path.is_empty() || !sd.timestamp.is_set() {
                return Err(Error::invalid_misbehaviour(
                    "signature, path and timestamp must be set".to_string(),
                ));
            }
        }
        if self.signature_one.signature == self.signature_two.signature {
            return Err(Error::invalid_misbehaviour(
                "misbehaviour signatures cannot be equal".to_string(),
            ));
        }
        if self.signature_one.path == self.signature_two.path
            && self.signature_one.data == self.signature_two.data
        {
            return Err(Error::invalid_misbehaviour(
                "misbehaviour signs the same statement twice".to_string(),
            ));
        }
        Ok(())
    }
}

impl crate::core::ics02_client::misbehaviour::Misbehaviour for Misbehaviour {
    fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    fn height(&self) -> Height {
        Height::new(0, self.sequence)
    }
}
