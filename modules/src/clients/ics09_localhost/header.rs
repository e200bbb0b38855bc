use crate::core::ics02_client::client_type::ClientType;
use crate::timestamp::Timestamp;
use crate::Height;

/// Moves the loopback client to the host's current height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub height: Height,
    pub timestamp: Timestamp,
}

impl crate::core::ics02_client::header::Header for Header {
    fn client_type(&self) -> ClientType {
        ClientType::Localhost
    }

    fn height(&self) -> Height {
        self.height
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
