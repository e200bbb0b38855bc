use core::fmt::Debug;

use crate::clients::ics06_solomachine::header::Header as SolomachineHeader;
use crate::clients::ics07_tendermint::header::Header as TendermintHeader;
use crate::clients::ics09_localhost::header::Header as LocalhostHeader;
use crate::core::ics02_client::client_type::ClientType;
use crate::timestamp::Timestamp;
use crate::Height;

/// Abstract of consensus state update information
pub trait Header: Clone + Debug + Send + Sync {
    /// The type of client (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// The height of the consensus state
    fn height(&self) -> Height;

    /// The timestamp of the consensus state
    fn timestamp(&self) -> Timestamp;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyHeader {
    Tendermint(TendermintHeader),
    Solomachine(SolomachineHeader),
    Localhost(LocalhostHeader),
}

impl Header for AnyHeader {
    fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(header) => header.client_type(),
            Self::Solomachine(header) => header.client_type(),
            Self::Localhost(header) => header.client_type(),
        }
    }

    fn height(&self) -> Height {
        match self {
            Self::Tendermint(header) => header.height(),
            Self::Solomachine(header) => header.height(),
            Self::Localhost(header) => header.height(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::Tendermint(header) => header.timestamp(),
            Self::Solomachine(header) => header.timestamp(),
            Self::Localhost(header) => header.timestamp(),
        }
    }
}

impl From<TendermintHeader> for AnyHeader {
    fn from(header: TendermintHeader) -> Self {
        Self::Tendermint(header)
    }
}

impl From<SolomachineHeader> for AnyHeader {
    fn from(header: SolomachineHeader) -> Self {
        Self::Solomachine(header)
    }
}

impl From<LocalhostHeader> for AnyHeader {
    fn from(header: LocalhostHeader) -> Self {
        Self::Localhost(header)
    }
}
