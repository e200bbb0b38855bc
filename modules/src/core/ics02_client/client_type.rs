use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use super::error::Error;

/// Type of the client, depending on the specific consensus algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum ClientType {
    Solomachine = 6,
    Tendermint = 7,
    Localhost = 9,
}

impl ClientType {
    const SOLOMACHINE_STR: &'static str = "06-solomachine";
    const TENDERMINT_STR: &'static str = "07-tendermint";
    const LOCALHOST_STR: &'static str = "09-localhost";

    /// Yields the identifier of this client type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solomachine => Self::SOLOMACHINE_STR,
            Self::Tendermint => Self::TENDERMINT_STR,
            Self::Localhost => Self::LOCALHOST_STR,
        }
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "ClientType({})", self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SOLOMACHINE_STR => Ok(Self::Solomachine),
            Self::TENDERMINT_STR => Ok(Self::Tendermint),
            Self::LOCALHOST_STR => Ok(Self::Localhost),
            _ => Err(Error::unknown_client_type(s.to_string())),
        }
    }
}
