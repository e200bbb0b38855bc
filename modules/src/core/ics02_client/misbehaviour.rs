use core::fmt::Debug;

use crate::clients::ics06_solomachine::misbehaviour::Misbehaviour as SolomachineMisbehaviour;
use crate::clients::ics07_tendermint::misbehaviour::Misbehaviour as TendermintMisbehaviour;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics24_host::identifier::ClientId;
use crate::Height;

pub trait Misbehaviour: Clone + Debug + Send + Sync {
    /// The client this evidence is submitted against
    fn client_id(&self) -> &ClientId;

    /// The height at which the misbehaviour occurred
    fn height(&self) -> Height;
}

/// Evidence of misbehaviour. The localhost client has none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyMisbehaviour {
    Tendermint(TendermintMisbehaviour),
    Solomachine(SolomachineMisbehaviour),
}

impl AnyMisbehaviour {
    pub fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::Solomachine(_) => ClientType::Solomachine,
        }
    }
}

impl Misbehaviour for AnyMisbehaviour {
    fn client_id(&self) -> &ClientId {
        match self {
            Self::Tendermint(misbehaviour) => misbehaviour.client_id(),
            Self::Solomachine(misbehaviour) => misbehaviour.client_id(),
        }
    }

    fn height(&self) -> Height {
        match self {
            Self::Tendermint(misbehaviour) => misbehaviour.height(),
            Self::Solomachine(misbehaviour) => misbehaviour.height(),
        }
    }
}

impl From<TendermintMisbehaviour> for AnyMisbehaviour {
    fn from(misbehaviour: TendermintMisbehaviour) -> Self {
        Self::Tendermint(misbehaviour)
    }
}

impl From<SolomachineMisbehaviour> for AnyMisbehaviour {
    fn from(misbehaviour: SolomachineMisbehaviour) -> Self {
        Self::Solomachine(misbehaviour)
    }
}
