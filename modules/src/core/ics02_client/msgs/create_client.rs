//! Definition of domain type message `MsgCreateClient`.

use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::consensus_state::{AnyConsensusState, ConsensusState};
use crate::core::ics02_client::error::Error;

/// A type of message that triggers the creation of a new on-chain (IBC) client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgCreateClient {
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
}

impl MsgCreateClient {
    pub fn new(
        client_state: AnyClientState,
        consensus_state: AnyConsensusState,
    ) -> Result<Self, Error> {
        if client_state.client_type() != consensus_state.client_type() {
            return Err(Error::invalid_client_type(
                client_state.client_type(),
                consensus_state.client_type(),
            ));
        }

        Ok(MsgCreateClient {
            client_state,
            consensus_state,
        })
    }
}
