//! ICS2 (client) context. The two traits `ClientReader` and `ClientKeeper` define the interface
//! that any host chain must implement to be able to process any `ClientMsg`.

use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::consensus_state::AnyConsensusState;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::handler::ClientResult::{
    self, Create, Misbehaviour, Substitute, Update,
};
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::timestamp::Timestamp;
use crate::Height;

/// Defines the read-only part of ICS2 (client functions) context.
pub trait ClientReader {
    fn client_type(&self, client_id: &ClientId) -> Result<ClientType, Error>;

    fn client_state(&self, client_id: &ClientId) -> Result<AnyClientState, Error>;

    /// Retrieve the consensus state for the given client ID at the specified
    /// height.
    ///
    /// Returns an error if no such state exists.
    fn consensus_state(&self, client_id: &ClientId, height: Height)
        -> Result<AnyConsensusState, Error>;

    /// Search for the lowest consensus state higher than `height`.
    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Error>;

    /// Search for the highest consensus state lower than `height`.
    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Error>;

    /// Returns the current height of the local chain.
    fn host_height(&self) -> Height;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Timestamp;

    /// Returns a natural number, counting how many clients have been created thus far.
    /// The value of this counter should increase only via method `ClientKeeper::increase_client_counter`.
    fn client_counter(&self) -> Result<u64, Error>;

    /// Returns the host time at which the client was updated to `height`.
    fn client_update_time(&self, client_id: &ClientId, height: Height) -> Result<Timestamp, Error>;

    /// Returns the host height at which the client was updated to `height`.
    fn client_update_height(&self, client_id: &ClientId, height: Height) -> Result<Height, Error>;

    /// Reads the host's own pending store. Only the loopback client proves
    /// anything this way.
    fn host_store_value(&self, path: &Path) -> Option<Vec<u8>>;
}

/// Defines the write-only part of ICS2 (client functions) context.
pub trait ClientKeeper {
    fn store_client_result(&mut self, handler_res: ClientResult) -> Result<(), Error> {
        match handler_res {
            Create(res) => {
                let client_id = res.client_id.clone();
                let height = res.client_state.latest_height();

                self.store_client_type(client_id.clone(), res.client_type)?;
                self.store_client_state(client_id.clone(), res.client_state)?;
                self.store_consensus_state(client_id.clone(), height, res.consensus_state)?;
                self.increase_client_counter();
                self.store_update_time(client_id.clone(), height, res.processed_time)?;
                self.store_update_height(client_id, height, res.processed_height)?;
            }
            Update(res) => {
                let client_id = res.client_id.clone();
                let height = res.client_state.latest_height();

                self.store_client_state(client_id.clone(), res.client_state)?;
                // A header that revealed misbehaviour freezes the client but
                // records no consensus state.
                if let Some(consensus_state) = res.consensus_state {
                    self.store_consensus_state(client_id.clone(), height, consensus_state)?;
                    self.store_update_time(client_id.clone(), height, res.processed_time)?;
                    self.store_update_height(client_id, height, res.processed_height)?;
                }
            }
            Misbehaviour(res) => {
                self.store_client_state(res.client_id, res.client_state)?;
            }
            Substitute(res) => {
                let client_id = res.client_id.clone();
                let height = res.client_state.latest_height();

                self.store_client_state(client_id.clone(), res.client_state)?;
                self.store_consensus_state(client_id.clone(), height, res.consensus_state)?;
                self.store_update_time(client_id.clone(), height, res.processed_time)?;
                self.store_update_height(client_id, height, res.processed_height)?;
            }
        }
        Ok(())
    }

    /// Called upon successful client creation
    fn store_client_type(
        &mut self,
        client_id: ClientId,
        client_type: ClientType,
    ) -> Result<(), Error>;

    /// Called upon successful client creation and update
    fn store_client_state(
        &mut self,
        client_id: ClientId,
        client_state: AnyClientState,
    ) -> Result<(), Error>;

    /// Called upon successful client creation and update
    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), Error>;

    /// Called upon client creation.
    /// Increases the counter which keeps track of how many clients have been created.
    /// Should never fail.
    fn increase_client_counter(&mut self);

    /// Called upon successful client update.
    /// Implementations are expected to use this to record the specified time as the time at which
    /// this update (or header) was processed.
    fn store_update_time(
        &mut self,
        client_id: ClientId,
        height: Height,
        timestamp: Timestamp,
    ) -> Result<(), Error>;

    /// Called upon successful client update.
    /// Implementations are expected to use this to record the specified height as the height at
    /// at which this update (or header) was processed.
    fn store_update_height(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_height: Height,
    ) -> Result<(), Error>;
}
