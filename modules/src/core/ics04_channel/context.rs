//! ICS4 (channel) context. The two traits `ChannelReader` and `ChannelKeeper` define
//! the interface that any host chain must implement to be able to process any `ChannelMsg`
//! or `PacketMsg`.

use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics05_port::capabilities::{Capability, CapabilityName};
use crate::core::ics05_port::context::{CapabilityKeeper, PortReader};
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::core::ics26_routing::context::ModuleId;

/// A context supplying all the necessary read-only dependencies for processing any `ChannelMsg`.
pub trait ChannelReader: ConnectionReader + PortReader {
    /// Returns the ChannelEnd for the given `port_id` and `channel_id`.
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Result<ChannelEnd, Error>;

    fn connection_channels(&self, cid: &ConnectionId) -> Result<Vec<(PortId, ChannelId)>, Error>;

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_recv(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, Error>;

    fn get_packet_commitment(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<PacketCommitment>;

    fn get_packet_receipt(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Receipt>;

    fn get_packet_acknowledgement(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<AcknowledgementCommitment>;

    /// Returns a counter on the number of channel ids have been created thus far.
    /// The value of this counter should increase only via method
    /// `ChannelKeeper::increase_channel_counter`.
    fn channel_counter(&self) -> Result<u64, Error>;

    /// The connection a channel runs over, which must be open.
    fn open_connection_end(&self, connection_id: &ConnectionId) -> Result<ConnectionEnd, Error> {
        let connection_end = self
            .connection_end(connection_id)
            .map_err(Error::ics03_connection)?;
        if !connection_end.is_open() {
            return Err(Error::connection_not_open(connection_id.clone()));
        }
        Ok(connection_end)
    }

    /// Return the module bound to the channel's port along with the channel capability.
    fn lookup_module_by_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(ModuleId, Capability), Error> {
        let (module_id, _) = self
            .lookup_module_by_port(port_id)
            .map_err(Error::ics05_port)?;
        let capability = self
            .get_capability(&CapabilityName::channel(port_id, channel_id))
            .map_err(Error::channel_capability_not_found)?;
        Ok((module_id, capability))
    }

    /// Checks that `capability` is the one granted for the channel.
    fn authenticate_channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        capability: &Capability,
    ) -> Result<(), Error> {
        self.authenticate_capability(&CapabilityName::channel(port_id, channel_id), capability)
            .map_err(Error::channel_capability_not_found)
    }
}

/// A context supplying all the necessary write-only dependencies (i.e., storage writing facility)
/// for processing any `ChannelMsg`.
pub trait ChannelKeeper: CapabilityKeeper {
    fn store_channel_result(&mut self, result: ChannelResult) -> Result<(), Error> {
        let port_id = result.port_id;
        let channel_id = result.channel_id;

        self.store_channel(port_id.clone(), channel_id.clone(), &result.channel_end)?;

        // A freshly allocated identifier: bump the counter, hand out the
        // channel capability and start every sequence at 1.
        if matches!(result.channel_id_state, ChannelIdState::Generated) {
            self.increase_channel_counter();

            let connection_id = result.channel_end.single_connection_hop()?.clone();
            self.store_connection_channels(connection_id, port_id.clone(), channel_id.clone())?;

            self.new_capability(CapabilityName::channel(&port_id, &channel_id))
                .map_err(Error::ics05_port)?;

            self.store_next_sequence_send(port_id.clone(), channel_id.clone(), 1.into())?;
            self.store_next_sequence_recv(port_id.clone(), channel_id.clone(), 1.into())?;
            self.store_next_sequence_ack(port_id, channel_id, 1.into())?;
        }

        Ok(())
    }

    fn store_packet_result(&mut self, general_result: PacketResult) -> Result<(), Error> {
        match general_result {
            PacketResult::Send(res) => {
                self.store_next_sequence_send(
                    res.port_id.clone(),
                    res.channel_id.clone(),
                    res.seq_number,
                )?;
                self.store_packet_commitment(res.port_id, res.channel_id, res.seq, res.commitment)?;
            }
            PacketResult::Recv(res) => match res.receipt {
                // Ordered channel
                None => {
                    self.store_next_sequence_recv(res.port_id, res.channel_id, res.seq_number)?
                }
                // Unordered channel
                Some(receipt) => {
                    self.store_packet_receipt(res.port_id, res.channel_id, res.seq, receipt)?
                }
            },
            PacketResult::WriteAck(res) => {
                self.store_packet_acknowledgement(
                    res.port_id,
                    res.channel_id,
                    res.seq,
                    res.ack_commitment,
                )?;
            }
            PacketResult::Ack(res) => {
                self.delete_packet_commitment(&res.port_id, &res.channel_id, res.seq)?;
                if let Some(next_seq_ack) = res.seq_number {
                    // Ordered channel
                    self.store_next_sequence_ack(res.port_id, res.channel_id, next_seq_ack)?;
                }
            }
            PacketResult::Timeout(res) => {
                self.delete_packet_commitment(&res.port_id, &res.channel_id, res.seq)?;
                if let Some(channel_end) = res.channel {
                    // Ordered channel, which the timeout closed.
                    self.store_channel(res.port_id, res.channel_id, &channel_end)?;
                }
            }
        }
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error>;

    fn delete_packet_commitment(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error>;

    fn store_packet_receipt(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        receipt: Receipt,
    ) -> Result<(), Error>;

    fn store_packet_acknowledgement(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Error>;

    fn store_connection_channels(
        &mut self,
        conn_id: ConnectionId,
        port_id: PortId,
        channel_id: ChannelId,
    ) -> Result<(), Error>;

    /// Stores the given channel_end at a path associated with the port_id and channel_id.
    fn store_channel(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: &ChannelEnd,
    ) -> Result<(), Error>;

    fn store_next_sequence_send(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_recv(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_ack(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
    ) -> Result<(), Error>;

    /// Called upon channel identifier creation (Init or Try message processing).
    /// Increases the counter which keeps track of how many channels have been created.
    /// Should never fail.
    fn increase_channel_counter(&mut self);
}
