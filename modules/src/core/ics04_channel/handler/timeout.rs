use tracing::info;

use crate::core::ics02_client::consensus_state::ConsensusState;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
use crate::core::ics04_channel::commitment::compute_packet_commitment;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::TimeoutPacket;
use crate::core::ics04_channel::handler::verify::{
    verify_next_sequence_recv, verify_packet_receipt_absence,
};
use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
use crate::core::ics04_channel::packet::{PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    /// The closed channel end of an ordered channel.
    pub channel: Option<ChannelEnd>,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgTimeout,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let mut source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.source_channel.clone(),
            source_channel_end.state,
        ));
    }

    let counterparty = Counterparty::new(
        packet.destination_port.clone(),
        Some(packet.destination_channel.clone()),
    );
    if !source_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.destination_port.clone(),
            packet.destination_channel.clone(),
        ));
    }

    let connection_id = source_channel_end.single_connection_hop()?.clone();
    let connection_end = ctx
        .connection_end(&connection_id)
        .map_err(Error::ics03_connection)?;

    // The counterparty state at the proof height must be past the packet's timeout.
    let proof_height = msg.proofs.height();
    let proof_timestamp = ctx
        .consensus_state(connection_end.client_id(), proof_height)
        .map_err(Error::ics02_client)?
        .timestamp();

    if !packet.timed_out(&proof_timestamp, proof_height) {
        return Err(Error::packet_timeout_not_reached(
            packet.timeout_height,
            proof_height,
            packet.timeout_timestamp,
            proof_timestamp,
        ));
    }

    let packet_commitment = ctx
        .get_packet_commitment(&packet.source_port, &packet.source_channel, packet.sequence)
        .ok_or_else(|| Error::packet_commitment_not_found(packet.sequence))?;

    if packet_commitment
        != compute_packet_commitment(
            &packet.data,
            &packet.timeout_height,
            &packet.timeout_timestamp,
        )
    {
        return Err(Error::incorrect_packet_commitment(packet.sequence));
    }

    let channel = if source_channel_end.order_matches(&Order::Ordered) {
        if packet.sequence < msg.next_sequence_recv {
            return Err(Error::packet_already_received(packet.sequence));
        }
        verify_next_sequence_recv(
            ctx,
            &connection_end,
            packet,
            msg.next_sequence_recv,
            &msg.proofs,
        )?;

        // A gap in an ordered channel can never be filled.
        source_channel_end.set_state(State::Closed);
        Some(source_channel_end)
    } else {
        verify_packet_receipt_absence(ctx, &connection_end, packet, &msg.proofs)?;
        None
    };

    let result = PacketResult::Timeout(TimeoutPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel.clone(),
        seq: packet.sequence,
        channel,
    });

    info!("packet {} timed out", packet);
    output.log("success: packet timeout");

    output.emit(IbcEvent::TimeoutPacket(TimeoutPacket {
        height: ctx.host_height(),
        packet: packet.clone(),
    }));

    Ok(output.with_result(result))
}
