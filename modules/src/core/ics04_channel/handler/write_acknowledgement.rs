use tracing::info;

use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::commitment::{
    compute_ack_commitment, Acknowledgement, AcknowledgementCommitment,
};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::WriteAcknowledgement;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAckPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub ack_commitment: AcknowledgementCommitment,
}

/// Commits the acknowledgement an application produced for a received packet.
pub fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    packet: Packet,
    ack: Acknowledgement,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let dest_channel_end = ctx.channel_end(&packet.destination_port, &packet.destination_channel)?;

    if !dest_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.destination_channel,
            dest_channel_end.state,
        ));
    }

    // NOTE: an acknowledgement is written at most once per packet.
    if ctx
        .get_packet_acknowledgement(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        )
        .is_some()
    {
        return Err(Error::packet_acknowledgement_exists(packet.sequence));
    }

    let result = PacketResult::WriteAck(WriteAckPacketResult {
        port_id: packet.destination_port.clone(),
        channel_id: packet.destination_channel.clone(),
        seq: packet.sequence,
        ack_commitment: compute_ack_commitment(&ack),
    });

    info!("writing acknowledgement for packet {}", packet);
    output.log("success: packet write acknowledgement");

    output.emit(IbcEvent::WriteAcknowledgement(WriteAcknowledgement {
        height: ctx.host_height(),
        packet,
        ack: ack.as_bytes().to_vec(),
    }));

    Ok(output.with_result(result))
}
