use tracing::info;

use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::commitment::{compute_ack_commitment, compute_packet_commitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::AcknowledgePacket;
use crate::core::ics04_channel::handler::verify::verify_packet_acknowledgement_proofs;
use crate::core::ics04_channel::msgs::acknowledgement::MsgAcknowledgement;
use crate::core::ics04_channel::packet::{PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AckPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    /// The next ack sequence of an ordered channel.
    pub seq_number: Option<Sequence>,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgAcknowledgement,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let source_channel_end = ctx.channel_end(&packet.source_port, &packet.source_channel)?;

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

    let connection_id = source_channel_end.single_connection_hop()?;
    let connection_end = ctx.open_connection_end(connection_id)?;

    // A missing commitment means the packet was never sent, or was already
    // acknowledged or timed out.
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

    verify_packet_acknowledgement_proofs(
        ctx,
        packet,
        compute_ack_commitment(&msg.acknowledgement),
        &connection_end,
        &msg.proofs,
    )?;

    let seq_number = if source_channel_end.order_matches(&Order::Ordered) {
        let next_seq_ack =
            ctx.get_next_sequence_ack(&packet.source_port, &packet.source_channel)?;

        if packet.sequence != next_seq_ack {
            return Err(Error::packet_sequence_out_of_order(
                packet.sequence,
                next_seq_ack,
            ));
        }

        Some(next_seq_ack.increment())
    } else {
        None
    };

    let result = PacketResult::Ack(AckPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel.clone(),
        seq: packet.sequence,
        seq_number,
    });

    info!("acknowledged packet {}", packet);
    output.log("success: packet ack");

    output.emit(IbcEvent::AcknowledgePacket(AcknowledgePacket {
        height: ctx.host_height(),
        packet: packet.clone(),
    }));

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::commitment::{
        compute_ack_commitment, compute_packet_commitment, Acknowledgement,
    };
    use crate::core::ics04_channel::error::{Error, ErrorDetail};
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::msgs::acknowledgement::MsgAcknowledgement;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
    use crate::core::ics04_channel::timeout::TimeoutHeight;
    use crate::core::ics04_channel::version::Version;
    use crate::core::ics23_commitment::commitment::CommitmentPrefix;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{
        get_dummy_connection_end, get_dummy_secret_key, get_dummy_solomachine_proofs,
    };
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn ack_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: PacketMsg,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let sm_sequence = 2;
        let sk = get_dummy_secret_key(10);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let counterparty_chan_id = ChannelId::new(7);
        let conn_id = ConnectionId::new(2);

        let packet = Packet {
            sequence: Sequence::from(1),
            source_port: port_id.clone(),
            source_channel: chan_id.clone(),
            destination_port: PortId::transfer(),
            destination_channel: counterparty_chan_id.clone(),
            data: b"ping".to_vec(),
            timeout_height: TimeoutHeight::At(Height::new(1, 1000)),
            timeout_timestamp: Timestamp::none(),
        };
        let commitment = compute_packet_commitment(
            &packet.data,
            &packet.timeout_height,
            &packet.timeout_timestamp,
        );

        let ack = Acknowledgement::new(b"pong".to_vec()).unwrap();
        let ack_proofs = |ack: &Acknowledgement| {
            get_dummy_solomachine_proofs(
                &sk,
                sm_sequence,
                &CommitmentPrefix::default(),
                &Path::Acks {
                    port_id: packet.destination_port.clone(),
                    channel_id: packet.destination_channel.clone(),
                    sequence: packet.sequence,
                },
                compute_ack_commitment(ack).into_vec(),
            )
        };

        let msg = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement: ack.clone(),
            proofs: ack_proofs(&ack),
        };

        // Proof of one acknowledgement presented with another.
        let msg_other_ack = MsgAcknowledgement {
            acknowledgement: Acknowledgement::new(b"error".to_vec()).unwrap(),
            ..msg.clone()
        };

        let mut msg_altered_packet = msg.clone();
        msg_altered_packet.packet.data = b"pong".to_vec();

        let unordered_end = ChannelEnd::new(
            State::Open,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), Some(counterparty_chan_id)),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );
        let mut ordered_end = unordered_end.clone();
        ordered_end.ordering = Order::Ordered;

        let base_ctx = MockContext::default()
            .with_port(port_id.clone())
            .with_solomachine_client(&client_id, &sk, sm_sequence)
            .with_connection(conn_id, get_dummy_connection_end(ConnectionState::Open));

        let unordered_ctx =
            base_ctx
                .clone()
                .with_channel(port_id.clone(), chan_id.clone(), unordered_end);
        let with_commitment = unordered_ctx.clone().with_packet_commitment(
            port_id.clone(),
            chan_id.clone(),
            packet.sequence,
            commitment.clone(),
        );
        let ordered_ctx = base_ctx
            .with_channel(port_id.clone(), chan_id.clone(), ordered_end)
            .with_packet_commitment(port_id, chan_id, packet.sequence, commitment);

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no commitment exists".to_string(),
                ctx: unordered_ctx,
                msg: PacketMsg::AckPacket(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::PacketCommitmentNotFound(_))),
            },
            Test {
                name: "Processing fails because the packet differs from the commitment"
                    .to_string(),
                ctx: with_commitment.clone(),
                msg: PacketMsg::AckPacket(msg_altered_packet),
                expected_error: Some(|e| matches!(e, ErrorDetail::IncorrectPacketCommitment(_))),
            },
            Test {
                name: "Processing fails because the ack proof does not verify".to_string(),
                ctx: with_commitment.clone(),
                msg: PacketMsg::AckPacket(msg_other_ack),
                expected_error: Some(|e| matches!(e, ErrorDetail::PacketVerificationFailed(_))),
            },
            Test {
                name: "Good parameters, unordered channel".to_string(),
                ctx: with_commitment,
                msg: PacketMsg::AckPacket(msg.clone()),
                expected_error: None,
            },
            Test {
                name: "Good parameters, ordered channel".to_string(),
                ctx: ordered_ctx,
                msg: PacketMsg::AckPacket(msg),
                expected_error: None,
            },
        ];

        for test in tests {
            let res = packet_dispatch(&test.ctx, &test.msg);
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "ack_packet: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert!(matches!(
                        proto_output.events[0],
                        IbcEvent::AcknowledgePacket(_)
                    ));
                    assert!(matches!(proto_output.result, PacketResult::Ack(_)));
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("ack_packet: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }
}
