use tracing::info;

use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::ReceivePacket;
use crate::core::ics04_channel::handler::verify::verify_packet_recv_proofs;
use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
use crate::core::ics04_channel::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecvPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    /// The next receive sequence of an ordered channel.
    pub seq_number: Sequence,
    /// Set for unordered channels only.
    pub receipt: Option<Receipt>,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgRecvPacket,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let dest_channel_end = ctx.channel_end(&packet.destination_port, &packet.destination_channel)?;

    if !dest_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.destination_channel.clone(),
            dest_channel_end.state,
        ));
    }

    // The packet must have been sent by our counterparty.
    let counterparty = Counterparty::new(
        packet.source_port.clone(),
        Some(packet.source_channel.clone()),
    );
    if !dest_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.source_port.clone(),
            packet.source_channel.clone(),
        ));
    }

    let connection_id = dest_channel_end.single_connection_hop()?;
    let connection_end = ctx.open_connection_end(connection_id)?;

    let host_height = ctx.host_height();
    let host_timestamp = ctx.host_timestamp();
    if packet.timed_out(&host_timestamp, host_height) {
        return Err(Error::packet_timeout(
            packet.sequence,
            host_height,
            host_timestamp,
        ));
    }

    verify_packet_recv_proofs(ctx, packet, &connection_end, &msg.proofs)?;

    let result = if dest_channel_end.order_matches(&Order::Ordered) {
        let next_seq_recv =
            ctx.get_next_sequence_recv(&packet.destination_port, &packet.destination_channel)?;

        if packet.sequence < next_seq_recv {
            return Err(Error::packet_already_received(packet.sequence));
        }
        if packet.sequence != next_seq_recv {
            return Err(Error::packet_sequence_out_of_order(
                packet.sequence,
                next_seq_recv,
            ));
        }

        PacketResult::Recv(RecvPacketResult {
            port_id: packet.destination_port.clone(),
            channel_id: packet.destination_channel.clone(),
            seq: packet.sequence,
            seq_number: next_seq_recv.increment(),
            receipt: None,
        })
    } else {
        let receipt = ctx.get_packet_receipt(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        );

        if receipt.is_some() {
            return Err(Error::packet_already_received(packet.sequence));
        }

        PacketResult::Recv(RecvPacketResult {
            port_id: packet.destination_port.clone(),
            channel_id: packet.destination_channel.clone(),
            seq: packet.sequence,
            seq_number: Sequence::default(),
            receipt: Some(Receipt::Ok),
        })
    };

    info!("received packet {}", packet);
    output.log("success: packet receive");

    output.emit(IbcEvent::ReceivePacket(ReceivePacket {
        height: host_height,
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
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::error::{Error, ErrorDetail};
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::{Packet, PacketResult, Receipt, Sequence};
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
    fn recv_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: PacketMsg,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let sm_sequence = 6;
        let sk = get_dummy_secret_key(8);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let counterparty_chan_id = ChannelId::new(7);
        let conn_id = ConnectionId::new(2);

        let unordered_end = ChannelEnd::new(
            State::Open,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), Some(counterparty_chan_id.clone())),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );
        let mut ordered_end = unordered_end.clone();
        ordered_end.ordering = Order::Ordered;

        let packet_msg = |sequence: u64, timeout_height: TimeoutHeight| {
            let packet = Packet {
                sequence: Sequence::from(sequence),
                source_port: PortId::transfer(),
                source_channel: counterparty_chan_id.clone(),
                destination_port: port_id.clone(),
                destination_channel: chan_id.clone(),
                data: b"ping".to_vec(),
                timeout_height,
                timeout_timestamp: Timestamp::none(),
            };
            let commitment = compute_packet_commitment(
                &packet.data,
                &packet.timeout_height,
                &packet.timeout_timestamp,
            );
            let proofs = get_dummy_solomachine_proofs(
                &sk,
                sm_sequence,
                &CommitmentPrefix::default(),
                &Path::Commitments {
                    port_id: packet.source_port.clone(),
                    channel_id: packet.source_channel.clone(),
                    sequence: packet.sequence,
                },
                commitment.into_vec(),
            );
            PacketMsg::RecvPacket(MsgRecvPacket { packet, proofs })
        };

        let live = TimeoutHeight::At(Height::new(1, 1000));
        let expired = TimeoutHeight::At(Height::new(1, 3));

        let mut foreign = match packet_msg(1, live) {
            PacketMsg::RecvPacket(msg) => msg,
            _ => unreachable!(),
        };
        foreign.packet.source_channel = ChannelId::new(9);

        let base_ctx = MockContext::default()
            .with_port(port_id.clone())
            .with_solomachine_client(&client_id, &sk, sm_sequence)
            .with_connection(conn_id, get_dummy_connection_end(ConnectionState::Open));

        let unordered_ctx =
            base_ctx
                .clone()
                .with_channel(port_id.clone(), chan_id.clone(), unordered_end);
        let ordered_ctx = base_ctx.with_channel(port_id.clone(), chan_id.clone(), ordered_end);

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because the packet comes from another channel"
                    .to_string(),
                ctx: unordered_ctx.clone(),
                msg: PacketMsg::RecvPacket(foreign),
                expected_error: Some(|e| matches!(e, ErrorDetail::InvalidPacketCounterparty(_))),
            },
            Test {
                name: "Processing fails because the host reached the timeout height".to_string(),
                ctx: unordered_ctx.clone(),
                msg: packet_msg(1, expired),
                expected_error: Some(|e| matches!(e, ErrorDetail::PacketTimeout(_))),
            },
            Test {
                name: "Processing fails because the packet was already received".to_string(),
                ctx: unordered_ctx.clone().with_packet_receipt(
                    port_id.clone(),
                    chan_id.clone(),
                    Sequence::from(4),
                ),
                msg: packet_msg(4, live),
                expected_error: Some(|e| matches!(e, ErrorDetail::PacketAlreadyReceived(_))),
            },
            Test {
                name: "Processing fails because of an ordered sequence gap".to_string(),
                ctx: ordered_ctx.clone(),
                msg: packet_msg(2, live),
                expected_error: Some(|e| matches!(e, ErrorDetail::PacketSequenceOutOfOrder(_))),
            },
            Test {
                name: "Good parameters, unordered channel".to_string(),
                ctx: unordered_ctx,
                msg: packet_msg(4, live),
                expected_error: None,
            },
            Test {
                name: "Good parameters, ordered channel".to_string(),
                ctx: ordered_ctx,
                msg: packet_msg(1, live),
                expected_error: None,
            },
        ];

        for test in tests {
            let res = packet_dispatch(&test.ctx, &test.msg);
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "recv_packet: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert_eq!(proto_output.events.len(), 1);
                    assert!(matches!(proto_output.events[0], IbcEvent::ReceivePacket(_)));

                    match proto_output.result {
                        PacketResult::Recv(res) => match res.receipt {
                            Some(receipt) => assert_eq!(receipt, Receipt::Ok),
                            None => assert_eq!(res.seq_number, Sequence::from(2)),
                        },
                        other => panic!("unexpected packet result {:?}", other),
                    }
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("recv_packet: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }
}
