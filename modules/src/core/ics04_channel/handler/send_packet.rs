//! Protocol logic for sending a packet on behalf of the module owning the
//! source channel.

use tracing::info;

use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::consensus_state::ConsensusState;
use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::commitment::{compute_packet_commitment, PacketCommitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::SendPacket;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics05_port::capabilities::Capability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub seq_number: Sequence,
    pub commitment: PacketCommitment,
}

/// Builds the next packet on `source_port/source_channel` and commits to it.
/// The packet sequence is assigned from the channel's next send sequence.
#[allow(clippy::too_many_arguments)]
pub fn send_packet<Ctx: ChannelReader>(
    ctx: &Ctx,
    channel_cap: &Capability,
    source_port: PortId,
    source_channel: ChannelId,
    timeout_height: TimeoutHeight,
    timeout_timestamp: Timestamp,
    data: Vec<u8>,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let source_channel_end = ctx.channel_end(&source_port, &source_channel)?;

    if source_channel_end.state_matches(&State::Closed) {
        return Err(Error::channel_closed(source_channel));
    }
    if !source_channel_end.is_open() {
        return Err(Error::invalid_channel_state(
            source_channel,
            source_channel_end.state,
        ));
    }

    ctx.authenticate_channel_capability(&source_port, &source_channel, channel_cap)?;

    let counterparty = source_channel_end.counterparty();
    let destination_channel = counterparty
        .channel_id()
        .ok_or_else(Error::missing_counterparty_channel_id)?
        .clone();

    let connection_id = source_channel_end.single_connection_hop()?;
    let connection_end = ctx.connection_end(connection_id).map_err(Error::ics03_connection)?;

    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;

    if client_state.is_frozen() {
        return Err(Error::frozen_client(client_id.clone()));
    }

    let sequence = ctx.get_next_sequence_send(&source_port, &source_channel)?;

    let packet = Packet {
        sequence,
        source_port: source_port.clone(),
        source_channel: source_channel.clone(),
        destination_port: counterparty.port_id().clone(),
        destination_channel,
        data,
        timeout_height,
        timeout_timestamp,
    };

    if !packet.has_timeout() {
        return Err(Error::missing_timeout());
    }

    // The packet must still be receivable by the counterparty as far as our
    // client of it knows.
    let latest_height = client_state.latest_height();
    let latest_timestamp = ctx
        .consensus_state(client_id, latest_height)
        .map_err(Error::ics02_client)?
        .timestamp();

    if packet.timed_out(&latest_timestamp, latest_height) {
        return Err(Error::timeout_elapsed(
            sequence,
            latest_height,
            latest_timestamp,
        ));
    }

    let commitment = compute_packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );

    info!("sending packet {}", packet);
    output.log("success: packet send");

    output.emit(IbcEvent::SendPacket(SendPacket {
        height: ctx.host_height(),
        packet,
    }));

    let result = PacketResult::Send(SendPacketResult {
        port_id: source_port,
        channel_id: source_channel,
        seq: sequence,
        seq_number: sequence.increment(),
        commitment,
    });

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::error::{Error, ErrorDetail};
    use crate::core::ics04_channel::handler::send_packet::send_packet;
    use crate::core::ics04_channel::packet::{PacketResult, Sequence};
    use crate::core::ics04_channel::timeout::TimeoutHeight;
    use crate::core::ics04_channel::version::Version;
    use crate::core::ics05_port::capabilities::CapabilityName;
    use crate::core::ics05_port::context::CapabilityReader;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{get_dummy_connection_end, get_dummy_secret_key};
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn send_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            timeout_height: TimeoutHeight,
            timeout_timestamp: Timestamp,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let sequence = 5;
        let sk = get_dummy_secret_key(3);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let conn_id = ConnectionId::new(2);

        let open_end = ChannelEnd::new(
            State::Open,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), Some(ChannelId::new(7))),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );

        let mut init_end = open_end.clone();
        init_end.set_state(State::Init);

        let base_ctx = MockContext::default()
            .with_port(port_id.clone())
            .with_solomachine_client(&client_id, &sk, sequence)
            .with_connection(conn_id, get_dummy_connection_end(ConnectionState::Open));

        let far_future = TimeoutHeight::At(Height::new(0, 1000));

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because the channel does not exist".to_string(),
                ctx: base_ctx.clone(),
                timeout_height: far_future,
                timeout_timestamp: Timestamp::none(),
                expected_error: Some(|e| matches!(e, ErrorDetail::ChannelNotFound(_))),
            },
            Test {
                name: "Processing fails because the channel is not open".to_string(),
                ctx: base_ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), init_end),
                timeout_height: far_future,
                timeout_timestamp: Timestamp::none(),
                expected_error: Some(|e| matches!(e, ErrorDetail::InvalidChannelState(_))),
            },
            Test {
                name: "Processing fails because the packet has no timeout".to_string(),
                ctx: base_ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), open_end.clone()),
                timeout_height: TimeoutHeight::Never,
                timeout_timestamp: Timestamp::none(),
                expected_error: Some(|e| matches!(e, ErrorDetail::MissingTimeout(_))),
            },
            Test {
                name: "Processing fails because the timeout height already passed".to_string(),
                ctx: base_ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), open_end.clone()),
                timeout_height: TimeoutHeight::At(Height::new(0, 1)),
                timeout_timestamp: Timestamp::none(),
                expected_error: Some(|e| matches!(e, ErrorDetail::TimeoutElapsed(_))),
            },
            Test {
                name: "Processing fails because the timeout timestamp already passed".to_string(),
                ctx: base_ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), open_end.clone()),
                timeout_height: TimeoutHeight::Never,
                timeout_timestamp: Timestamp::from_nanoseconds(1).unwrap(),
                expected_error: Some(|e| matches!(e, ErrorDetail::TimeoutElapsed(_))),
            },
            Test {
                name: "Good parameters".to_string(),
                ctx: base_ctx.with_channel(port_id.clone(), chan_id.clone(), open_end),
                timeout_height: far_future,
                timeout_timestamp: Timestamp::none(),
                expected_error: None,
            },
        ];

        for test in tests {
            // Channels that were never created have no capability; use any valid one.
            let cap = test
                .ctx
                .get_capability(&CapabilityName::channel(&port_id, &chan_id))
                .or_else(|_| test.ctx.get_capability(&CapabilityName::port(&port_id)))
                .unwrap();

            let res = send_packet(
                &test.ctx,
                &cap,
                port_id.clone(),
                chan_id.clone(),
                test.timeout_height,
                test.timeout_timestamp,
                b"hello".to_vec(),
            );

            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "send_packet: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert_eq!(proto_output.events.len(), 1);
                    assert!(matches!(proto_output.events[0], IbcEvent::SendPacket(_)));

                    match proto_output.result {
                        PacketResult::Send(res) => {
                            assert_eq!(res.seq, Sequence::from(1));
                            assert_eq!(res.seq_number, Sequence::from(2));
                            assert_eq!(
                                res.commitment,
                                compute_packet_commitment(
                                    b"hello",
                                    &test.timeout_height,
                                    &test.timeout_timestamp
                                )
                            );
                        }
                        other => panic!("unexpected packet result {:?}", other),
                    }
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("send_packet: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }

    #[test]
    fn send_packet_rejects_foreign_capability() {
        let sk = get_dummy_secret_key(3);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let conn_id = ConnectionId::new(2);

        let open_end = ChannelEnd::new(
            State::Open,
            Order::Ordered,
            Counterparty::new(PortId::transfer(), Some(ChannelId::new(7))),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );

        let ctx = MockContext::default()
            .with_port(port_id.clone())
            .with_solomachine_client(&client_id, &sk, 5)
            .with_connection(conn_id, get_dummy_connection_end(ConnectionState::Open))
            .with_channel(port_id.clone(), chan_id.clone(), open_end);

        // The port capability does not open the channel.
        let port_cap = ctx.get_capability(&CapabilityName::port(&port_id)).unwrap();
        let res = send_packet(
            &ctx,
            &port_cap,
            port_id.clone(),
            chan_id.clone(),
            TimeoutHeight::At(Height::new(0, 1000)),
            Timestamp::none(),
            vec![1],
        );
        assert!(matches!(
            res,
            Err(Error(ErrorDetail::ChannelCapabilityNotFound(_), _))
        ));

        assert_eq!(
            ctx.get_next_sequence_send(&port_id, &chan_id).unwrap(),
            Sequence::from(1)
        );
    }
}
