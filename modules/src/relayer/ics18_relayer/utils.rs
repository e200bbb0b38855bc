use tracing::debug;

use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::header::{AnyHeader, Header};
use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
use crate::core::ics02_client::msgs::ClientMsg;
use crate::core::ics24_host::identifier::ClientId;
use crate::relayer::ics18_relayer::context::Ics18Context;
use crate::relayer::ics18_relayer::error::Error;

/// Builds a `ClientMsg::UpdateClient` for a client with id `client_id` running on the `dest`
/// context, assuming that the latest header on the source context is `src_header`.
///
/// A tendermint header is re-anchored on the latest height the client already trusts, so
/// the update can skip over any blocks the client has not seen.
pub fn build_client_update_datagram<Ctx>(
    dest: &Ctx,
    client_id: &ClientId,
    src_header: AnyHeader,
) -> Result<ClientMsg, Error>
where
    Ctx: Ics18Context,
{
    // Check if client for ibc0 on ibc1 has been updated to latest height:
    // - query client state on destination chain
    let dest_client_state = dest
        .query_client_full_state(client_id)
        .ok_or_else(|| Error::client_state_not_found(client_id.clone()))?;

    let dest_client_latest_height = dest_client_state.latest_height();

    if src_header.height() == dest_client_latest_height {
        return Err(Error::client_already_up_to_date(
            client_id.clone(),
            src_header.height(),
            dest_client_latest_height,
        ));
    };

    if dest_client_latest_height > src_header.height() {
        return Err(Error::client_at_higher_height(
            client_id.clone(),
            src_header.height(),
            dest_client_latest_height,
        ));
    };

    let header = match src_header {
        AnyHeader::Tendermint(mut header) => {
            header.trusted_height = dest_client_latest_height;
            AnyHeader::Tendermint(header)
        }
        other => other,
    };

    debug!(
        "updating client {} from {} to {}",
        client_id,
        dest_client_latest_height,
        header.height()
    );

    // Client on destination chain can be updated.
    Ok(ClientMsg::UpdateClient(MsgUpdateClient::new(
        client_id.clone(),
        header,
    )))
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use crate::core::ics02_client::client_state::ClientState;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::header::Header;
    use crate::core::ics03_connection::connection::{
        Counterparty as ConnectionCounterparty, State as ConnectionState,
    };
    use crate::core::ics03_connection::context::ConnectionReader;
    use crate::core::ics03_connection::msgs::conn_open_ack::MsgConnectionOpenAck;
    use crate::core::ics03_connection::msgs::conn_open_confirm::MsgConnectionOpenConfirm;
    use crate::core::ics03_connection::msgs::conn_open_init::MsgConnectionOpenInit;
    use crate::core::ics03_connection::msgs::conn_open_try::MsgConnectionOpenTry;
    use crate::core::ics03_connection::msgs::ConnectionMsg;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::commitment::Acknowledgement;
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::msgs::acknowledgement::MsgAcknowledgement;
    use crate::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
    use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
    use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
    use crate::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
    use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
    use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
    use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};
    use crate::core::ics04_channel::packet::Packet;
    use crate::core::ics04_channel::timeout::TimeoutHeight;
    use crate::core::ics04_channel::version::Version;
    use crate::core::ics05_port::capabilities::CapabilityName;
    use crate::core::ics05_port::context::CapabilityReader;
    use crate::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::core::ics04_channel::error::ErrorDetail as ChannelErrorDetail;
    use crate::core::ics26_routing::error::{
        Error as RoutingError, ErrorDetail as RoutingErrorDetail,
    };
    use crate::core::ics26_routing::handler::{send_packet, MsgReceipt};
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::relayer::ics18_relayer::context::Ics18Context;
    use crate::relayer::ics18_relayer::error::{Error, ErrorDetail};
    use crate::relayer::ics18_relayer::utils::build_client_update_datagram;
    use crate::timestamp::Timestamp;
    use crate::Height;

    /// Brings the client `client_id` on `dst` up to the latest block of `src`.
    /// `dst` first catches up with `src`, so the header is not from its future.
    fn update_client(dst: &mut MockContext, src: &MockContext, client_id: &ClientId) {
        while dst.query_latest_height() < src.query_latest_height() {
            dst.advance_host_chain_height();
        }

        let header = src.query_latest_header().unwrap();
        match build_client_update_datagram(dst, client_id, header) {
            Ok(msg) => {
                dst.deliver(msg.into()).unwrap();
            }
            Err(Error(ErrorDetail::ClientAlreadyUpToDate(_), _)) => {}
            Err(e) => panic!("cannot update client {}: {}", client_id, e),
        }
    }

    fn commitment_not_found(res: Result<MsgReceipt, RoutingError>) -> bool {
        matches!(
            res,
            Err(RoutingError(RoutingErrorDetail::Ics04Channel(e), _))
                if matches!(e.source, ChannelErrorDetail::PacketCommitmentNotFound(_))
        )
    }

    /// Proof of `path` against the latest block of `src`.
    fn latest_proof(src: &MockContext, path: Path) -> Proofs {
        let height = src.query_latest_height();
        let proof = src.query_proof(&path, height).unwrap();
        Proofs::new(proof, height).unwrap()
    }

    fn sent_packet(receipt: &MsgReceipt) -> Packet {
        receipt
            .events
            .iter()
            .find_map(|event| match event {
                IbcEvent::SendPacket(e) => Some(e.packet.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    /// Serves to test both ICS 26 `deliver` & `build_client_update_datagram` functions.
    /// Implements a "ping pong" of client update messages, so that two chains repeatedly
    /// process a client update message and update their height in succession.
    fn client_update_ping_pong() {
        let num_iterations = 4;

        let client_on_a_for_b = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let client_on_b_for_a = ClientId::new(ClientType::Tendermint, 0).unwrap();

        // Create two mock contexts, one for each chain, each tracking the other.
        let ctx_b = MockContext::new(ChainId::new("mockgaiaB".to_string(), 1), Height::new(1, 12));
        let chain_a = ChainId::new("mockgaiaA".to_string(), 1);
        let mut ctx_a = MockContext::new(chain_a, Height::new(1, 11))
            .with_client_for(&client_on_a_for_b, &ctx_b);
        let mut ctx_b = ctx_b.with_client_for(&client_on_b_for_a, &ctx_a);

        for _i in 0..num_iterations {
            // A produces a block B has not seen yet.
            ctx_a.advance_host_chain_height();

            // Update client on chain B to latest height of A.
            // - create the client update message with the latest header from A
            let a_latest_header = ctx_a.query_latest_header().unwrap();
            assert_eq!(a_latest_header.client_type(), ClientType::Tendermint);

            let client_msg_b_res =
                build_client_update_datagram(&ctx_b, &client_on_b_for_a, a_latest_header);
            assert!(
                client_msg_b_res.is_ok(),
                "create_client_update failed for context destination {:?}, error: {:?}",
                ctx_b,
                client_msg_b_res
            );

            // - send the message to B. We bypass ICS18 interface and call directly into
            // MockContext `deliver` method.
            let dispatch_res_b = ctx_b.deliver(client_msg_b_res.unwrap().into());
            assert!(
                dispatch_res_b.is_ok(),
                "Dispatch failed for host chain b with error: {:?}",
                dispatch_res_b
            );
            let validation_res = ctx_b.validate();
            assert!(
                validation_res.is_ok(),
                "context validation failed with error {:?} for context {:?}",
                validation_res,
                ctx_b
            );

            let client_height_b = ctx_b
                .query_client_full_state(&client_on_b_for_a)
                .unwrap()
                .latest_height();
            assert_eq!(client_height_b, ctx_a.query_latest_height());

            // Update client on chain A to latest height of B.
            let b_latest_header = ctx_b.query_latest_header().unwrap();
            let client_msg_a_res =
                build_client_update_datagram(&ctx_a, &client_on_a_for_b, b_latest_header);
            assert!(
                client_msg_a_res.is_ok(),
                "create_client_update failed for context destination {:?}, error: {:?}",
                ctx_a,
                client_msg_a_res
            );

            // - send the message to A, through the ICS18 interface this time
            let events = ctx_a.send(vec![client_msg_a_res.unwrap().into()]);
            assert!(
                events.is_ok(),
                "Dispatch failed for host chain a with error: {:?}",
                events
            );
            assert!(ctx_a.validate().is_ok());

            let client_height_a = ctx_a
                .query_client_full_state(&client_on_a_for_b)
                .unwrap()
                .latest_height();
            assert_eq!(client_height_a, ctx_b.query_latest_height());
        }
    }

    #[test]
    fn stale_and_future_headers_are_refused() {
        let client_id = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let ctx_b = MockContext::new(ChainId::new("mockgaiaB".to_string(), 1), Height::new(1, 8));
        let ctx_a = MockContext::new(ChainId::new("mockgaiaA".to_string(), 1), Height::new(1, 8))
            .with_client_for(&client_id, &ctx_b);

        let latest = ctx_b.query_latest_header().unwrap();
        let res = build_client_update_datagram(&ctx_a, &client_id, latest);
        assert!(matches!(res, Err(Error(ErrorDetail::ClientAlreadyUpToDate(_), _))));

        let older = ctx_b.host_block(Height::new(1, 7)).cloned().unwrap();
        let res = build_client_update_datagram(&ctx_a, &client_id, older.into());
        assert!(matches!(res, Err(Error(ErrorDetail::ClientAtHigherHeight(_), _))));

        let unknown = ClientId::new(ClientType::Tendermint, 9).unwrap();
        let header = ctx_b.query_latest_header().unwrap();
        let res = build_client_update_datagram(&ctx_a, &unknown, header);
        assert!(matches!(res, Err(Error(ErrorDetail::ClientStateNotFound(_), _))));
    }

    #[test]
    /// Two chains open a connection and a channel to each other, then relay
    /// one packet to its acknowledgement and let another one time out.
    fn relay_packets_over_a_fresh_channel() {
        let a_client = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let b_client = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let port = PortId::transfer();
        let version = Version::new("ics20-1");
        let module_id = MockContext::default_module_id();

        let ctx_b = MockContext::new(ChainId::new("mockgaiaB".to_string(), 1), Height::new(1, 5))
            .with_port(port.clone());
        let chain_a = ChainId::new("mockgaiaA".to_string(), 1);
        let mut ctx_a = MockContext::new(chain_a, Height::new(1, 5))
            .with_port(port.clone())
            .with_client_for(&a_client, &ctx_b);
        let mut ctx_b = ctx_b.with_client_for(&b_client, &ctx_a);

        // Connection handshake.
        let conn_a = ConnectionId::new(0);
        let conn_b = ConnectionId::new(0);

        let init = MsgConnectionOpenInit {
            client_id: a_client.clone(),
            counterparty: ConnectionCounterparty::new(
                b_client.clone(),
                None,
                ctx_b.commitment_prefix(),
            ),
            version: None,
            delay_period: Duration::ZERO,
        };
        ctx_a.deliver(ConnectionMsg::ConnectionOpenInit(init).into()).unwrap();

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let conn_try = MsgConnectionOpenTry {
            previous_connection_id: None,
            client_id: b_client.clone(),
            counterparty: ConnectionCounterparty::new(
                a_client.clone(),
                Some(conn_a.clone()),
                ctx_a.commitment_prefix(),
            ),
            counterparty_versions: ctx_a.connection_end(&conn_a).unwrap().versions().to_vec(),
            proofs: latest_proof(&ctx_a, Path::Connections(conn_a.clone())),
            delay_period: Duration::ZERO,
        };
        ctx_b
            .deliver(ConnectionMsg::ConnectionOpenTry(Box::new(conn_try)).into())
            .unwrap();

        update_client(&mut ctx_a, &ctx_b, &a_client);
        let conn_ack = MsgConnectionOpenAck {
            connection_id: conn_a.clone(),
            counterparty_connection_id: conn_b.clone(),
            proofs: latest_proof(&ctx_b, Path::Connections(conn_b.clone())),
            version: ctx_b.connection_end(&conn_b).unwrap().versions()[0].clone(),
        };
        ctx_a
            .deliver(ConnectionMsg::ConnectionOpenAck(Box::new(conn_ack)).into())
            .unwrap();

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let conn_confirm = MsgConnectionOpenConfirm {
            connection_id: conn_b.clone(),
            proofs: latest_proof(&ctx_a, Path::Connections(conn_a.clone())),
        };
        ctx_b
            .deliver(ConnectionMsg::ConnectionOpenConfirm(conn_confirm).into())
            .unwrap();

        assert!(ctx_a.connection_end(&conn_a).unwrap().state_matches(&ConnectionState::Open));
        assert!(ctx_b.connection_end(&conn_b).unwrap().state_matches(&ConnectionState::Open));

        // Channel handshake.
        let chan_a = ChannelId::new(0);
        let chan_b = ChannelId::new(0);

        let chan_init = MsgChannelOpenInit::new(
            port.clone(),
            ChannelEnd::new(
                State::Init,
                Order::Unordered,
                Counterparty::new(port.clone(), None),
                vec![conn_a.clone()],
                version.clone(),
            ),
        );
        ctx_a.deliver(ChannelMsg::ChannelOpenInit(chan_init).into()).unwrap();

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let chan_try = MsgChannelOpenTry {
            port_id: port.clone(),
            channel: ChannelEnd::new(
                State::TryOpen,
                Order::Unordered,
                Counterparty::new(port.clone(), Some(chan_a.clone())),
                vec![conn_b.clone()],
                version.clone(),
            ),
            counterparty_version: version.clone(),
            proofs: latest_proof(&ctx_a, Path::ChannelEnds(port.clone(), chan_a.clone())),
        };
        ctx_b
            .deliver(ChannelMsg::ChannelOpenTry(Box::new(chan_try)).into())
            .unwrap();

        update_client(&mut ctx_a, &ctx_b, &a_client);
        let chan_ack = MsgChannelOpenAck {
            port_id: port.clone(),
            channel_id: chan_a.clone(),
            counterparty_channel_id: chan_b.clone(),
            counterparty_version: version.clone(),
            proofs: latest_proof(&ctx_b, Path::ChannelEnds(port.clone(), chan_b.clone())),
        };
        ctx_a
            .deliver(ChannelMsg::ChannelOpenAck(Box::new(chan_ack)).into())
            .unwrap();

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let chan_confirm = MsgChannelOpenConfirm {
            port_id: port.clone(),
            channel_id: chan_b.clone(),
            proofs: latest_proof(&ctx_a, Path::ChannelEnds(port.clone(), chan_a.clone())),
        };
        ctx_b
            .deliver(ChannelMsg::ChannelOpenConfirm(chan_confirm).into())
            .unwrap();

        assert!(ctx_a.channel_end(&port, &chan_a).unwrap().state_matches(&State::Open));
        assert!(ctx_b.channel_end(&port, &chan_b).unwrap().state_matches(&State::Open));

        // A packet relayed all the way to its acknowledgement.
        let cap = ctx_a
            .get_capability(&CapabilityName::channel(&port, &chan_a))
            .unwrap();
        let receipt = send_packet(
            &mut ctx_a,
            &cap,
            port.clone(),
            chan_a.clone(),
            TimeoutHeight::At(Height::new(1, 1000)),
            Timestamp::none(),
            b"ping".to_vec(),
        )
        .unwrap();
        ctx_a.advance_host_chain_height();
        let packet = sent_packet(&receipt);
        assert_eq!(packet.sequence, 1.into());
        assert_eq!(packet.destination_channel, chan_b);

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let recv = MsgRecvPacket {
            packet: packet.clone(),
            proofs: latest_proof(
                &ctx_a,
                Path::Commitments {
                    port_id: port.clone(),
                    channel_id: chan_a.clone(),
                    sequence: packet.sequence,
                },
            ),
        };
        let receipt = ctx_b.deliver(PacketMsg::RecvPacket(recv).into()).unwrap();
        let ack = receipt
            .events
            .iter()
            .find_map(|event| match event {
                IbcEvent::WriteAcknowledgement(e) => Some(e.ack.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(ctx_b.module(&module_id).unwrap().received, vec![packet.clone()]);

        update_client(&mut ctx_a, &ctx_b, &a_client);
        let ack_msg = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement: Acknowledgement::new(ack).unwrap(),
            proofs: latest_proof(
                &ctx_b,
                Path::Acks {
                    port_id: port.clone(),
                    channel_id: chan_b.clone(),
                    sequence: packet.sequence,
                },
            ),
        };
        ctx_a.deliver(PacketMsg::AckPacket(ack_msg).into()).unwrap();

        let acknowledged = &ctx_a.module(&module_id).unwrap().acknowledged;
        assert_eq!(acknowledged.len(), 1);
        assert!(acknowledged[0].1.is_success());
        assert!(ctx_a
            .get_packet_commitment(&port, &chan_a, packet.sequence)
            .is_none());

        // A packet B never receives before its timeout height.
        let timeout_height = ctx_b.query_latest_height().add(2);
        let receipt = send_packet(
            &mut ctx_a,
            &cap,
            port.clone(),
            chan_a.clone(),
            TimeoutHeight::At(timeout_height),
            Timestamp::none(),
            b"late".to_vec(),
        )
        .unwrap();
        let packet = sent_packet(&receipt);
        assert_eq!(packet.sequence, 2.into());

        while ctx_b.query_latest_height() < timeout_height {
            ctx_b.advance_host_chain_height();
        }
        update_client(&mut ctx_a, &ctx_b, &a_client);

        let timeout = MsgTimeout {
            packet: packet.clone(),
            next_sequence_recv: packet.sequence,
            proofs: latest_proof(
                &ctx_b,
                Path::Receipts {
                    port_id: port.clone(),
                    channel_id: chan_b.clone(),
                    sequence: packet.sequence,
                },
            ),
        };
        ctx_a.deliver(PacketMsg::ToPacket(timeout).into()).unwrap();

        assert_eq!(ctx_a.module(&module_id).unwrap().timed_out, vec![packet.clone()]);
        assert!(ctx_a
            .get_packet_commitment(&port, &chan_a, packet.sequence)
            .is_none());

        // A timed out packet can no longer be acknowledged.
        let late_ack = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement: Acknowledgement::success(),
            proofs: latest_proof(&ctx_b, Path::ChannelEnds(port.clone(), chan_b.clone())),
        };
        assert!(commitment_not_found(
            ctx_a.deliver(PacketMsg::AckPacket(late_ack).into())
        ));

        // Nor can an acknowledged packet time out later on.
        let timeout_height = ctx_b.query_latest_height().add(40);
        let receipt = send_packet(
            &mut ctx_a,
            &cap,
            port.clone(),
            chan_a.clone(),
            TimeoutHeight::At(timeout_height),
            Timestamp::none(),
            b"pong".to_vec(),
        )
        .unwrap();
        ctx_a.advance_host_chain_height();
        let packet = sent_packet(&receipt);
        assert_eq!(packet.sequence, 3.into());

        update_client(&mut ctx_b, &ctx_a, &b_client);
        let commitment_path = Path::Commitments {
            port_id: port.clone(),
            channel_id: chan_a.clone(),
            sequence: packet.sequence,
        };
        let recv = MsgRecvPacket {
            packet: packet.clone(),
            proofs: latest_proof(&ctx_a, commitment_path),
        };
        ctx_b.deliver(PacketMsg::RecvPacket(recv).into()).unwrap();

        update_client(&mut ctx_a, &ctx_b, &a_client);
        let ack_msg = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement: Acknowledgement::success(),
            proofs: latest_proof(
                &ctx_b,
                Path::Acks {
                    port_id: port.clone(),
                    channel_id: chan_b.clone(),
                    sequence: packet.sequence,
                },
            ),
        };
        ctx_a.deliver(PacketMsg::AckPacket(ack_msg).into()).unwrap();

        while ctx_b.query_latest_height() < timeout_height {
            ctx_b.advance_host_chain_height();
        }
        update_client(&mut ctx_a, &ctx_b, &a_client);
        let late_timeout = MsgTimeout {
            packet: packet.clone(),
            next_sequence_recv: packet.sequence,
            proofs: latest_proof(&ctx_b, Path::ChannelEnds(port.clone(), chan_b.clone())),
        };
        assert!(commitment_not_found(
            ctx_a.deliver(PacketMsg::ToPacket(late_timeout).into())
        ));

        assert!(ctx_a.validate().is_ok());
        assert!(ctx_b.validate().is_ok());
    }
}
