//! Proof verification shared by the channel handshake and packet handlers.

use tracing::debug;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::handler::verify::verify_delay_passed;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{compute_packet_commitment, AcknowledgementCommitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics24_host::path::Path;
use crate::proofs::Proofs;

/// The client behind `connection_end`, which must not be frozen.
fn unfrozen_client<Ctx: ChannelReader>(
    ctx: &Ctx,
    connection_end: &ConnectionEnd,
) -> Result<(AnyClientState, AnyClient), Error> {
    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;

    if client_state.is_frozen() {
        return Err(Error::frozen_client(client_id.clone()));
    }

    let client_def = AnyClient::from_client_type(client_state.client_type());
    Ok((client_state, client_def))
}

/// Entry point for verifying all proofs bundled in any ICS4 message for channel protocols.
pub fn verify_channel_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    channel_end: &ChannelEnd,
    connection_end: &ConnectionEnd,
    expected_chan: &ChannelEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, client_def) = unfrozen_client(ctx, connection_end)?;

    verify_delay_passed(ctx, proofs.height(), connection_end).map_err(Error::ics03_connection)?;

    let counterparty = channel_end.counterparty();
    let counterparty_channel_id = counterparty
        .channel_id()
        .ok_or_else(Error::missing_counterparty_channel_id)?;

    debug!(
        "verifying channel {}/{} at {}",
        counterparty.port_id(),
        counterparty_channel_id,
        proofs.height()
    );

    client_def
        .verify_membership(
            ctx,
            connection_end.client_id(),
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::ChannelEnds(counterparty.port_id().clone(), counterparty_channel_id.clone()),
            expected_chan.encode_vec(),
        )
        .map_err(|e| Error::channel_verification_failed(counterparty_channel_id.clone(), e))
}

/// Entry point for verifying the commitment proof carried by a `MsgRecvPacket`.
pub fn verify_packet_recv_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    packet: &Packet,
    connection_end: &ConnectionEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, client_def) = unfrozen_client(ctx, connection_end)?;

    verify_delay_passed(ctx, proofs.height(), connection_end).map_err(Error::ics03_connection)?;

    let commitment = compute_packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );

    client_def
        .verify_membership(
            ctx,
            connection_end.client_id(),
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::Commitments {
                port_id: packet.source_port.clone(),
                channel_id: packet.source_channel.clone(),
                sequence: packet.sequence,
            },
            commitment.into_vec(),
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying the acknowledgement proof carried by a `MsgAcknowledgement`.
pub fn verify_packet_acknowledgement_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    packet: &Packet,
    ack_commitment: AcknowledgementCommitment,
    connection_end: &ConnectionEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, client_def) = unfrozen_client(ctx, connection_end)?;

    verify_delay_passed(ctx, proofs.height(), connection_end).map_err(Error::ics03_connection)?;

    client_def
        .verify_membership(
            ctx,
            connection_end.client_id(),
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::Acks {
                port_id: packet.destination_port.clone(),
                channel_id: packet.destination_channel.clone(),
                sequence: packet.sequence,
            },
            ack_commitment.into_vec(),
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying the counterparty's next receive sequence (ordered timeouts).
pub fn verify_next_sequence_recv<Ctx: ChannelReader>(
    ctx: &Ctx,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    next_sequence_recv: Sequence,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, client_def) = unfrozen_client(ctx, connection_end)?;

    verify_delay_passed(ctx, proofs.height(), connection_end).map_err(Error::ics03_connection)?;

    client_def
        .verify_membership(
            ctx,
            connection_end.client_id(),
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::SeqRecvs(
                packet.destination_port.clone(),
                packet.destination_channel.clone(),
            ),
            next_sequence_recv.to_be_bytes().to_vec(),
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying that the counterparty never received a packet (unordered timeouts).
pub fn verify_packet_receipt_absence<Ctx: ChannelReader>(
    ctx: &Ctx,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    proofs: &Proofs,
) -> Result<(), Error> {
    let (client_state, client_def) = unfrozen_client(ctx, connection_end)?;

    verify_delay_passed(ctx, proofs.height(), connection_end).map_err(Error::ics03_connection)?;

    client_def
        .verify_non_membership(
            ctx,
            connection_end.client_id(),
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::Receipts {
                port_id: packet.destination_port.clone(),
                channel_id: packet.destination_channel.clone(),
                sequence: packet.sequence,
            },
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}
