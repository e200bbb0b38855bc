//! This module implements the processing logic for ICS4 (channel) messages.

use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};
use crate::core::ics04_channel::packet::PacketResult;
use crate::core::ics05_port::capabilities::CapabilityName;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics26_routing::context::{Ics26Context, ModuleId, ModuleOutputBuilder, Router};
use crate::handler::{HandlerOutput, HandlerResult};

pub mod acknowledgement;
pub mod chan_close_confirm;
pub mod chan_close_init;
pub mod chan_open_ack;
pub mod chan_open_confirm;
pub mod chan_open_init;
pub mod chan_open_try;
pub mod recv_packet;
pub mod send_packet;
pub mod timeout;
pub mod verify;
pub mod write_acknowledgement;

/// Defines the possible states of a channel identifier in a `ChannelResult`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelIdState {
    /// Specifies that the channel handshake handler allocated a new channel identifier. This
    /// happens during the processing of either the `MsgChannelOpenInit` or `MsgChannelOpenTry`.
    Generated,

    /// Specifies that the handler reused a previously-allocated channel identifier.
    Reused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub channel_id_state: ChannelIdState,
    pub channel_end: ChannelEnd,
}

/// The port must be bound, and the module behind it must hold the port capability.
pub(crate) fn authenticate_port<Ctx: ChannelReader>(
    ctx: &Ctx,
    port_id: &PortId,
) -> Result<(), Error> {
    let (_, port_cap) = ctx.lookup_module_by_port(port_id).map_err(Error::ics05_port)?;
    ctx.authenticate_capability(&CapabilityName::port(port_id), &port_cap)
        .map_err(Error::channel_capability_not_found)
}

/// The channel capability must have been granted to the module behind the port.
pub(crate) fn authenticate_channel<Ctx: ChannelReader>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), Error> {
    let (_, channel_cap) = ctx.lookup_module_by_channel(port_id, channel_id)?;
    ctx.authenticate_channel_capability(port_id, channel_id, &channel_cap)
}

/// Finds the module that must be notified of a channel handshake step.
pub fn channel_validate<Ctx>(ctx: &Ctx, msg: &ChannelMsg) -> Result<ModuleId, Error>
where
    Ctx: Ics26Context,
{
    let module_id = match msg {
        ChannelMsg::ChannelOpenInit(msg) => {
            ctx.lookup_module_by_port(&msg.port_id)
                .map_err(Error::ics05_port)?
                .0
        }
        ChannelMsg::ChannelOpenTry(msg) => {
            ctx.lookup_module_by_port(&msg.port_id)
                .map_err(Error::ics05_port)?
                .0
        }
        ChannelMsg::ChannelOpenAck(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
                .0
        }
        ChannelMsg::ChannelOpenConfirm(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
                .0
        }
        ChannelMsg::ChannelCloseInit(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
                .0
        }
        ChannelMsg::ChannelCloseConfirm(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
                .0
        }
    };

    if ctx.router().has_route(&module_id) {
        Ok(module_id)
    } else {
        Err(Error::route_not_found(module_id))
    }
}

/// General entry point for processing any type of message related to the ICS4 channel open and
/// channel close handshake protocols.
pub fn channel_dispatch<Ctx>(ctx: &Ctx, msg: &ChannelMsg) -> HandlerResult<ChannelResult, Error>
where
    Ctx: ChannelReader,
{
    match msg {
        ChannelMsg::ChannelOpenInit(msg) => chan_open_init::process(ctx, msg),
        ChannelMsg::ChannelOpenTry(msg) => chan_open_try::process(ctx, msg),
        ChannelMsg::ChannelOpenAck(msg) => chan_open_ack::process(ctx, msg),
        ChannelMsg::ChannelOpenConfirm(msg) => chan_open_confirm::process(ctx, msg),
        ChannelMsg::ChannelCloseInit(msg) => chan_close_init::process(ctx, msg),
        ChannelMsg::ChannelCloseConfirm(msg) => chan_close_confirm::process(ctx, msg),
    }
}

/// Runs the application callback for a processed handshake message. On
/// `ChanOpenTry` the module picks the application version of the new end.
pub fn channel_callback<Ctx>(
    ctx: &mut Ctx,
    module_id: &ModuleId,
    msg: &ChannelMsg,
    handler_output: &mut HandlerOutput<ChannelResult>,
) -> Result<(), Error>
where
    Ctx: Ics26Context,
{
    let mut module_output = ModuleOutputBuilder::new();
    let cb = ctx
        .router_mut()
        .get_route_mut(module_id)
        .ok_or_else(|| Error::route_not_found(module_id.clone()))?;

    let result = &mut handler_output.result;
    match msg {
        ChannelMsg::ChannelOpenInit(msg) => cb.on_chan_open_init(
            &mut module_output,
            msg.channel.ordering,
            &msg.channel.connection_hops,
            &msg.port_id,
            &result.channel_id,
            msg.channel.counterparty(),
            &msg.channel.version,
        )?,
        ChannelMsg::ChannelOpenTry(msg) => {
            let version = cb.on_chan_open_try(
                &mut module_output,
                msg.channel.ordering,
                &msg.channel.connection_hops,
                &msg.port_id,
                &result.channel_id,
                msg.channel.counterparty(),
                &msg.counterparty_version,
            )?;
            result.channel_end.set_version(version);
        }
        ChannelMsg::ChannelOpenAck(msg) => cb.on_chan_open_ack(
            &mut module_output,
            &msg.port_id,
            &result.channel_id,
            &msg.counterparty_version,
        )?,
        ChannelMsg::ChannelOpenConfirm(msg) => {
            cb.on_chan_open_confirm(&mut module_output, &msg.port_id, &result.channel_id)?
        }
        ChannelMsg::ChannelCloseInit(msg) => {
            cb.on_chan_close_init(&mut module_output, &msg.port_id, &result.channel_id)?
        }
        ChannelMsg::ChannelCloseConfirm(msg) => {
            cb.on_chan_close_confirm(&mut module_output, &msg.port_id, &result.channel_id)?
        }
    }

    let module_output = module_output.with_result(());
    handler_output.log.extend(module_output.log);
    handler_output.events.extend(module_output.events);
    Ok(())
}

/// Finds the module that owns the local end of a packet message.
pub fn packet_validate<Ctx>(ctx: &Ctx, msg: &PacketMsg) -> Result<ModuleId, Error>
where
    Ctx: Ics26Context,
{
    let (port_id, channel_id) = match msg {
        PacketMsg::RecvPacket(msg) => (
            &msg.packet.destination_port,
            &msg.packet.destination_channel,
        ),
        PacketMsg::AckPacket(msg) => (&msg.packet.source_port, &msg.packet.source_channel),
        PacketMsg::ToPacket(msg) => (&msg.packet.source_port, &msg.packet.source_channel),
    };

    let module_id = ctx.lookup_module_by_channel(port_id, channel_id)?.0;
    if ctx.router().has_route(&module_id) {
        Ok(module_id)
    } else {
        Err(Error::route_not_found(module_id))
    }
}

/// Dispatcher for processing any type of message related to the ICS4 packet protocols.
pub fn packet_dispatch<Ctx>(ctx: &Ctx, msg: &PacketMsg) -> HandlerResult<PacketResult, Error>
where
    Ctx: ChannelReader,
{
    match msg {
        PacketMsg::RecvPacket(msg) => recv_packet::process(ctx, msg),
        PacketMsg::AckPacket(msg) => acknowledgement::process(ctx, msg),
        PacketMsg::ToPacket(msg) => timeout::process(ctx, msg),
    }
}

/// Runs the application callback for a processed packet message. A received
/// packet is acknowledged right away: the acknowledgement the module returns
/// is written to the store and its event added to `handler_output`.
pub fn packet_callback<Ctx>(
    ctx: &mut Ctx,
    module_id: &ModuleId,
    msg: &PacketMsg,
    handler_output: &mut HandlerOutput<()>,
) -> Result<(), Error>
where
    Ctx: Ics26Context,
{
    let mut module_output = ModuleOutputBuilder::new();
    let cb = ctx
        .router_mut()
        .get_route_mut(module_id)
        .ok_or_else(|| Error::route_not_found(module_id.clone()))?;

    match msg {
        PacketMsg::RecvPacket(msg) => {
            let ack = cb.on_recv_packet(&mut module_output, &msg.packet);
            let write_output = write_acknowledgement::process(&*ctx, msg.packet.clone(), ack)?;

            handler_output.log.extend(write_output.log);
            handler_output.events.extend(write_output.events);
            ctx.store_packet_result(write_output.result)?;
        }
        PacketMsg::AckPacket(msg) => {
            cb.on_acknowledgement_packet(&mut module_output, &msg.packet, &msg.acknowledgement)?
        }
        PacketMsg::ToPacket(msg) => cb.on_timeout_packet(&mut module_output, &msg.packet)?,
    }

    let module_output = module_output.with_result(());
    handler_output.log.extend(module_output.log);
    handler_output.events.extend(module_output.events);
    Ok(())
}
