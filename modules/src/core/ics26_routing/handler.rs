//! Entry points of the IBC module: message delivery for relayers, and the
//! calls an application or governance makes directly.

use tracing::{debug, info, warn};

use crate::core::ics02_client::handler::{dispatch as ics2_msg_dispatcher, substitute_client};
use crate::core::ics02_client::msgs::substitute_client::MsgSubstituteClient;
use crate::core::ics03_connection::handler::dispatch as ics3_msg_dispatcher;
use crate::core::ics04_channel::handler::send_packet::send_packet as ics4_send_packet;
use crate::core::ics04_channel::handler::{
    chan_close_init, channel_callback, channel_dispatch, channel_validate, packet_callback,
    packet_dispatch, packet_validate,
};
use crate::core::ics04_channel::msgs::chan_close_init::MsgChannelCloseInit;
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics05_port::capabilities::Capability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics26_routing::context::{Ics26Context, ModuleId, Router};
use crate::core::ics26_routing::error::Error;
use crate::core::ics26_routing::msgs::Ics26Envelope::{
    self, Ics2Msg, Ics3Msg, Ics4ChannelMsg, Ics4PacketMsg,
};
use crate::events::IbcEvent;
use crate::handler::HandlerOutput;
use crate::timestamp::Timestamp;

/// Result of a successfully applied message.
#[derive(Clone, Debug)]
pub struct MsgReceipt {
    pub events: Vec<IbcEvent>,
    pub log: Vec<String>,
}

impl<T> From<HandlerOutput<T>> for MsgReceipt {
    fn from(output: HandlerOutput<T>) -> Self {
        Self {
            events: output.events,
            log: output.log,
        }
    }
}

/// Mimics the DeliverTx ABCI interface, but for a single message.
///
/// The message is applied to a copy of `ctx`, which replaces `ctx` only if
/// every step (processing, application callbacks, storing) succeeded. On
/// error `ctx` is left untouched.
pub fn deliver<Ctx>(ctx: &mut Ctx, msg: Ics26Envelope) -> Result<MsgReceipt, Error>
where
    Ctx: Ics26Context,
{
    match staged(ctx, |ctx| dispatch(ctx, msg)) {
        Ok(output) => {
            debug!("message applied with {} event(s)", output.events.len());
            Ok(output.into())
        }
        Err(e) => {
            warn!("message rejected: {}", e);
            Err(e)
        }
    }
}

/// Runs `f` against a copy of `ctx`. The copy replaces `ctx` only if `f`
/// succeeds, so a failure halfway through leaves no partial writes behind.
fn staged<Ctx, T, F>(ctx: &mut Ctx, f: F) -> Result<T, Error>
where
    Ctx: Ics26Context,
    F: FnOnce(&mut Ctx) -> Result<T, Error>,
{
    let mut staged = ctx.clone();
    let res = f(&mut staged)?;
    *ctx = staged;
    Ok(res)
}

/// Processes a message and persists its result. Changes are written straight
/// into `ctx`; use [`deliver`] unless the caller does its own staging.
pub fn dispatch<Ctx>(ctx: &mut Ctx, msg: Ics26Envelope) -> Result<HandlerOutput<()>, Error>
where
    Ctx: Ics26Context,
{
    let output = match msg {
        Ics2Msg(msg) => {
            let handler_output = ics2_msg_dispatcher(ctx, msg).map_err(Error::ics02_client)?;

            ctx.store_client_result(handler_output.result.clone())
                .map_err(Error::ics02_client)?;

            handler_output.map(|_| ())
        }

        Ics3Msg(msg) => {
            let handler_output = ics3_msg_dispatcher(ctx, msg).map_err(Error::ics03_connection)?;

            ctx.store_connection_result(handler_output.result.clone())
                .map_err(Error::ics03_connection)?;

            handler_output.map(|_| ())
        }

        Ics4ChannelMsg(msg) => {
            let module_id = channel_validate(ctx, &msg).map_err(Error::ics04_channel)?;
            let mut handler_output = channel_dispatch(ctx, &msg).map_err(Error::ics04_channel)?;

            channel_callback(ctx, &module_id, &msg, &mut handler_output)
                .map_err(Error::ics04_channel)?;

            ctx.store_channel_result(handler_output.result.clone())
                .map_err(Error::ics04_channel)?;

            handler_output.map(|_| ())
        }

        Ics4PacketMsg(msg) => {
            let module_id = packet_validate(ctx, &msg).map_err(Error::ics04_channel)?;
            let handler_output = packet_dispatch(ctx, &msg).map_err(Error::ics04_channel)?;

            ctx.store_packet_result(handler_output.result.clone())
                .map_err(Error::ics04_channel)?;

            let mut handler_output = handler_output.map(|_| ());
            packet_callback(ctx, &module_id, &msg, &mut handler_output)
                .map_err(Error::ics04_channel)?;

            handler_output
        }
    };

    Ok(output)
}

/// Binds `port_id` to the routed module `module_id`. The returned port
/// capability is what authorizes the module to open channels on the port.
pub fn bind_port<Ctx>(
    ctx: &mut Ctx,
    port_id: PortId,
    module_id: ModuleId,
) -> Result<Capability, Error>
where
    Ctx: Ics26Context,
{
    if !ctx.router().has_route(&module_id) {
        return Err(Error::unknown_module(module_id));
    }

    info!("binding port {} to module {}", port_id, module_id);
    staged(ctx, |ctx| ctx.bind_port(port_id, module_id).map_err(Error::ics05_port))
}

/// Commits an outgoing packet on behalf of the application holding
/// `channel_cap`. The `SendPacket` event in the receipt carries the packet,
/// sequence included.
#[allow(clippy::too_many_arguments)]
pub fn send_packet<Ctx>(
    ctx: &mut Ctx,
    channel_cap: &Capability,
    source_port: PortId,
    source_channel: ChannelId,
    timeout_height: TimeoutHeight,
    timeout_timestamp: Timestamp,
    data: Vec<u8>,
) -> Result<MsgReceipt, Error>
where
    Ctx: Ics26Context,
{
    staged(ctx, |ctx| {
        let handler_output = ics4_send_packet(
            ctx,
            channel_cap,
            source_port,
            source_channel,
            timeout_height,
            timeout_timestamp,
            data,
        )
        .map_err(Error::ics04_channel)?;

        ctx.store_packet_result(handler_output.result.clone())
            .map_err(Error::ics04_channel)?;

        Ok(handler_output.into())
    })
}

/// Starts the closing handshake on behalf of the application holding
/// `channel_cap`. The application is not called back for a close it asked for.
pub fn close_channel<Ctx>(
    ctx: &mut Ctx,
    channel_cap: &Capability,
    port_id: PortId,
    channel_id: ChannelId,
) -> Result<MsgReceipt, Error>
where
    Ctx: Ics26Context,
{
    ctx.authenticate_channel_capability(&port_id, &channel_id, channel_cap)
        .map_err(Error::ics04_channel)?;

    let msg = MsgChannelCloseInit {
        port_id,
        channel_id,
    };
    staged(ctx, |ctx| {
        let handler_output =
            chan_close_init::process(ctx, &msg).map_err(Error::ics04_channel)?;

        ctx.store_channel_result(handler_output.result.clone())
            .map_err(Error::ics04_channel)?;

        Ok(handler_output.into())
    })
}

/// Replaces the trust material of a frozen or expired client with that of a
/// healthy client tracking the same chain.
pub fn substitute_client<Ctx>(ctx: &mut Ctx, msg: MsgSubstituteClient) -> Result<MsgReceipt, Error>
where
    Ctx: Ics26Context,
{
    staged(ctx, |ctx| {
        let handler_output =
            substitute_client::process(&*ctx, msg).map_err(Error::ics02_client)?;

        ctx.store_client_result(handler_output.result.clone())
            .map_err(Error::ics02_client)?;

        Ok(handler_output.into())
    })
}
