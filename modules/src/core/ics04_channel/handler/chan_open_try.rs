//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenTry`.

use tracing::info;

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{authenticate_port, ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenTry,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    authenticate_port(ctx, &msg.port_id)?;

    let connection_id = msg.channel.single_connection_hop()?;
    let conn = ctx.open_connection_end(connection_id)?;

    let conn_version = match conn.versions() {
        [version] => version,
        _ => return Err(Error::invalid_version_length_connection(connection_id.clone())),
    };

    if !conn_version.supports_order(msg.channel.ordering) {
        return Err(Error::version_negotiation_failed(connection_id.clone()));
    }

    let counterparty_channel_id = msg
        .channel
        .counterparty()
        .channel_id()
        .ok_or_else(Error::missing_counterparty_channel_id)?;

    let counterparty_connection_id = conn.counterparty().connection_id().ok_or_else(|| {
        Error::ics03_connection(ConnectionError::missing_counterparty_connection_id())
    })?;

    // The INIT end the counterparty must have committed.
    let expected_channel_end = ChannelEnd::new(
        State::Init,
        msg.channel.ordering,
        Counterparty::new(msg.port_id.clone(), None),
        vec![counterparty_connection_id.clone()],
        msg.counterparty_version.clone(),
    );

    let new_channel_end = ChannelEnd::new(
        State::TryOpen,
        msg.channel.ordering,
        msg.channel.counterparty().clone(),
        msg.channel.connection_hops.clone(),
        // The application callback settles the final version.
        msg.channel.version.clone(),
    );

    verify_channel_proofs(
        ctx,
        &new_channel_end,
        &conn,
        &expected_channel_end,
        &msg.proofs,
    )?;

    let chan_id = ChannelId::new(ctx.channel_counter()?);

    info!(
        "channel {}/{} is TRYOPEN, counterparty {}/{}",
        msg.port_id,
        chan_id,
        msg.channel.counterparty().port_id(),
        counterparty_channel_id
    );
    output.log(format!(
        "success: generated new channel identifier: {}",
        chan_id
    ));

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(chan_id.clone()),
        connection_id: connection_id.clone(),
        counterparty_port_id: msg.channel.counterparty().port_id().clone(),
        counterparty_channel_id: Some(counterparty_channel_id.clone()),
    };
    output.emit(IbcEvent::OpenTryChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: chan_id,
        channel_id_state: ChannelIdState::Generated,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}
