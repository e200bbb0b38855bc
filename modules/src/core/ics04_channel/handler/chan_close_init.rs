//! Protocol logic specific to ICS4 messages of type `MsgChannelCloseInit`.

use tracing::info;

use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::{authenticate_channel, ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_close_init::MsgChannelCloseInit;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelCloseInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    // Closing a closed channel is an error.
    if channel_end.state_matches(&State::Closed) {
        return Err(Error::channel_closed(msg.channel_id.clone()));
    }

    authenticate_channel(ctx, &msg.port_id, &msg.channel_id)?;

    let connection_id = channel_end.single_connection_hop()?.clone();
    ctx.open_connection_end(&connection_id)?;

    channel_end.set_state(State::Closed);

    info!("channel {}/{} is CLOSED", msg.port_id, msg.channel_id);
    output.log("success: channel close init");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id.clone()),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().cloned(),
    };
    output.emit(IbcEvent::CloseInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id.clone(),
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
