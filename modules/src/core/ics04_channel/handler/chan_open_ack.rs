//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenAck`.

use tracing::info;

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{authenticate_channel, ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenAck,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    // Validate that the channel end is in a state where it can be ack.
    if !channel_end.state_matches(&State::Init) {
        return Err(Error::invalid_channel_state(
            msg.channel_id.clone(),
            channel_end.state,
        ));
    }

    authenticate_channel(ctx, &msg.port_id, &msg.channel_id)?;

    let connection_id = channel_end.single_connection_hop()?.clone();
    let conn = ctx.open_connection_end(&connection_id)?;

    let counterparty_connection_id = conn.counterparty().connection_id().ok_or_else(|| {
        Error::ics03_connection(ConnectionError::missing_counterparty_connection_id())
    })?;

    // The counterparty channel id is learned here.
    channel_end.set_counterparty_channel_id(msg.counterparty_channel_id.clone());

    let expected_channel_end = ChannelEnd::new(
        State::TryOpen,
        *channel_end.ordering(),
        Counterparty::new(msg.port_id.clone(), Some(msg.channel_id.clone())),
        vec![counterparty_connection_id.clone()],
        msg.counterparty_version.clone(),
    );

    verify_channel_proofs(
        ctx,
        &channel_end,
        &conn,
        &expected_channel_end,
        &msg.proofs,
    )?;

    // Transition the channel end to the new state & pick a version.
    channel_end.set_state(State::Open);
    channel_end.set_version(msg.counterparty_version.clone());

    info!("channel {}/{} is OPEN", msg.port_id, msg.channel_id);
    output.log("success: channel open ack");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id.clone()),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: Some(msg.counterparty_channel_id.clone()),
    };
    output.emit(IbcEvent::OpenAckChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id.clone(),
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
