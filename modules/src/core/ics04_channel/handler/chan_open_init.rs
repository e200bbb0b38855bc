//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenInit`.

use tracing::info;

use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::{authenticate_port, ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    authenticate_port(ctx, &msg.port_id)?;

    // Channel capabilities
    let connection_id = msg.channel.single_connection_hop()?;
    let conn = ctx.open_connection_end(connection_id)?;

    let conn_version = match conn.versions() {
        [version] => version,
        _ => return Err(Error::invalid_version_length_connection(connection_id.clone())),
    };

    if !conn_version.supports_order(msg.channel.ordering) {
        return Err(Error::version_negotiation_failed(connection_id.clone()));
    }

    // The counterparty channel id is only learned in ChanOpenAck.
    let new_channel_end = ChannelEnd::new(
        State::Init,
        msg.channel.ordering,
        Counterparty::new(msg.channel.counterparty().port_id().clone(), None),
        msg.channel.connection_hops.clone(),
        msg.channel.version.clone(),
    );

    let chan_id = ChannelId::new(ctx.channel_counter()?);

    info!("channel {}/{} initialized over {}", msg.port_id, chan_id, connection_id);
    output.log(format!(
        "success: generated new channel identifier: {}",
        chan_id
    ));

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(chan_id.clone()),
        connection_id: connection_id.clone(),
        counterparty_port_id: new_channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: None,
    };
    output.emit(IbcEvent::OpenInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: chan_id,
        channel_id_state: ChannelIdState::Generated,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::error::{Error, ErrorDetail};
    use crate::core::ics04_channel::handler::channel_dispatch;
    use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics04_channel::version::Version;
    use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::get_dummy_connection_end;

    #[test]
    fn chan_open_init_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: ChannelMsg,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let port_id = PortId::transfer();
        let conn_id = ConnectionId::new(2);
        let open_conn = get_dummy_connection_end(ConnectionState::Open);
        let init_conn = get_dummy_connection_end(ConnectionState::Init);

        let channel = ChannelEnd::new(
            State::Init,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), None),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );
        let msg = MsgChannelOpenInit::new(port_id.clone(), channel.clone());

        let mut two_hops = msg.clone();
        two_hops.channel.connection_hops.push(ConnectionId::new(3));

        let ctx = MockContext::default().with_port(port_id.clone());

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because the port is not bound".to_string(),
                ctx: MockContext::default().with_connection(conn_id.clone(), open_conn.clone()),
                msg: ChannelMsg::ChannelOpenInit(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::Ics05Port(_))),
            },
            Test {
                name: "Processing fails because no connection exists".to_string(),
                ctx: ctx.clone(),
                msg: ChannelMsg::ChannelOpenInit(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::Ics03Connection(_))),
            },
            Test {
                name: "Processing fails because the connection is not open".to_string(),
                ctx: ctx.clone().with_connection(conn_id.clone(), init_conn),
                msg: ChannelMsg::ChannelOpenInit(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::ConnectionNotOpen(_))),
            },
            Test {
                name: "Processing fails because of multiple connection hops".to_string(),
                ctx: ctx.clone().with_connection(conn_id.clone(), open_conn.clone()),
                msg: ChannelMsg::ChannelOpenInit(two_hops),
                expected_error: Some(|e| matches!(e, ErrorDetail::InvalidConnectionHopsLength(_))),
            },
            Test {
                name: "Good parameters".to_string(),
                ctx: ctx.with_connection(conn_id, open_conn),
                msg: ChannelMsg::ChannelOpenInit(msg),
                expected_error: None,
            },
        ];

        for test in tests {
            let res = channel_dispatch(&test.ctx, &test.msg);
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "chan_open_init: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert!(!proto_output.events.is_empty()); // Some events must exist.
                    let res = proto_output.result;
                    assert_eq!(res.channel_id, ChannelId::new(0));
                    assert_eq!(res.channel_end.state(), &State::Init);
                    assert_eq!(res.channel_end.version(), &Version::new("ics20-1"));

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenInitChannel(_)));
                    }
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("chan_open_init: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }
}
