//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenConfirm`.

use tracing::info;

use crate::core::ics03_connection::error::Error as ConnectionError;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{authenticate_channel, ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenConfirm,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    let mut channel_end = ctx.channel_end(&msg.port_id, &msg.channel_id)?;

    if !channel_end.state_matches(&State::TryOpen) {
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

    let expected_channel_end = ChannelEnd::new(
        State::Open,
        *channel_end.ordering(),
        Counterparty::new(msg.port_id.clone(), Some(msg.channel_id.clone())),
        vec![counterparty_connection_id.clone()],
        channel_end.version().clone(),
    );

    verify_channel_proofs(
        ctx,
        &channel_end,
        &conn,
        &expected_channel_end,
        &msg.proofs,
    )?;

    channel_end.set_state(State::Open);

    info!("channel {}/{} is OPEN", msg.port_id, msg.channel_id);
    output.log("success: channel open confirm");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id.clone()),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().cloned(),
    };
    output.emit(IbcEvent::OpenConfirmChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id.clone(),
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics03_connection::connection::State as ConnectionState;
    use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
    use crate::core::ics04_channel::error::{Error, ErrorDetail};
    use crate::core::ics04_channel::handler::channel_dispatch;
    use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics04_channel::version::Version;
    use crate::core::ics23_commitment::commitment::CommitmentPrefix;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{
        get_dummy_connection_end, get_dummy_secret_key, get_dummy_solomachine_proofs,
    };

    #[test]
    fn chan_open_confirm_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: ChannelMsg,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let sequence = 9;
        let sk = get_dummy_secret_key(4);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(1);
        let counterparty_chan_id = ChannelId::new(0);
        let conn_id = ConnectionId::new(2);

        let try_end = ChannelEnd::new(
            State::TryOpen,
            Order::Ordered,
            Counterparty::new(PortId::transfer(), Some(counterparty_chan_id.clone())),
            vec![conn_id.clone()],
            Version::new("ics20-1"),
        );

        let counterparty_open_end = ChannelEnd::new(
            State::Open,
            Order::Ordered,
            Counterparty::new(port_id.clone(), Some(chan_id.clone())),
            vec![ConnectionId::new(1)],
            Version::new("ics20-1"),
        );

        let msg = MsgChannelOpenConfirm {
            port_id: port_id.clone(),
            channel_id: chan_id.clone(),
            proofs: get_dummy_solomachine_proofs(
                &sk,
                sequence,
                &CommitmentPrefix::default(),
                &Path::ChannelEnds(PortId::transfer(), counterparty_chan_id),
                counterparty_open_end.encode_vec(),
            ),
        };

        let mut init_end = try_end.clone();
        init_end.set_state(State::Init);

        let mut other_version = try_end.clone();
        other_version.set_version(Version::new("ics20-2"));

        let ctx = MockContext::default()
            .with_port(port_id.clone())
            .with_solomachine_client(&client_id, &sk, sequence)
            .with_connection(conn_id, get_dummy_connection_end(ConnectionState::Open));

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because the channel is not in TRYOPEN".to_string(),
                ctx: ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), init_end),
                msg: ChannelMsg::ChannelOpenConfirm(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::InvalidChannelState(_))),
            },
            Test {
                name: "Processing fails because the proven end has another version".to_string(),
                ctx: ctx
                    .clone()
                    .with_channel(port_id.clone(), chan_id.clone(), other_version),
                msg: ChannelMsg::ChannelOpenConfirm(msg.clone()),
                expected_error: Some(|e| matches!(e, ErrorDetail::ChannelVerificationFailed(_))),
            },
            Test {
                name: "Good parameters".to_string(),
                ctx: ctx.with_channel(port_id, chan_id, try_end),
                msg: ChannelMsg::ChannelOpenConfirm(msg),
                expected_error: None,
            },
        ];

        for test in tests {
            let res = channel_dispatch(&test.ctx, &test.msg);
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "chan_open_confirm: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert!(!proto_output.events.is_empty()); // Some events must exist.
                    assert_eq!(proto_output.result.channel_end.state(), &State::Open);

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenConfirmChannel(_)));
                    }
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("chan_open_confirm: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }
}
