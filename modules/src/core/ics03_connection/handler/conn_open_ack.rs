//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenAck`.

use tracing::info;

use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::verify::verify_connection_proof;
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_ack::MsgConnectionOpenAck;
use crate::core::ics03_connection::version::is_supported_version;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenAck,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // Validate the connection end.
    let mut conn_end = ctx.connection_end(&msg.connection_id)?;

    // A connection end must be Init or TryOpen; otherwise we return an error.
    match conn_end.state() {
        State::Init => {
            // Init: the chosen version must narrow one of the versions we proposed.
            if !is_supported_version(conn_end.versions(), &msg.version) {
                return Err(Error::version_not_supported(msg.version));
            }
        }
        State::TryOpen => {
            // TryOpen: the version was already picked and cannot change.
            if conn_end.versions() != [msg.version.clone()] {
                return Err(Error::version_not_supported(msg.version));
            }
        }
        state => {
            return Err(Error::invalid_connection_state(
                msg.connection_id,
                *state,
            ))
        }
    }

    // The counterparty connection id may only be filled in, never replaced.
    if let Some(existing) = conn_end.counterparty().connection_id() {
        if existing != &msg.counterparty_connection_id {
            return Err(Error::connection_mismatch(msg.connection_id));
        }
    }

    // Set the counterparty connection id; this may have been missing during Init.
    conn_end.set_counterparty(Counterparty::new(
        conn_end.counterparty().client_id().clone(),
        Some(msg.counterparty_connection_id.clone()),
        conn_end.counterparty().prefix().clone(),
    ));

    // Proof verification.
    let expected_conn = ConnectionEnd::new(
        State::TryOpen,
        conn_end.counterparty().client_id().clone(),
        Counterparty::new(
            conn_end.client_id().clone(),
            Some(msg.connection_id.clone()),
            ctx.commitment_prefix(),
        ),
        vec![msg.version.clone()],
        conn_end.delay_period(),
    );

    verify_connection_proof(ctx, &conn_end, &expected_conn, &msg.proofs)?;

    // Transition our own end of the connection to state OPEN.
    conn_end.set_state(State::Open);
    conn_end.set_version(msg.version);

    info!("connection {} is OPEN", msg.connection_id);
    output.log("success: connection verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(msg.connection_id.clone()),
        client_id: conn_end.client_id().clone(),
        counterparty_connection_id: Some(msg.counterparty_connection_id),
        counterparty_client_id: conn_end.counterparty().client_id().clone(),
    };
    output.emit(IbcEvent::OpenAckConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: msg.connection_id,
        connection_id_state: ConnectionIdState::Reused,
        connection_end: conn_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
    use crate::core::ics03_connection::error::{Error, ErrorDetail};
    use crate::core::ics03_connection::handler::{dispatch, ConnectionResult};
    use crate::core::ics03_connection::msgs::conn_open_ack::MsgConnectionOpenAck;
    use crate::core::ics03_connection::msgs::ConnectionMsg;
    use crate::core::ics03_connection::version::{get_compatible_versions, pick_version, Version};
    use crate::core::ics23_commitment::commitment::CommitmentPrefix;
    use crate::core::ics24_host::identifier::{ClientId, ConnectionId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::{get_dummy_secret_key, get_dummy_solomachine_proofs};

    #[test]
    fn conn_open_ack_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: ConnectionMsg,
            expected_error: Option<fn(&ErrorDetail) -> bool>,
        }

        let sequence = 5;
        let sk = get_dummy_secret_key(9);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let counterparty_client_id = ClientId::new(ClientType::Tendermint, 2).unwrap();
        let conn_id = ConnectionId::new(0);
        let counterparty_conn_id = ConnectionId::new(11);
        let prefix = CommitmentPrefix::default();

        let init_end = ConnectionEnd::new(
            State::Init,
            client_id.clone(),
            Counterparty::new(counterparty_client_id.clone(), None, prefix.clone()),
            get_compatible_versions(),
            Duration::ZERO,
        );

        // The TRYOPEN end the counterparty committed.
        let counterparty_try_end = ConnectionEnd::new(
            State::TryOpen,
            counterparty_client_id,
            Counterparty::new(client_id.clone(), Some(conn_id.clone()), prefix.clone()),
            vec![Version::default()],
            Duration::ZERO,
        );

        let proofs = get_dummy_solomachine_proofs(
            &sk,
            sequence,
            &prefix,
            &Path::Connections(counterparty_conn_id.clone()),
            counterparty_try_end.encode_vec(),
        );

        let msg = MsgConnectionOpenAck {
            connection_id: conn_id.clone(),
            counterparty_connection_id: counterparty_conn_id,
            proofs,
            version: Version::default(),
        };

        let base_ctx = MockContext::default().with_solomachine_client(&client_id, &sk, sequence);

        let mut open_end = init_end.clone();
        open_end.set_state(State::Open);

        let mut msg_other_counterparty = msg.clone();
        msg_other_counterparty.counterparty_connection_id = ConnectionId::new(12);

        let mut msg_unknown_version = msg.clone();
        msg_unknown_version.version =
            Version::new("9".to_string(), vec!["ORDER_ORDERED".to_string()]).unwrap();

        let tests: Vec<Test> = vec![
            Test {
                name: "Successful processing of an Ack message".to_string(),
                ctx: base_ctx.clone().with_connection(conn_id.clone(), init_end.clone()),
                msg: ConnectionMsg::ConnectionOpenAck(Box::new(msg.clone())),
                expected_error: None,
            },
            Test {
                name: "Processing fails because the connection does not exist in the context"
                    .to_string(),
                ctx: base_ctx.clone(),
                msg: ConnectionMsg::ConnectionOpenAck(Box::new(msg.clone())),
                expected_error: Some(|e| matches!(e, ErrorDetail::ConnectionNotFound(_))),
            },
            Test {
                name: "Processing fails due to connections mismatch (beyond Init/TryOpen)"
                    .to_string(),
                ctx: base_ctx.clone().with_connection(conn_id.clone(), open_end),
                msg: ConnectionMsg::ConnectionOpenAck(Box::new(msg.clone())),
                expected_error: Some(|e| matches!(e, ErrorDetail::InvalidConnectionState(_))),
            },
            Test {
                name: "Processing fails because the version was never proposed".to_string(),
                ctx: base_ctx.clone().with_connection(conn_id.clone(), init_end.clone()),
                msg: ConnectionMsg::ConnectionOpenAck(Box::new(msg_unknown_version)),
                expected_error: Some(|e| matches!(e, ErrorDetail::VersionNotSupported(_))),
            },
            Test {
                name: "Processing fails because the proof is for another connection".to_string(),
                ctx: base_ctx.with_connection(conn_id, init_end),
                msg: ConnectionMsg::ConnectionOpenAck(Box::new(msg_other_counterparty)),
                expected_error: Some(|e| matches!(e, ErrorDetail::Ics02Client(_))),
            },
        ];

        for test in tests {
            let res = dispatch(&test.ctx, test.msg.clone());
            // Additionally check the events and the output objects in the result.
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.expected_error.is_none(),
                        "conn_open_ack: test passed but was supposed to fail for test: {}",
                        test.name,
                    );

                    assert!(!proto_output.events.is_empty()); // Some events must exist.

                    // The object in the output is a ConnectionEnd, should have Open state.
                    let res: ConnectionResult = proto_output.result;
                    assert_eq!(res.connection_end.state().clone(), State::Open);
                    assert_eq!(res.connection_end.versions(), [Version::default()]);

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenAckConnection(_)));
                    }
                }
                Err(Error(detail, _)) => {
                    let check = test.expected_error.unwrap_or_else(|| {
                        panic!("conn_open_ack: did not pass test: {}: {:?}", test.name, detail)
                    });
                    assert!(check(&detail), "{}: unexpected error {:?}", test.name, detail);
                }
            }
        }
    }

    #[test]
    fn ack_accepts_a_version_narrowed_by_the_counterparty() {
        let sequence = 5;
        let sk = get_dummy_secret_key(9);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let counterparty_client_id = ClientId::new(ClientType::Tendermint, 2).unwrap();
        let conn_id = ConnectionId::new(0);
        let counterparty_conn_id = ConnectionId::new(11);
        let prefix = CommitmentPrefix::default();

        // The counterparty only supports ordered channels.
        let ordered_only =
            Version::new("1".to_string(), vec!["ORDER_ORDERED".to_string()]).unwrap();
        let picked = pick_version(&[ordered_only], &get_compatible_versions()).unwrap();

        let init_end = ConnectionEnd::new(
            State::Init,
            client_id.clone(),
            Counterparty::new(counterparty_client_id.clone(), None, prefix.clone()),
            get_compatible_versions(),
            Duration::ZERO,
        );
        let counterparty_try_end = ConnectionEnd::new(
            State::TryOpen,
            counterparty_client_id,
            Counterparty::new(client_id.clone(), Some(conn_id.clone()), prefix.clone()),
            vec![picked.clone()],
            Duration::ZERO,
        );
        let proofs = get_dummy_solomachine_proofs(
            &sk,
            sequence,
            &prefix,
            &Path::Connections(counterparty_conn_id.clone()),
            counterparty_try_end.encode_vec(),
        );

        let ctx = MockContext::default()
            .with_solomachine_client(&client_id, &sk, sequence)
            .with_connection(conn_id.clone(), init_end);
        let msg = MsgConnectionOpenAck {
            connection_id: conn_id,
            counterparty_connection_id: counterparty_conn_id,
            proofs,
            version: picked.clone(),
        };

        let res = dispatch(&ctx, ConnectionMsg::ConnectionOpenAck(Box::new(msg))).unwrap();
        assert_eq!(res.result.connection_end.state(), &State::Open);
        assert_eq!(res.result.connection_end.versions(), [picked]);
    }

    #[test]
    fn ack_waits_for_the_delay_period() {
        let sequence = 5;
        let sk = get_dummy_secret_key(9);
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let counterparty_client_id = ClientId::new(ClientType::Tendermint, 2).unwrap();
        let conn_id = ConnectionId::new(0);
        let counterparty_conn_id = ConnectionId::new(11);
        let prefix = CommitmentPrefix::default();
        let delay = Duration::from_secs(3600);

        let init_end = ConnectionEnd::new(
            State::Init,
            client_id.clone(),
            Counterparty::new(counterparty_client_id.clone(), None, prefix.clone()),
            get_compatible_versions(),
            delay,
        );
        let counterparty_try_end = ConnectionEnd::new(
            State::TryOpen,
            counterparty_client_id,
            Counterparty::new(client_id.clone(), Some(conn_id.clone()), prefix.clone()),
            vec![Version::default()],
            delay,
        );
        let msg = MsgConnectionOpenAck {
            connection_id: conn_id.clone(),
            counterparty_connection_id: counterparty_conn_id.clone(),
            proofs: get_dummy_solomachine_proofs(
                &sk,
                sequence,
                &prefix,
                &Path::Connections(counterparty_conn_id),
                counterparty_try_end.encode_vec(),
            ),
            version: Version::default(),
        };
        let msg = ConnectionMsg::ConnectionOpenAck(Box::new(msg));

        let mut ctx = MockContext::default()
            .with_solomachine_client(&client_id, &sk, sequence)
            .with_connection(conn_id, init_end);

        let res = dispatch(&ctx, msg.clone());
        assert!(matches!(
            res,
            Err(Error(ErrorDetail::NotEnoughTimeElapsed(_), _))
        ));

        // An hour of 3s blocks.
        for _ in 0..1200 {
            ctx.advance_host_chain_height();
        }
        let res = dispatch(&ctx, msg).unwrap();
        assert_eq!(res.result.connection_end.state(), &State::Open);
    }
}
