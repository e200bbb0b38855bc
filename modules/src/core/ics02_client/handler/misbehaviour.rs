//! Protocol logic specific to processing ICS2 messages of type `MsgSubmitMisbehaviour`.

use tracing::warn;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::Attributes;
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::misbehaviour::Misbehaviour;
use crate::core::ics02_client::msgs::misbehaviour::MsgSubmitMisbehaviour;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

/// The result following the successful processing of a `MsgSubmitMisbehaviour` message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
}

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgSubmitMisbehaviour,
) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgSubmitMisbehaviour {
        client_id,
        misbehaviour,
    } = msg;

    // Read client type from the host chain store. The client should already exist.
    let client_type = ctx.client_type(&client_id)?;
    if misbehaviour.client_type() != client_type {
        return Err(Error::invalid_client_type(
            client_type,
            misbehaviour.client_type(),
        ));
    }

    let client_def = AnyClient::from_client_type(client_type);

    let client_state = ctx.client_state(&client_id)?;

    if client_state.is_frozen() {
        return Err(Error::client_frozen(client_id));
    }

    client_def.verify_misbehaviour(ctx, &client_id, &client_state, &misbehaviour)?;

    if !client_def.check_for_misbehaviour(ctx, &client_id, &client_state, &misbehaviour)? {
        return Err(Error::invalid_misbehaviour(format!(
            "evidence against client {} does not show misbehaviour",
            client_id
        )));
    }

    let client_state =
        client_def.update_state_on_misbehaviour(client_state, misbehaviour.height())?;

    warn!(
        "client {} frozen at {} on submitted evidence",
        client_id,
        misbehaviour.height()
    );
    output.log("success: client frozen");

    let event_attributes = Attributes {
        client_id: client_id.clone(),
        height: ctx.host_height(),
        client_type,
        consensus_height: client_state.latest_height(),
    };
    output.emit(IbcEvent::ClientMisbehaviour(event_attributes.into()));

    Ok(output.with_result(ClientResult::Misbehaviour(Result {
        client_id,
        client_state,
    })))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::core::ics02_client::handler::{dispatch, ClientResult};
    use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::mock::context::MockContext;
    use crate::clients::ics06_solomachine::misbehaviour::{
        Misbehaviour as SmMisbehaviour, SignatureAndData,
    };
    use crate::clients::ics06_solomachine::proof::TimestampedSignatureData;
    use crate::core::ics23_commitment::commitment::CommitmentPrefix;
    use crate::core::ics23_commitment::merkle::apply_prefix;
    use crate::core::ics24_host::identifier::ConnectionId;
    use crate::core::ics24_host::path::Path;
    use crate::test_utils::{
        get_dummy_secret_key, get_dummy_solomachine_misbehaviour, get_dummy_solomachine_proofs,
    };
    use crate::timestamp::Timestamp;
    use crate::Height;

    fn submit(client_id: &ClientId, sequence: u64) -> ClientMsg {
        let sk = get_dummy_secret_key(1);
        let misbehaviour = get_dummy_solomachine_misbehaviour(&sk, client_id.clone(), sequence);
        ClientMsg::Misbehaviour(MsgSubmitMisbehaviour {
            client_id: client_id.clone(),
            misbehaviour: misbehaviour.into(),
        })
    }

    #[test]
    fn test_misbehaviour_freezes_client() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let ctx =
            MockContext::default().with_solomachine_client(&client_id, &get_dummy_secret_key(1), 3);

        let output = dispatch(&ctx, submit(&client_id, 3)).unwrap();

        assert!(matches!(
            &output.events[..],
            [IbcEvent::ClientMisbehaviour(e)] if e.client_id() == &client_id
        ));
        match output.result {
            ClientResult::Misbehaviour(res) => {
                assert_eq!(res.client_id, client_id);
                assert_eq!(res.client_state.frozen_height(), Some(Height::new(0, 3)));
            }
            _ => panic!("misbehaviour handler result has incorrect type"),
        }
    }

    #[test]
    fn test_misbehaviour_of_another_client_type() {
        let client_id = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let ctx = MockContext::default().with_tendermint_client(&client_id, Height::new(1, 2));

        let output = dispatch(&ctx, submit(&client_id, 3));
        assert!(matches!(
            output,
            Err(Error(ErrorDetail::InvalidClientType(_), _))
        ));
    }

    #[test]
    fn frozen_client_refuses_further_updates() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let mut ctx =
            MockContext::default().with_solomachine_client(&client_id, &get_dummy_secret_key(1), 3);

        ctx.deliver(submit(&client_id, 3).into()).unwrap();
        assert!(ctx.client_state(&client_id).unwrap().is_frozen());

        let again = dispatch(&ctx, submit(&client_id, 3));
        assert!(matches!(again, Err(Error(ErrorDetail::ClientFrozen(_), _))));

        let header = crate::clients::ics06_solomachine::header::Header::new_signed(
            &get_dummy_secret_key(1),
            3,
            ctx.host_timestamp(),
            crate::test_utils::DUMMY_DIVERSIFIER,
            crate::clients::crypto::PublicKey::from_secret_key(&get_dummy_secret_key(1)),
            String::new(),
        );
        let update = dispatch(
            &ctx,
            ClientMsg::UpdateClient(MsgUpdateClient::new(client_id, header.into())),
        );
        assert!(matches!(update, Err(Error(ErrorDetail::ClientFrozen(_), _))));
    }

    #[test]
    fn honest_proofs_at_one_sequence_are_no_evidence() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let sk = get_dummy_secret_key(1);
        let mut ctx = MockContext::default().with_solomachine_client(&client_id, &sk, 3);

        // Two proofs the machine would hand out during a handshake: same
        // sequence, different paths.
        let prefix = CommitmentPrefix::default();
        let statement = |connection: u64| {
            let path = Path::Connections(ConnectionId::new(connection));
            let data = b"open".to_vec();
            let proofs = get_dummy_solomachine_proofs(&sk, 3, &prefix, &path, data.clone());
            let proof = TimestampedSignatureData::decode_proof(proofs.object_proof()).unwrap();
            SignatureAndData {
                signature: proof.signature_data,
                path: apply_prefix(&prefix, path.to_string()).key(),
                data,
                timestamp: Timestamp::from_nanoseconds(proof.timestamp).unwrap(),
            }
        };
        let misbehaviour = SmMisbehaviour {
            client_id: client_id.clone(),
            sequence: 3,
            signature_one: statement(0),
            signature_two: statement(1),
        };
        let msg = ClientMsg::Misbehaviour(MsgSubmitMisbehaviour {
            client_id: client_id.clone(),
            misbehaviour: misbehaviour.into(),
        });

        let res = dispatch(&ctx, msg.clone());
        assert!(matches!(
            res,
            Err(Error(ErrorDetail::InvalidMisbehaviour(_), _))
        ));

        assert!(ctx.deliver(msg.into()).is_err());
        assert!(!ctx.client_state(&client_id).unwrap().is_frozen());

        let res = dispatch(&ctx, submit(&client_id, 3));
        assert!(res.is_ok());
    }
}
