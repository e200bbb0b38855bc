//! Protocol logic specific to processing ICS2 messages of type `MsgUpdateClient`.

use tracing::{debug, info, warn};

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::consensus_state::{AnyConsensusState, ConsensusState};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::Attributes;
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::header::Header;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

/// The result following the successful processing of a `MsgUpdateClient` message. Preferably
/// this data type should be used with a qualified name `update_client::Result` to avoid ambiguity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    /// `None` when the header revealed misbehaviour and froze the client.
    pub consensus_state: Option<AnyConsensusState>,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgUpdateClient,
) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgUpdateClient { client_id, header } = msg;

    // Read client type from the host chain store. The client should already exist.
    let client_type = ctx.client_type(&client_id)?;

    let client_def = AnyClient::from_client_type(client_type);

    // Read client state from the host chain store.
    let client_state = ctx.client_state(&client_id)?;

    if client_state.is_frozen() {
        return Err(Error::client_frozen(client_id));
    }

    // Read consensus state from the host chain store.
    let latest_consensus_state = ctx
        .consensus_state(&client_id, client_state.latest_height())
        .map_err(|_| {
            Error::consensus_state_not_found(client_id.clone(), client_state.latest_height())
        })?;

    debug!("latest consensus state: {:?}", latest_consensus_state);

    let now = ctx.host_timestamp();
    let elapsed = now
        .duration_since(&latest_consensus_state.timestamp())
        .unwrap_or_default();

    if client_state.expired(elapsed) {
        return Err(Error::expired_client(
            client_id,
            latest_consensus_state.timestamp(),
            elapsed,
        ));
    }

    client_def.verify_header(ctx, &client_id, &client_state, &header)?;

    let event_attributes = Attributes {
        client_id: client_id.clone(),
        height: ctx.host_height(),
        client_type,
        consensus_height: header.height(),
    };

    let found_misbehaviour =
        client_def.check_for_misbehaviour_on_header(ctx, &client_id, &client_state, &header)?;

    if found_misbehaviour {
        warn!(
            "header at {} for client {} reveals misbehaviour, freezing",
            header.height(),
            client_id
        );
        let client_state = client_def.update_state_on_misbehaviour(client_state, header.height())?;
        let result = ClientResult::Update(Result {
            client_id,
            client_state,
            consensus_state: None,
            processed_time: ctx.host_timestamp(),
            processed_height: ctx.host_height(),
        });
        output.emit(IbcEvent::ClientMisbehaviour(event_attributes.into()));
        return Ok(output.with_result(result));
    }

    if header.height() <= client_state.latest_height() {
        return Err(Error::invalid_header(format!(
            "header height {} is not above the client latest height {}",
            header.height(),
            client_state.latest_height()
        )));
    }

    // Use client_state to validate the new header against the latest consensus_state.
    // This function will return the new client_state (its latest_height changed) and a
    // consensus_state obtained from header. These will be later persisted by the keeper.
    let (new_client_state, new_consensus_state) =
        client_def.update_state(ctx, &client_id, client_state, header)?;

    output.log(format!(
        "success: client {} updated to height {}",
        client_id,
        new_client_state.latest_height()
    ));
    info!(
        "updated client {} to height {}",
        client_id,
        new_client_state.latest_height()
    );

    let result = ClientResult::Update(Result {
        client_id,
        client_state: new_client_state,
        consensus_state: Some(new_consensus_state),
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    });

    output.emit(IbcEvent::UpdateClient(event_attributes.into()));

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::clients::crypto::PublicKey;
    use crate::clients::ics06_solomachine::header::Header as SmHeader;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::core::ics02_client::handler::{dispatch, ClientResult};
    use crate::core::ics02_client::header::AnyHeader;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::core::ics23_commitment::commitment::CommitmentRoot;
    use crate::core::ics24_host::identifier::ChainId;
    use crate::handler::HandlerOutput;
    use crate::mock::context::MockContext;
    use crate::mock::host::{validator_keys, HostBlock};
    use crate::test_utils::{get_dummy_secret_key, DUMMY_DIVERSIFIER, DUMMY_SOLOMACHINE_TIME_NANOS};

    fn rotation_header(sequence: u64) -> AnyHeader {
        SmHeader::new_signed(
            &get_dummy_secret_key(1),
            sequence,
            Timestamp::from_nanoseconds(DUMMY_SOLOMACHINE_TIME_NANOS + 100).unwrap(),
            DUMMY_DIVERSIFIER,
            PublicKey::from_secret_key(&get_dummy_secret_key(2)),
            "rotated".to_string(),
        )
        .into()
    }

    #[test]
    fn test_update_client_ok() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let ctx =
            MockContext::default().with_solomachine_client(&client_id, &get_dummy_secret_key(1), 3);

        let msg = MsgUpdateClient::new(client_id.clone(), rotation_header(3));
        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg));

        match output {
            Ok(HandlerOutput {
                result,
                events,
                log,
            }) => {
                assert_eq!(events.len(), 1);
                assert!(matches!(
                    &events[0],
                    IbcEvent::UpdateClient(e) if e.client_id() == &client_id
                ));
                assert!(!log.is_empty());
                match result {
                    ClientResult::Update(upd_res) => {
                        assert_eq!(upd_res.client_id, client_id);
                        assert_eq!(upd_res.client_state.latest_height(), Height::new(0, 4));
                        assert!(upd_res.consensus_state.is_some());
                        assert_eq!(upd_res.processed_height, ctx.host_height());
                    }
                    _ => panic!("update handler result has incorrect type"),
                }
            }
            Err(err) => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn test_update_nonexisting_client() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        let ctx = MockContext::default();

        let msg = MsgUpdateClient::new(client_id, rotation_header(3));
        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg));

        assert!(matches!(
            output,
            Err(Error(ErrorDetail::ClientNotFound(_), _))
        ));
    }

    #[test]
    fn test_update_with_badly_signed_header() {
        let client_id = ClientId::new(ClientType::Solomachine, 0).unwrap();
        // The client expects signatures by another key.
        let ctx =
            MockContext::default().with_solomachine_client(&client_id, &get_dummy_secret_key(5), 3);

        let msg = MsgUpdateClient::new(client_id, rotation_header(3));
        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg));

        assert!(matches!(
            output,
            Err(Error(ErrorDetail::InvalidHeader(_), _))
        ));
    }

    #[test]
    fn conflicting_header_freezes_the_client() {
        let client_id = ClientId::new(ClientType::Tendermint, 0).unwrap();
        let mut ctx_b =
            MockContext::new(ChainId::new("mockgaiaB".to_string(), 1), Height::new(1, 10));
        let chain_a = ChainId::new("mockgaiaA".to_string(), 1);
        let mut ctx_a = MockContext::new(chain_a, Height::new(1, 12))
            .with_client_for(&client_id, &ctx_b);
        ctx_b.advance_host_chain_height();

        let trusted_height = Height::new(1, 10);
        let honest = ctx_b.latest_block().cloned().unwrap();
        let validator_set = honest.validator_set.clone();
        let fork = HostBlock::generate(
            ctx_b.host_chain_id(),
            11,
            honest.timestamp(),
            CommitmentRoot::from_bytes(b"fork"),
            &validator_keys(ctx_b.host_chain_id(), 4),
        );

        let honest =
            AnyHeader::Tendermint(honest.into_header(trusted_height, validator_set.clone()));
        let msg = MsgUpdateClient::new(client_id.clone(), honest);
        ctx_a.deliver(ClientMsg::UpdateClient(msg).into()).unwrap();

        // A second, different block at the same height.
        let fork = AnyHeader::Tendermint(fork.into_header(trusted_height, validator_set));
        let output = dispatch(
            &ctx_a,
            ClientMsg::UpdateClient(MsgUpdateClient::new(client_id.clone(), fork)),
        )
        .unwrap();

        assert!(matches!(output.events[0], IbcEvent::ClientMisbehaviour(_)));
        match output.result {
            ClientResult::Update(upd_res) => {
                assert!(upd_res.client_state.is_frozen());
                assert_eq!(upd_res.client_state.frozen_height(), Some(Height::new(1, 11)));
                assert!(upd_res.consensus_state.is_none());
            }
            _ => panic!("update handler result has incorrect type"),
        }
    }
}
