//! Governance-driven replacement of a client's trust material.

use tracing::info;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::consensus_state::AnyConsensusState;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::{Attributes, SubstituteClient};
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::substitute_client::MsgSubstituteClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgSubstituteClient,
) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgSubstituteClient {
        subject_client_id,
        substitute_client_id,
    } = msg;

    let subject_type = ctx.client_type(&subject_client_id)?;
    let subject = ctx.client_state(&subject_client_id)?;
    let substitute = ctx.client_state(&substitute_client_id)?;

    // The subject's consent is checked before the substitute's type.

    let (client_state, consensus_state) = AnyClient::from_client_type(subject_type)
        .check_substitute_and_update_state(
            ctx,
            &subject_client_id,
            subject,
            &substitute_client_id,
            substitute,
        )?;

    info!(
        "client {} substituted by {} at height {}",
        subject_client_id,
        substitute_client_id,
        client_state.latest_height()
    );
    output.log(format!(
        "success: client {} now follows {}",
        subject_client_id, substitute_client_id
    ));

    output.emit(IbcEvent::SubstituteClient(SubstituteClient {
        common: Attributes {
            height: ctx.host_height(),
            client_id: subject_client_id.clone(),
            client_type: subject_type,
            consensus_height: client_state.latest_height(),
        },
        substitute_client_id,
    }));

    Ok(output.with_result(ClientResult::Substitute(Result {
        client_id: subject_client_id,
        client_state,
        consensus_state,
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    })))
}
