//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenTry`.

use tracing::{debug, info};

use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::verify::verify_connection_proof;
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_try::MsgConnectionOpenTry;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenTry,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // The counterparty must have named its INIT end.
    let counterparty_connection_id = msg
        .counterparty
        .connection_id()
        .cloned()
        .ok_or_else(Error::missing_counterparty_connection_id)?;

    // The local client must exist.
    ctx.client_state(&msg.client_id).map_err(Error::ics02_client)?;

    // Unwrap the old connection end (if any) and its identifier.
    let (mut new_connection_end, conn_id, conn_id_state) = match &msg.previous_connection_id {
        // A connection with this id should already exist. Search & validate.
        Some(prev_id) => {
            let old_connection_end = ctx.connection_end(prev_id)?;

            // Validate that existing connection end matches with the one we're trying to establish.
            let counterparty_matches = old_connection_end.counterparty().client_id()
                == msg.counterparty.client_id()
                && old_connection_end.counterparty().prefix() == msg.counterparty.prefix()
                && old_connection_end
                    .counterparty()
                    .connection_id()
                    .map_or(true, |id| id == &counterparty_connection_id);

            if !(old_connection_end.state_matches(&State::Init)
                && old_connection_end.client_id_matches(&msg.client_id)
                && counterparty_matches
                && old_connection_end.delay_period() == msg.delay_period)
            {
                return Err(Error::connection_mismatch(prev_id.clone()));
            }

            // A previous connection end was validated; continue with it.
            output.log("success: validated previous connection");
            (old_connection_end, prev_id.clone(), ConnectionIdState::Reused)
        }
        // No previous connection id was supplied, create a new connection end.
        None => {
            let conn_id = ConnectionId::new(ctx.connection_counter()?);
            output.log(format!(
                "success: new connection end initialized with id {}",
                conn_id
            ));
            let connection_end = ConnectionEnd::new(
                State::Init,
                msg.client_id.clone(),
                msg.counterparty.clone(),
                ctx.get_compatible_versions(),
                msg.delay_period,
            );
            (connection_end, conn_id, ConnectionIdState::Generated)
        }
    };

    // The proof is checked against a connection end that names the
    // counterparty's INIT connection.
    new_connection_end.set_counterparty(msg.counterparty.clone());

    // Proof verification in two steps:
    // 1. Setup: build the ConnectionEnd as we expect to find it on the other party.
    let expected_conn = ConnectionEnd::new(
        State::Init,
        msg.counterparty.client_id().clone(),
        Counterparty::new(msg.client_id.clone(), None, ctx.commitment_prefix()),
        msg.counterparty_versions.clone(),
        msg.delay_period,
    );

    // 2. Pass the details to the verification function.
    verify_connection_proof(ctx, &new_connection_end, &expected_conn, &msg.proofs)?;
    debug!("verified the counterparty INIT end {}", counterparty_connection_id);

    // Transition the connection end to the new state & pick a version.
    new_connection_end.set_state(State::TryOpen);

    // Pick the version.
    let version = ctx.pick_version(new_connection_end.versions(), &msg.counterparty_versions)?;
    new_connection_end.set_version(version);

    info!("connection {} moved to TRYOPEN", conn_id);
    output.log("success: connection verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(conn_id.clone()),
        client_id: msg.client_id,
        counterparty_connection_id: Some(counterparty_connection_id),
        counterparty_client_id: msg.counterparty.client_id().clone(),
    };
    output.emit(IbcEvent::OpenTryConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: conn_id,
        connection_id_state: conn_id_state,
        connection_end: new_connection_end,
    };

    Ok(output.with_result(result))
}
