//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenConfirm`.

use tracing::info;

use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::verify::verify_connection_proof;
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_confirm::MsgConnectionOpenConfirm;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenConfirm,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // Validate the connection end.
    let mut conn_end = ctx.connection_end(&msg.connection_id)?;
    // A connection end must be in TryOpen state; otherwise return error.
    if !conn_end.state_matches(&State::TryOpen) {
        // Old connection end is in incorrect state, propagate the error.
        return Err(Error::invalid_connection_state(
            msg.connection_id,
            *conn_end.state(),
        ));
    }

    // Verify proofs. Assemble the connection end as we expect to find it on the counterparty.
    let expected_conn = ConnectionEnd::new(
        State::Open,
        conn_end.counterparty().client_id().clone(),
        Counterparty::new(
            // The counterparty is the local chain.
            conn_end.client_id().clone(), // The local client identifier.
            Some(msg.connection_id.clone()), // Local connection id.
            ctx.commitment_prefix(), // Local commitment prefix.
        ),
        conn_end.versions().to_vec(),
        conn_end.delay_period(),
    );

    // 2. Pass the details to the verification function.
    verify_connection_proof(ctx, &conn_end, &expected_conn, &msg.proofs)?;

    // Transition our own end of the connection to state OPEN.
    conn_end.set_state(State::Open);

    info!("connection {} is OPEN", msg.connection_id);
    output.log("success: connection verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(msg.connection_id.clone()),
        client_id: conn_end.client_id().clone(),
        counterparty_connection_id: conn_end.counterparty().connection_id().cloned(),
        counterparty_client_id: conn_end.counterparty().client_id().clone(),
    };
    output.emit(IbcEvent::OpenConfirmConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: msg.connection_id,
        connection_id_state: ConnectionIdState::Reused,
        connection_end: conn_end,
    };

    Ok(output.with_result(result))
}
