//! Protocol logic specific to ICS3 messages of type `MsgConnectionOpenInit`.

use tracing::info;

use crate::core::ics03_connection::connection::{ConnectionEnd, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_init::MsgConnectionOpenInit;
use crate::core::ics03_connection::version::is_supported_version;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenInit,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // An IBC client running on the local (host) chain should exist.
    ctx.client_state(&msg.client_id).map_err(Error::ics02_client)?;

    let versions = match msg.version {
        Some(version) => {
            if !is_supported_version(&ctx.get_compatible_versions(), &version) {
                return Err(Error::version_not_supported(version));
            }
            vec![version]
        }
        None => ctx.get_compatible_versions(),
    };

    let new_connection_end = ConnectionEnd::new(
        State::Init,
        msg.client_id.clone(),
        msg.counterparty.clone(),
        versions,
        msg.delay_period,
    );

    // Construct the identifier for the new connection.
    let id_counter = ctx.connection_counter()?;
    let conn_id = ConnectionId::new(id_counter);

    info!("connection {} initialized on client {}", conn_id, msg.client_id);
    output.log(format!(
        "success: generated new connection identifier: {}",
        conn_id
    ));

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(conn_id.clone()),
        client_id: msg.client_id,
        counterparty_connection_id: None,
        counterparty_client_id: msg.counterparty.client_id().clone(),
    };
    output.emit(IbcEvent::OpenInitConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: conn_id,
        connection_id_state: ConnectionIdState::Generated,
        connection_end: new_connection_end,
    };

    Ok(output.with_result(result))
}
