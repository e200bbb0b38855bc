//! ICS3 verification functions, common across all four handlers of ICS3.

use tracing::debug;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::error::Error as ClientError;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics24_host::path::Path;
use crate::proofs::Proofs;
use crate::Height;

/// Verifies the authenticity and semantic correctness of a commitment `proof`. The commitment
/// claims to prove that an object of type connection exists on the source chain (i.e., the chain
/// which created this proof). This object must match the state of `expected_conn`.
pub fn verify_connection_proof<Ctx: ConnectionReader>(
    ctx: &Ctx,
    connection_end: &ConnectionEnd,
    expected_conn: &ConnectionEnd,
    proofs: &Proofs,
) -> Result<(), Error> {
    // Fetch the client state (IBC client on the local/host chain).
    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;

    // The client must not be frozen.
    if client_state.is_frozen() {
        return Err(Error::ics02_client(ClientError::client_frozen(
            client_id.clone(),
        )));
    }

    verify_delay_passed(ctx, proofs.height(), connection_end)?;

    // The connection id on the counterparty chain is the one being proven.
    let counterparty_connection_id = connection_end
        .counterparty()
        .connection_id()
        .ok_or_else(Error::missing_counterparty_connection_id)?;

    debug!(
        "verifying connection {} against {} at {}",
        counterparty_connection_id,
        client_id,
        proofs.height()
    );

    let client_def = AnyClient::from_client_type(client_state.client_type());

    // Verify the proof for the connection state against the expected connection end.
    client_def
        .verify_membership(
            ctx,
            client_id,
            &client_state,
            proofs.height(),
            connection_end.counterparty().prefix(),
            proofs.object_proof(),
            &Path::Connections(counterparty_connection_id.clone()),
            expected_conn.encode_vec(),
        )
        .map_err(Error::ics02_client)
}

/// Checks that enough host time and host blocks have passed since the
/// client was updated to `proof_height` for the connection's delay period to
/// be honoured. Connections without a delay skip the check.
pub fn verify_delay_passed<Ctx: ConnectionReader>(
    ctx: &Ctx,
    proof_height: Height,
    connection_end: &ConnectionEnd,
) -> Result<(), Error> {
    let delay_period_time = connection_end.delay_period();
    if delay_period_time.is_zero() {
        return Ok(());
    }

    // Fetch the current host chain time and height.
    let current_host_time = ctx.host_timestamp();
    let current_host_height = ctx.host_height();

    // Fetch the latest time and height that the counterparty client was updated
    let client_id = connection_end.client_id();
    let last_client_update_time = ctx
        .client_update_time(client_id, proof_height)
        .map_err(Error::ics02_client)?;
    let last_client_update_height = ctx
        .client_update_height(client_id, proof_height)
        .map_err(Error::ics02_client)?;

    // Fetch the connection delay time and height periods.
    let delay_period_height = ctx.block_delay(delay_period_time);

    let earliest_time =
        (last_client_update_time + delay_period_time).map_err(Error::timestamp_overflow)?;
    if !current_host_time.has_reached(&earliest_time) {
        return Err(Error::not_enough_time_elapsed(
            current_host_time,
            earliest_time,
        ));
    }

    let earliest_height = last_client_update_height.add(delay_period_height);
    if current_host_height < earliest_height {
        return Err(Error::not_enough_blocks_elapsed(
            current_host_height,
            earliest_height,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use super::verify_delay_passed;
    use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
    use crate::core::ics03_connection::error::{Error, ErrorDetail};
    use crate::core::ics03_connection::version::get_compatible_versions;
    use crate::core::ics24_host::identifier::ClientId;
    use crate::mock::context::MockContext;
    use crate::Height;

    #[test]
    fn delay_period_is_measured_in_time_and_blocks() {
        let client_id = ClientId::default();
        let client_height = Height::new(1, 10);
        let mut ctx = MockContext::default().with_tendermint_client(&client_id, client_height);

        let conn_end = ConnectionEnd::new(
            State::Open,
            client_id.clone(),
            Counterparty::new(ClientId::default(), None, Default::default()),
            get_compatible_versions(),
            Duration::from_secs(60),
        );

        assert!(matches!(
            verify_delay_passed(&ctx, client_height, &conn_end),
            Err(Error(ErrorDetail::NotEnoughTimeElapsed(_), _))
        ));

        // 60s of 3s blocks.
        for _ in 0..20 {
            ctx.advance_host_chain_height();
        }
        assert!(verify_delay_passed(&ctx, client_height, &conn_end).is_ok());

        // No recorded update for an unknown height.
        assert!(matches!(
            verify_delay_passed(&ctx, Height::new(1, 11), &conn_end),
            Err(Error(ErrorDetail::Ics02Client(_), _))
        ));

        // Without a delay there is nothing to wait for.
        let no_delay = ConnectionEnd::new(
            State::Open,
            client_id,
            Counterparty::default(),
            get_compatible_versions(),
            Duration::ZERO,
        );
        assert!(verify_delay_passed(&ctx, Height::new(1, 11), &no_delay).is_ok());
    }
}
