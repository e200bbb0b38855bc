use core::time::Duration;

use crate::core::ics03_connection::connection::Counterparty;
use crate::core::ics03_connection::version::Version;
use crate::core::ics24_host::identifier::{ClientId, ConnectionId};
use crate::proofs::Proofs;

/// Message definition `MsgConnectionOpenTry` (i.e., `ConnOpenTry` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenTry {
    /// An INIT connection end on this chain to continue, instead of creating a new one.
    pub previous_connection_id: Option<ConnectionId>,
    pub client_id: ClientId,
    /// Must name the counterparty's INIT connection.
    pub counterparty: Counterparty,
    pub counterparty_versions: Vec<Version>,
    /// Proof of the counterparty's INIT connection end.
    pub proofs: Proofs,
    pub delay_period: Duration,
}
