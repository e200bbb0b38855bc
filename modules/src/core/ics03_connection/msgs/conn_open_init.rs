use core::time::Duration;

use crate::core::ics03_connection::connection::Counterparty;
use crate::core::ics03_connection::version::Version;
use crate::core::ics24_host::identifier::ClientId;

/// Message definition `MsgConnectionOpenInit` (i.e., the `ConnOpenInit` datagram).
///
/// `version` narrows the proposal to a single version; when absent the
/// connection proposes every version the host supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenInit {
    pub client_id: ClientId,
    pub counterparty: Counterparty,
    pub version: Option<Version>,
    pub delay_period: Duration,
}
