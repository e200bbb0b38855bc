use crate::core::ics03_connection::version::Version;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::proofs::Proofs;

/// Message definition `MsgConnectionOpenAck`  (i.e., `ConnOpenAck` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenAck {
    pub connection_id: ConnectionId,
    pub counterparty_connection_id: ConnectionId,
    /// Proof of the counterparty's TRYOPEN connection end.
    pub proofs: Proofs,
    pub version: Version,
}
