//! Definition of domain type message `MsgUpdateClient`.

use crate::core::ics02_client::header::AnyHeader;
use crate::core::ics24_host::identifier::ClientId;

/// A type of message that triggers the update of an on-chain (IBC) client with new headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUpdateClient {
    pub client_id: ClientId,
    pub header: AnyHeader,
}

impl MsgUpdateClient {
    pub fn new(client_id: ClientId, header: AnyHeader) -> Self {
        MsgUpdateClient { client_id, header }
    }
}
