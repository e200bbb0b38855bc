use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::version::Version;
use crate::core::ics24_host::identifier::PortId;
use crate::proofs::Proofs;

/// Message definition for the second step in the channel open handshake (`ChanOpenTry` datagram).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenTry {
    pub port_id: PortId,
    /// The end to create locally. Its counterparty names the INIT end.
    pub channel: ChannelEnd,
    /// The version the counterparty proposed in its INIT end.
    pub counterparty_version: Version,
    /// Proof of the counterparty INIT end.
    pub proofs: Proofs,
}
