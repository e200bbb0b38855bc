//! Path-space as listed in ICS-024
//! <https://github.com/cosmos/ibc/tree/main/spec/core/ics-024-host-requirements#path-space>
//!
//! Every value the engine proves to a counterparty lives under one of these
//! paths. Both chains must render them byte-for-byte identically.

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::Height;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Path {
    ClientType(ClientId),
    ClientState(ClientId),
    ClientConsensusState {
        client_id: ClientId,
        height: Height,
    },
    ClientConnections(ClientId),
    Connections(ConnectionId),
    Ports(PortId),
    ChannelEnds(PortId, ChannelId),
    SeqSends(PortId, ChannelId),
    SeqRecvs(PortId, ChannelId),
    SeqAcks(PortId, ChannelId),
    Commitments {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    Acks {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    Receipts {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
}

impl Path {
    /// Paths whose values are committed to the provable store (and can thus
    /// be proven to a counterparty). The rest is host-private bookkeeping.
    pub fn is_provable(&self) -> bool {
        !matches!(
            self,
            Path::ClientType(_) | Path::ClientConnections(_) | Path::Ports(_)
        )
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Path::ClientType(id) => write!(f, "clients/{}/clientType", id),
            Path::ClientState(id) => write!(f, "clients/{}/clientState", id),
            Path::ClientConsensusState { client_id, height } => {
                write!(f, "clients/{}/consensusStates/{}", client_id, height)
            }
            Path::ClientConnections(id) => write!(f, "clients/{}/connections", id),
            Path::Connections(id) => write!(f, "connections/{}", id),
            Path::Ports(id) => write!(f, "ports/{}", id),
            Path::ChannelEnds(port_id, channel_id) => {
                write!(f, "channelEnds/ports/{}/channels/{}", port_id, channel_id)
            }
            Path::SeqSends(port_id, channel_id) => write!(
                f,
                "nextSequenceSend/ports/{}/channels/{}",
                port_id, channel_id
            ),
            Path::SeqRecvs(port_id, channel_id) => write!(
                f,
                "nextSequenceRecv/ports/{}/channels/{}",
                port_id, channel_id
            ),
            Path::SeqAcks(port_id, channel_id) => write!(
                f,
                "nextSequenceAck/ports/{}/channels/{}",
                port_id, channel_id
            ),
            Path::Commitments {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "commitments/ports/{}/channels/{}/sequences/{}",
                port_id, channel_id, sequence
            ),
            Path::Acks {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "acks/ports/{}/channels/{}/sequences/{}",
                port_id, channel_id, sequence
            ),
            Path::Receipts {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "receipts/ports/{}/channels/{}/sequences/{}",
                port_id, channel_id, sequence
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn packet_paths_render_like_the_counterparty_expects() {
        let port_id = PortId::transfer();
        let channel_id = ChannelId::new(0);

        assert_eq!(
            Path::Commitments {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
                sequence: Sequence::from(5),
            }
            .to_string(),
            "commitments/ports/transfer/channels/channel-0/sequences/5"
        );
        assert_eq!(
            Path::SeqRecvs(port_id, channel_id).to_string(),
            "nextSequenceRecv/ports/transfer/channels/channel-0"
        );
        assert_eq!(
            Path::ClientConsensusState {
                client_id: ClientId::default(),
                height: Height::new(1, 10),
            }
            .to_string(),
            "clients/07-tendermint-0/consensusStates/1-10"
        );
        assert!(!Path::Ports(PortId::transfer()).is_provable());
    }
}
