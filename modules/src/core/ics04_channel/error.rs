use core::num::ParseIntError;

use flex_error::define_error;

use crate::core::ics02_client::error as client_error;
use crate::core::ics03_connection::error as connection_error;
use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics05_port::error as port_error;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics26_routing::context::ModuleId;
use crate::timestamp::Timestamp;
use crate::Height;

define_error! {
    #[derive(Debug)]
    Error {
        Ics02Client
            [ client_error::Error ]
            | _ | { "ics02 client error" },

        Ics03Connection
            [ connection_error::Error ]
            | _ | { "ics03 connection error" },

        Ics05Port
            [ port_error::Error ]
            | _ | { "ics05 port error" },

        UnknownOrderType
            { type_id: String }
            | e | { format_args!("channel order type unknown: {}", e.type_id) },

        InvalidStringAsSequence
            { value: String }
            [ flex_error::TraceError<ParseIntError> ]
            | e | { format_args!("string {0} cannot be converted to packet sequence", e.value) },

        ChannelNotFound
            { port_id: PortId, channel_id: ChannelId }
            | e | { format_args!("channel {0} on port {1} not found", e.channel_id, e.port_id) },

        InvalidChannelState
            { channel_id: ChannelId, state: State }
            | e | { format_args!("channel {0} is in an unexpected state: {1}", e.channel_id, e.state) },

        ChannelClosed
            { channel_id: ChannelId }
            | e | { format_args!("the channel end ({0}) is already closed", e.channel_id) },

        ConnectionNotOpen
            { connection_id: ConnectionId }
            | e | { format_args!("the connection {0} is not open", e.connection_id) },

        InvalidConnectionHopsLength
            { expected: usize, actual: usize }
            | e | {
                format_args!("expected {0} connection hop(s), found {1}", e.expected, e.actual)
            },

        VersionNegotiationFailed
            { connection_id: ConnectionId }
            | e | {
                format_args!("the version of connection {0} does not support the channel ordering",
                    e.connection_id)
            },

        ChannelCapabilityNotFound
            [ port_error::Error ]
            | _ | { "the channel capability was not found or does not match" },

        FrozenClient
            { client_id: ClientId }
            | e | { format_args!("client {0} is frozen", e.client_id) },

        MissingCounterpartyChannelId
            | _ | { "the counterparty channel id is not set" },

        ChannelMismatch
            { channel_id: ChannelId }
            | e | { format_args!("channel {0} does not match the parameters of the message", e.channel_id) },

        MissingTimeout
            | _ | { "a packet must carry a timeout height or a timeout timestamp" },

        ZeroPacketSequence
            | _ | { "packet sequence cannot be 0" },

        InvalidPacketCounterparty
            { port_id: PortId, channel_id: ChannelId }
            | e | {
                format_args!("packet destination {0}/{1} is not the channel's counterparty",
                    e.port_id, e.channel_id)
            },

        TimeoutElapsed
            {
                sequence: Sequence,
                latest_height: Height,
                latest_timestamp: Timestamp,
            }
            | e | {
                format_args!("packet {0} is already timed out on the counterparty (latest height {1}, timestamp {2})",
                    e.sequence, e.latest_height, e.latest_timestamp)
            },

        PacketTimeout
            {
                sequence: Sequence,
                host_height: Height,
                host_timestamp: Timestamp,
            }
            | e | {
                format_args!("packet {0} timed out at host height {1}, timestamp {2}",
                    e.sequence, e.host_height, e.host_timestamp)
            },

        PacketTimeoutNotReached
            {
                timeout_height: TimeoutHeight,
                proof_height: Height,
                timeout_timestamp: Timestamp,
                proof_timestamp: Timestamp,
            }
            | e | {
                format_args!("packet timeout not reached: timeout height {0} vs proof height {1}, timeout timestamp {2} vs proof timestamp {3}",
                    e.timeout_height, e.proof_height, e.timeout_timestamp, e.proof_timestamp)
            },

        PacketSequenceOutOfOrder
            { given: Sequence, expected: Sequence }
            | e | { format_args!("packet sequence {0} is out of order, expected {1}", e.given, e.expected) },

        PacketAlreadyReceived
            { sequence: Sequence }
            | e | { format_args!("packet {0} has already been received", e.sequence) },

        PacketCommitmentNotFound
            { sequence: Sequence }
            | e | { format_args!("packet commitment for sequence {0} not found", e.sequence) },

        IncorrectPacketCommitment
            { sequence: Sequence }
            | e | { format_args!("the stored commitment does not match packet {0}", e.sequence) },

        PacketAcknowledgementExists
            { sequence: Sequence }
            | e | { format_args!("an acknowledgement for packet {0} was already written", e.sequence) },

        InvalidAcknowledgement
            | _ | { "acknowledgements cannot be empty" },

        MissingNextSendSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | { format_args!("missing next send sequence for {0}/{1}", e.port_id, e.channel_id) },

        MissingNextRecvSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | { format_args!("missing next recv sequence for {0}/{1}", e.port_id, e.channel_id) },

        MissingNextAckSeq
            { port_id: PortId, channel_id: ChannelId }
            | e | { format_args!("missing next ack sequence for {0}/{1}", e.port_id, e.channel_id) },

        ChannelVerificationFailed
            { channel_id: ChannelId }
            [ client_error::Error ]
            | e | { format_args!("verification of the counterparty end of channel {0} failed", e.channel_id) },

        PacketVerificationFailed
            { sequence: Sequence }
            [ client_error::Error ]
            | e | { format_args!("verification of the proof for packet {0} failed", e.sequence) },

        InvalidVersionLengthConnection
            { connection_id: ConnectionId }
            | e | {
                format_args!("connection {0} must have exactly one negotiated version",
                    e.connection_id)
            },

        RouteNotFound
            { module_id: ModuleId }
            | e | { format_args!("no route to module {0}", e.module_id) },

        AppModule
            { description: String }
            | e | { format_args!("application module error: {0}", e.description) },
    }
}

impl Error {
    /// Whether the error was raised because a proof did not verify.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self.detail(),
            ErrorDetail::ChannelVerificationFailed(_) | ErrorDetail::PacketVerificationFailed(_)
        )
    }
}
