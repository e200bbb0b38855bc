use core::fmt::{Debug, Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::acknowledgement::AckPacketResult;
use crate::core::ics04_channel::handler::recv_packet::RecvPacketResult;
use crate::core::ics04_channel::handler::send_packet::SendPacketResult;
use crate::core::ics04_channel::handler::timeout::TimeoutPacketResult;
use crate::core::ics04_channel::handler::write_acknowledgement::WriteAckPacketResult;
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::timestamp::Timestamp;
use crate::Height;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketResult {
    Send(SendPacketResult),
    Recv(RecvPacketResult),
    WriteAck(WriteAckPacketResult),
    Ack(AckPacketResult),
    Timeout(TimeoutPacketResult),
}

/// Marks a packet received on an unordered channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receipt {
    Ok,
}

impl Receipt {
    /// The value committed under the receipt path.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Receipt::Ok => &[1],
        }
    }
}

/// The sequence number of a packet enforces ordering among packets from the same source.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
pub struct Sequence(u64);

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self::from)
            .map_err(|e| Error::invalid_string_as_sequence(s.to_string(), e))
    }
}

impl Sequence {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn increment(&self) -> Sequence {
        Sequence(self.0 + 1)
    }

    /// Big-endian encoding, as stored under the next-sequence paths.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl From<u64> for Sequence {
    fn from(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl From<Sequence> for u64 {
    fn from(s: Sequence) -> u64 {
        s.0
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Default, Hash, PartialEq, Eq, Serialize)]
pub struct Packet {
    pub sequence: Sequence,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub destination_port: PortId,
    pub destination_channel: ChannelId,
    #[serde(serialize_with = "crate::serializers::ser_hex_upper")]
    pub data: Vec<u8>,
    pub timeout_height: TimeoutHeight,
    pub timeout_timestamp: Timestamp,
}

struct PacketData<'a>(&'a [u8]);

impl<'a> Debug for PacketData<'a> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(formatter, "{:?}", self.0)
    }
}

impl Debug for Packet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
        formatter
            .debug_struct("Packet")
            .field("sequence", &self.sequence)
            .field("source_port", &self.source_port)
            .field("source_channel", &self.source_channel)
            .field("destination_port", &self.destination_port)
            .field("destination_channel", &self.destination_channel)
            .field("data", &PacketData(&self.data))
            .field("timeout_height", &self.timeout_height)
            .field("timeout_timestamp", &self.timeout_timestamp)
            .finish()
    }
}

impl Packet {
    /// A packet must be able to time out one way or another.
    pub fn has_timeout(&self) -> bool {
        self.timeout_height.is_set() || self.timeout_timestamp.is_set()
    }

    /// Checks whether the packet can no longer be received by a destination
    /// chain at `dst_chain_height` with clock `dst_chain_ts`.
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout_height.has_reached(dst_chain_height)
            || dst_chain_ts.has_reached(&self.timeout_timestamp)
    }
}

/// Custom debug output to omit the packet data
impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "seq:{}, path:{}/{}->{}/{}, toh:{}, tos:{}",
            self.sequence,
            self.source_channel,
            self.source_port,
            self.destination_channel,
            self.destination_port,
            self.timeout_height,
            self.timeout_timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use super::*;

    fn packet(timeout_height: TimeoutHeight, timeout_timestamp: Timestamp) -> Packet {
        Packet {
            sequence: 1.into(),
            data: vec![0xAB, 0x01],
            timeout_height,
            timeout_timestamp,
            ..Default::default()
        }
    }

    #[test]
    fn packet_needs_a_timeout() {
        assert!(!packet(TimeoutHeight::Never, Timestamp::none()).has_timeout());
        assert!(packet(TimeoutHeight::At(Height::new(0, 1)), Timestamp::none()).has_timeout());
    }

    #[test]
    fn packet_times_out_on_either_bound() {
        let now = Timestamp::from_nanoseconds(1_000_000_000_000).unwrap();
        let later = (now + Duration::from_secs(5)).unwrap();

        let by_height = packet(TimeoutHeight::At(Height::new(0, 10)), Timestamp::none());
        assert!(!by_height.timed_out(&now, Height::new(0, 9)));
        assert!(by_height.timed_out(&now, Height::new(0, 10)));

        let by_time = packet(TimeoutHeight::Never, later);
        assert!(!by_time.timed_out(&now, Height::new(0, 100)));
        assert!(by_time.timed_out(&later, Height::new(0, 1)));
    }

    #[test]
    fn packet_data_is_hex_in_json() {
        let json = serde_json::to_string(&packet(TimeoutHeight::Never, Timestamp::none()));
        assert!(json.unwrap().contains("\"data\":\"AB01\""));
    }
}
