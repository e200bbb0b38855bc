use core::time::Duration;

use flex_error::define_error;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::ClientId;
use crate::timestamp::{Timestamp, TimestampError};
use crate::Height;

define_error! {
    #[derive(Debug)]
    Error {
        UnknownClientType
            { client_type: String }
            | e | { format_args!("unknown client type: {0}", e.client_type) },

        ClientIdentifierConstructor
            { client_type: ClientType, counter: u64 }
            [ ValidationError ]
            | e | {
                format_args!("Client identifier constructor failed for type {0} with counter {1}",
                    e.client_type, e.counter)
            },

        ClientNotFound
            { client_id: ClientId }
            | e | { format_args!("client not found: {0}", e.client_id) },

        ClientFrozen
            { client_id: ClientId }
            | e | { format_args!("client is frozen: {0}", e.client_id) },

        ExpiredClient
            {
                client_id: ClientId,
                latest_time: Timestamp,
                elapsed: Duration,
            }
            | e | {
                format_args!("client {0} expired: trusted consensus state at {1} is {2:?} old",
                    e.client_id, e.latest_time, e.elapsed)
            },

        ConsensusStateNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("consensus state not found at: {0} at height {1}",
                    e.client_id, e.height)
            },

        ProcessedTimeNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("processed time for the client {0} at height {1} not found",
                    e.client_id, e.height)
            },

        ProcessedHeightNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("processed height for the client {0} at height {1} not found",
                    e.client_id, e.height)
            },

        InvalidClientType
            { expected: ClientType, actual: ClientType }
            | e | {
                format_args!("invalid client type: expected {0}, got {1}",
                    e.expected, e.actual)
            },

        ClientArgsTypeMismatch
            { client_type: ClientType }
            | e | {
                format_args!("mismatch between client and arguments types, expected: {0:?}",
                    e.client_type)
            },

        InvalidClientState
            { reason: String }
            | e | { format_args!("invalid client state: {0}", e.reason) },

        InvalidConsensusState
            { reason: String }
            | e | { format_args!("invalid consensus state: {0}", e.reason) },

        InvalidHeader
            { reason: String }
            | e | { format_args!("invalid header: {0}", e.reason) },

        InvalidMisbehaviour
            { reason: String }
            | e | { format_args!("invalid misbehaviour: {0}", e.reason) },

        UpdateClientFailed
            { reason: String }
            | e | { format_args!("update client failed: {0}", e.reason) },

        InvalidProof
            [ Ics23Error ]
            | _ | { "invalid commitment proof" },

        InvalidSignatureProof
            { reason: String }
            | e | { format_args!("invalid signature proof: {0}", e.reason) },

        InsufficientHeight
            {
                latest_height: Height,
                target_height: Height,
            }
            | e | {
                format_args!("the client's latest height {0} is below the proof height {1}",
                    e.latest_height, e.target_height)
            },

        InvalidTrustThreshold
            { numerator: u64, denominator: u64 }
            | e | {
                format_args!("failed to build trust threshold from fraction: {}/{}, it must lie in [1/3, 1]",
                    e.numerator, e.denominator)
            },

        InvalidTrustThresholdFormat
            { value: String }
            | e | { format_args!("trust threshold must be a fraction, got {0}", e.value) },

        InvalidHeightResult
            | _ | { "height cannot end up zero or negative" },

        TimestampOverflow
            [ TimestampError ]
            | _ | { "timestamp overflow" },
    }
}
