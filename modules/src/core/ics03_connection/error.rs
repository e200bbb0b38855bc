use flex_error::define_error;

use crate::core::ics02_client::error as client_error;
use crate::core::ics03_connection::connection::State;
use crate::core::ics03_connection::version::Version;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::timestamp::{Timestamp, TimestampError};
use crate::Height;

define_error! {
    #[derive(Debug)]
    Error {
        Ics02Client
            [ client_error::Error ]
            | _ | { "ics02 client error" },

        InvalidConnectionState
            {
                connection_id: ConnectionId,
                state: State,
            }
            | e | {
                format_args!("connection {0} is in an unexpected state: {1}",
                    e.connection_id, e.state)
            },

        ConnectionNotFound
            { connection_id: ConnectionId }
            | e | {
                format_args!("connection not found: {0}", e.connection_id)
            },

        ConnectionMismatch
            { connection_id: ConnectionId }
            | e | {
                format_args!("connection {0} does not match the parameters of the message",
                    e.connection_id)
            },

        InvalidIdentifier
            [ ValidationError ]
            | _ | { "identifier error" },

        MissingCounterpartyConnectionId
            | _ | { "missing counterparty connection identifier" },

        EmptyVersions
            | _ | { "empty supported versions" },

        EmptyFeatures
            | _ | { "empty supported features" },

        VersionNotSupported
            { version: Version }
            | e | {
                format_args!("the version {0} is not among the locally proposed versions",
                    e.version)
            },

        VersionNegotiationFailed
            | _ | { "no common version: no version supported by both chains could be negotiated" },

        TimestampOverflow
            [ TimestampError ]
            | _ | { "timestamp overflow" },

        NotEnoughTimeElapsed
            {
                current_time: Timestamp,
                earliest_time: Timestamp,
            }
            | e | {
                format_args!("not enough time elapsed, current timestamp {0} is still less than earliest acceptable timestamp {1}",
                    e.current_time, e.earliest_time)
            },

        NotEnoughBlocksElapsed
            {
                current_height: Height,
                earliest_height: Height,
            }
            | e | {
                format_args!("not enough blocks elapsed, current height {0} is still less than earliest acceptable height {1}",
                    e.current_height, e.earliest_height)
            },
    }
}
