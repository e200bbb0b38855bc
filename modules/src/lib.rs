#![allow(clippy::large_enum_variant)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

//! Implementation of the core of the Inter-Blockchain Communication protocol.
//!
//! - ICS 02: Client
//! - ICS 03: Connection
//! - ICS 04: Channel
//! - ICS 05: Port
//! - ICS 06: Solo Machine Client
//! - ICS 07: Tendermint (validator-set) Client
//! - ICS 09: Loopback (localhost) Client
//! - ICS 18: Basic relayer functions (with the `mocks` feature)
//! - ICS 23: Vector Commitment Scheme
//! - ICS 24: Host Requirements
//! - ICS 26: Routing
//!
//! Handlers are pure functions over a reader context: they return a
//! [`handler::HandlerOutput`] carrying the result, a log and the events, and
//! the keeper half of the context persists the result. The routing layer
//! ([`core::ics26_routing::handler::deliver`]) applies every message
//! atomically.

pub mod clients;
pub mod config;
pub mod core;
pub mod events;
pub mod handler;
pub mod macros;
pub mod proofs;
pub mod timestamp;

mod serializers;

/// Re-export of ICS 002 Height domain type
pub type Height = crate::core::ics02_client::height::Height;

#[cfg(any(test, feature = "mocks"))]
pub mod test_utils;

#[cfg(any(test, feature = "mocks"))]
pub mod mock; // Context mock, the underlying host chain and a mock application module.

#[cfg(any(test, feature = "mocks"))]
pub mod relayer;
