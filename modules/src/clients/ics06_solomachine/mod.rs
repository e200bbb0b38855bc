//! ICS 06: Solo machine client. A single key-holder (a phone, an exchange
//! wallet, an off-chain process) that attests to its own state by signing.

pub mod client_def;
pub mod client_state;
pub mod consensus_state;
pub mod header;
pub mod misbehaviour;
pub mod proof;

/// Path signed over when a solo machine rotates its key with a header.
pub const SENTINEL_HEADER_PATH: &str = "solomachine:header";
