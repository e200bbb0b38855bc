//! ICS 26: Routing module: dispatches every message to its ICS handler and
//! the application modules bound to ports.

pub mod context;
pub mod error;
pub mod handler;
pub mod msgs;
