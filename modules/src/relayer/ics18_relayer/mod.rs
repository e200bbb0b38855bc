//! ICS 18: basic relayer functions.

pub mod context;
pub mod error;
pub mod utils;
