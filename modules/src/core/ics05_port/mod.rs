//! ICS 05: Port implementation that specifies the allocation system by which modules can bind to
//! uniquely named ports.

pub mod capabilities;
pub mod context;
pub mod error;
