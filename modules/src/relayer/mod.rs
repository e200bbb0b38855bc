//! Relayer-side helpers, used to drive two mock chains against each other.

pub mod ics18_relayer;
