//! Admin endpoint communication

pub mod client;
pub mod transport;
