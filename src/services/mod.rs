//! Domain logic services
//!
//! Everything here is pure and stateless: snapshots in, decisions and
//! state fragments out. The repository owns the data and commits what
//! these functions compute.

pub mod authorization;
pub mod lifecycle;
pub mod timeline;
pub mod workflow;
