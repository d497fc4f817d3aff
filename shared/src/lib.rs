//! Types shared between the simulation engine and any renderer that
//! consumes its snapshots.

pub mod config;
pub mod protocol;
pub mod vec2;
