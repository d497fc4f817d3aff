//! Bouncing balls engine library.
//!
//! This module exposes the simulation components for use in tests and binaries.

pub mod body;
pub mod clock;
pub mod config;
pub mod engine;
pub mod sim_loop;
pub mod world;

pub use balls_shared::vec2;
pub use engine::Engine;
