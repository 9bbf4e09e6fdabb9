//! Adapters between the command layer and the outside world.

pub mod batch;
pub mod csv;
