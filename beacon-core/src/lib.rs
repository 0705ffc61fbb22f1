//! Wire model shared by the relay and anything that talks to it.

pub mod model;

pub use model::*;
