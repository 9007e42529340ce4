//! Engine implementations behind the `ports` traits.

pub mod sim;

pub use sim::SimEngine;
