//! The hf_layout crate.
//!
//! A damped spring layout for graphs given as an ordered set of weighted
//! adjacency layers (e.g. backbone, predicted pairs, reference pairs).
//! Nodes repel each other, edges pull towards a rest length, and a weak
//! gravity keeps the picture centred. One node at a time can be pinned
//! and dragged around by the caller.
//!
//! The engine never draws anything: callers read back node positions,
//! edge segments and edge colors after each step.
//!

mod error;
mod params;
mod reachability;
mod engine;

pub use error::*;
pub use params::*;
pub use reachability::*;
pub use engine::*;
