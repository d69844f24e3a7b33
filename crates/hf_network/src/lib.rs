//! The hf_network crate.
//!
//! Predicts a secondary structure by relaxing a Hopfield-style network
//! whose units are the candidate base pairs of a sequence:
//!  - `ConstraintMatrixBuilder`: the symmetric pair-to-pair coupling matrix
//!    (exclusivity, pseudoknot inhibition, helix stacking).
//!  - `RelaxationEngine`: synchronous epochs over the bond-strength vector,
//!    pruning to a discrete structure, and hand-off to a `BondSink`.
//!  - `WeightLearner`: contrastive adjustment of the three coupling weights
//!    from reference structures.
//!

mod coupling;
mod relaxation;
mod persist;
mod learner;

pub use coupling::*;
pub use relaxation::*;
pub use persist::*;
pub use learner::*;
