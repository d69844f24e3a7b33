//! The hf_structure crate.
//!
//! Basic representations shared by the relaxation network and the layout:
//!  - nucleotide sequences (`Base`, `Sequence`)
//!  - base pairs and pair sets (`Pair`, `PairSet`)
//!  - the indexed space of candidate pairs (`PairSpace`)
//!

mod error;
mod sequence;
mod pair_set;
mod pair_space;

pub use error::*;
pub use sequence::*;
pub use pair_set::*;
pub use pair_space::*;

use ndarray::Array2;


/// Sequence position. Lengths beyond `u16::MAX` are rejected at parse time.
pub type NAIDX = u16;

/// Two `NAIDX` packed into one integer, used as a set and map key for pairs.
pub type P1KEY = u32;

const _: () = assert!(2 * NAIDX::BITS <= P1KEY::BITS);

/// Minimum number of positions a candidate pair must span beyond its own
/// endpoints: a pair (i, j) is admissible only if `j - i > MIN_LOOP`.
pub const MIN_LOOP: usize = 4;

/// The covalent chain of a sequence of the given length, as an upper
/// triangular adjacency matrix with `(i, i + 1) = 1`.
pub fn backbone_matrix(length: usize) -> Array2<f64> {
    let mut chain = Array2::zeros((length, length));
    for i in 1..length {
        chain[(i - 1, i)] = 1.0;
    }
    chain
}
