//! Construction of the pair-to-pair coupling matrix.
//!
//! Every two candidate pairs `p = (i, j)` and `q = (i', j')` interact
//! through at most one structural rule:
//!
//!  - **exclusivity**: they share a position (a nucleotide binds once),
//!  - **pseudoknot**: their spans cross, `i < i' < j < j'`,
//!  - **stacking**: `q` sits inside `p` shifted by the same offset `d` on
//!    both strands, `i' - i = j - j' = d`, for small `d`; the stimulation
//!    decays as `1/d`.
//!
//! All other combinations (nested without stacking, side by side) are
//! uncoupled. The matrix has a zero diagonal and is exactly symmetric:
//! each value is computed once for the upper triangle and written to
//! both mirrored positions.
//!

use log::debug;
use ndarray::Array2;
use serde::Deserialize;
use serde::Serialize;

use hf_structure::Pair;
use hf_structure::PairSpace;


/// Largest stacking offset that still receives stimulation.
pub const DEFAULT_MAX_STACK_OFFSET: usize = 3;

/// The three coupling strengths of the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingWeights {
    /// Inhibition between pairs sharing a position (negative).
    pub rc_inhibit: f64,
    /// Inhibition between crossing pairs (negative).
    pub knot_inhibit: f64,
    /// Stimulation between stacked pairs at offset 1 (positive).
    pub diag_stim: f64,
}

impl CouplingWeights {
    /// Default strengths for a sequence of length `n`. The inhibitions
    /// shrink with `n²` since the number of competitors grows with it.
    pub fn for_length(n: usize) -> Self {
        let n2 = (n.max(1) * n.max(1)) as f64;
        Self {
            rc_inhibit: -2.0 / n2,
            knot_inhibit: -1.0 / n2,
            diag_stim: 0.4,
        }
    }

    /// The matrix entry for two pairs in the given relation.
    pub fn weight(&self, relation: Relation) -> f64 {
        match relation {
            Relation::Exclusive => self.rc_inhibit,
            Relation::Knot => self.knot_inhibit,
            Relation::Stack(d) => self.diag_stim / d as f64,
            Relation::Independent => 0.0,
        }
    }
}

/// How two distinct candidate pairs constrain each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Both pairs use a common position.
    Exclusive,
    /// The spans cross without nesting.
    Knot,
    /// Stacked with the given offset on both strands.
    Stack(usize),
    /// No coupling.
    Independent,
}

/// Classify two distinct pairs. Stacking is only reported for offsets
/// up to `max_stack_offset`; larger offsets are `Independent`.
pub fn relation(p: Pair, q: Pair, max_stack_offset: usize) -> Relation {
    let (p, q) = if (p.i(), p.j()) <= (q.i(), q.j()) { (p, q) } else { (q, p) };
    let (i, j, k, l) = (p.i(), p.j(), q.i(), q.j());

    if i == k || j == l || i == l || j == k {
        return Relation::Exclusive;
    }
    // From here on i < k.
    if k < j && j < l {
        return Relation::Knot;
    }
    if l < j {
        let d = (k - i) as usize;
        if d == (j - l) as usize && d <= max_stack_offset {
            return Relation::Stack(d);
        }
    }
    Relation::Independent
}

/// The symmetric `P × P` coupling matrix over a pair space.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingMatrix {
    weights: Array2<f64>,
}

impl CouplingMatrix {
    pub fn matrix(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Number of candidate pairs on each axis.
    pub fn dim(&self) -> usize {
        self.weights.nrows()
    }

    pub fn get(&self, k: usize, l: usize) -> f64 {
        self.weights[(k, l)]
    }

    /// Exact (bitwise) symmetry check.
    pub fn is_symmetric(&self) -> bool {
        self.weights.indexed_iter()
            .all(|((k, l), &w)| w.to_bits() == self.weights[(l, k)].to_bits())
    }
}

/// Builds the coupling matrix for one pair space.
#[derive(Debug, Clone)]
pub struct ConstraintMatrixBuilder<'a> {
    space: &'a PairSpace,
    weights: CouplingWeights,
    max_stack_offset: usize,
}

impl<'a> ConstraintMatrixBuilder<'a> {
    /// Start from the default weights for the space's sequence length.
    pub fn new(space: &'a PairSpace) -> Self {
        Self {
            space,
            weights: CouplingWeights::for_length(space.length()),
            max_stack_offset: DEFAULT_MAX_STACK_OFFSET,
        }
    }

    pub fn weights(mut self, weights: CouplingWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn max_stack_offset(mut self, offset: usize) -> Self {
        self.max_stack_offset = offset;
        self
    }

    pub fn build(&self) -> CouplingMatrix {
        let pairs = self.space.as_slice();
        let n = pairs.len();
        let mut weights = Array2::zeros((n, n));
        let (mut exclusive, mut knots, mut stacks) = (0usize, 0usize, 0usize);

        for (k, &p) in pairs.iter().enumerate() {
            for (l, &q) in pairs.iter().enumerate().skip(k + 1) {
                let rel = relation(p, q, self.max_stack_offset);
                match rel {
                    Relation::Independent => continue,
                    Relation::Exclusive => exclusive += 1,
                    Relation::Knot => knots += 1,
                    Relation::Stack(_) => stacks += 1,
                }
                let w = self.weights.weight(rel);
                weights[(k, l)] = w;
                weights[(l, k)] = w;
            }
        }

        debug!(
            "Coupling matrix {n}x{n}: {exclusive} exclusive, {knots} knotted, {stacks} stacked pairs of pairs."
        );
        CouplingMatrix { weights }
    }
}
