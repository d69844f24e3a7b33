//! The relaxation network.
//!
//! One unit per candidate pair carries a continuous bond strength in
//! `[0, 2]`. An epoch is a synchronous update of all units from the same
//! snapshot:
//!
//! ```text
//! a = max(tanh(W·b), 0) ⊙ m
//! b = (1 - η)·b + η·a
//! ```
//!
//! where `m` is the (fixed) compatibility mask: 2 for complementary
//! pairs, 0 otherwise. Since `tanh` is bounded by 1 and `b` is a convex
//! combination of its old value and `a`, the strengths never leave `[0, 2]`.
//!

use log::debug;
use log::trace;
use log::warn;
use ndarray::Array1;
use ndarray::Array2;
use serde::Deserialize;
use serde::Serialize;

use hf_structure::backbone_matrix;
use hf_structure::InvalidInput;
use hf_structure::PairSet;
use hf_structure::PairSpace;
use hf_structure::Sequence;
use hf_structure::MIN_LOOP;

use crate::BondSink;
use crate::ConstraintMatrixBuilder;
use crate::CouplingMatrix;
use crate::CouplingWeights;
use crate::PersistError;
use crate::DEFAULT_MAX_STACK_OFFSET;


/// Upper bound of every bond strength, and the mask value of an allowed pair.
pub const MAX_STRENGTH: f64 = 2.0;

/// Parameters of a relaxation network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    /// Pairs must satisfy `j - i > min_loop`.
    pub min_loop: usize,
    /// Fraction η of the activation mixed into the strengths each epoch.
    pub learning_rate: f64,
    /// Starting strength of every complementary pair.
    pub initial_strength: f64,
    /// Largest stacking offset that is stimulated.
    pub max_stack_offset: usize,
    /// Also accept G-U wobble pairs.
    pub allow_wobble: bool,
    /// Coupling weights; derived from the sequence length if unset.
    pub weights: Option<CouplingWeights>,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            min_loop: MIN_LOOP,
            learning_rate: 0.4,
            initial_strength: 0.5,
            max_stack_offset: DEFAULT_MAX_STACK_OFFSET,
            allow_wobble: false,
            weights: None,
        }
    }
}

/// Hopfield-style network over the candidate pairs of one sequence.
#[derive(Debug, Clone)]
pub struct RelaxationEngine {
    sequence: Sequence,
    space: PairSpace,
    coupling: CouplingMatrix,
    mask: Array1<f64>,
    bonds: Array1<f64>,
    learning_rate: f64,
    epoch: usize,
    reference: Option<Array2<f64>>,
}

impl TryFrom<&str> for RelaxationEngine {
    type Error = InvalidInput;

    fn try_from(sequence: &str) -> Result<Self, Self::Error> {
        RelaxationEngine::new(Sequence::try_from(sequence)?, &RelaxationConfig::default())
    }
}

impl RelaxationEngine {

    /// Set up the pair space, coupling matrix, mask and initial strengths.
    pub fn new(sequence: Sequence, config: &RelaxationConfig) -> Result<Self, InvalidInput> {
        let space = PairSpace::new(sequence.len(), config.min_loop)?;
        let weights = config.weights
            .unwrap_or_else(|| CouplingWeights::for_length(sequence.len()));
        let coupling = ConstraintMatrixBuilder::new(&space)
            .weights(weights)
            .max_stack_offset(config.max_stack_offset)
            .build();

        let mask: Array1<f64> = space.iter()
            .map(|p| if sequence.can_pair(p.i() as usize, p.j() as usize, config.allow_wobble) {
                MAX_STRENGTH
            } else {
                0.0
            })
            .collect();

        let learning_rate = config.learning_rate.clamp(0.0, 1.0);
        if learning_rate != config.learning_rate {
            warn!("Learning rate {} clamped to {learning_rate}.", config.learning_rate);
        }
        let initial = config.initial_strength.clamp(0.0, MAX_STRENGTH);
        if initial != config.initial_strength {
            warn!("Initial strength {} clamped to {initial}.", config.initial_strength);
        }
        let bonds = mask.mapv(|m| if m > 0.0 { initial } else { 0.0 });

        debug!(
            "Network for {} nt: {} candidate pairs, {} complementary.",
            sequence.len(),
            space.len(),
            mask.iter().filter(|&&m| m > 0.0).count()
        );

        Ok(Self {
            sequence,
            space,
            coupling,
            mask,
            bonds,
            learning_rate,
            epoch: 0,
            reference: None,
        })
    }

    /// Attach an `n × n` reference structure, shown as an extra layer.
    pub fn with_reference(mut self, reference: Array2<f64>) -> Result<Self, InvalidInput> {
        let n = self.sequence.len();
        let (rows, cols) = reference.dim();
        if rows != n || cols != n {
            let found = if rows != n { rows } else { cols };
            return Err(InvalidInput::LengthMismatch { expected: n, found });
        }
        self.reference = Some(reference);
        Ok(self)
    }

    /// One synchronous update of all bond strengths.
    pub fn epoch(&mut self) {
        let eta = self.learning_rate;
        let activation = self.coupling.matrix()
            .dot(&self.bonds)
            .mapv_into(|x| x.tanh().max(0.0))
            * &self.mask;

        // The clamp only absorbs rounding at the upper bound.
        self.bonds.zip_mut_with(&activation, |b, &a| {
            *b = ((1.0 - eta) * *b + eta * a).clamp(0.0, MAX_STRENGTH);
        });
        self.epoch += 1;

        trace!(
            "Epoch {}: total strength {:.4}, {} active pairs.",
            self.epoch,
            self.bonds.sum(),
            self.bonds.iter().filter(|&&b| b >= 0.5).count()
        );
    }

    /// Round every strength to the nearest integer (ties to even).
    pub fn prune(&mut self) {
        self.bonds.mapv_inplace(f64::round_ties_even);
    }

    /// Run `epochs` epochs, then prune.
    pub fn relax(&mut self, epochs: usize) {
        for _ in 0..epochs {
            self.epoch();
        }
        self.prune();
        debug!("Relaxed for {epochs} epochs: {} pairs remain.", self.predicted_pairs().len());
    }

    /// Relax, then hand the bond matrix and the backbone to `sink`.
    pub fn run<S: BondSink>(&mut self, epochs: usize, sink: &mut S) -> Result<(), PersistError> {
        self.relax(epochs);
        sink.persist(&self.bond_matrix(), &self.backbone())
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn pair_space(&self) -> &PairSpace {
        &self.space
    }

    pub fn coupling(&self) -> &CouplingMatrix {
        &self.coupling
    }

    pub fn mask(&self) -> &Array1<f64> {
        &self.mask
    }

    /// Current bond strength per candidate pair.
    pub fn bonds(&self) -> &Array1<f64> {
        &self.bonds
    }

    pub fn epoch_count(&self) -> usize {
        self.epoch
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn reference(&self) -> Option<&Array2<f64>> {
        self.reference.as_ref()
    }

    /// Strengths scattered into an upper-triangular `n × n` matrix.
    pub fn bond_matrix(&self) -> Array2<f64> {
        let n = self.sequence.len();
        let mut m = Array2::zeros((n, n));
        for (p, &b) in self.space.iter().zip(self.bonds.iter()) {
            m[(p.i() as usize, p.j() as usize)] = b;
        }
        m
    }

    pub fn backbone(&self) -> Array2<f64> {
        backbone_matrix(self.sequence.len())
    }

    /// Pairs whose strength would survive pruning.
    pub fn predicted_pairs(&self) -> PairSet {
        let mut pairs = PairSet::new(self.sequence.len());
        for (p, &b) in self.space.iter().zip(self.bonds.iter()) {
            if b.round_ties_even() > 0.0 {
                pairs.insert(p);
            }
        }
        pairs
    }

    /// The adjacency layers for a layout: backbone, current bonds, and the
    /// reference structure if one is attached.
    pub fn layers(&self) -> Vec<Array2<f64>> {
        let mut layers = vec![self.backbone(), self.bond_matrix()];
        if let Some(reference) = &self.reference {
            layers.push(reference.clone());
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BondDump;
    use hf_structure::Pair;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn random_sequence(rng: &mut StdRng, n: usize) -> Sequence {
        let s: String = (0..n).map(|_| ['A', 'C', 'G', 'U'][rng.random_range(0..4)]).collect();
        Sequence::try_from(s.as_str()).unwrap()
    }

    fn in_bounds(net: &RelaxationEngine) -> bool {
        net.bonds().iter().all(|&b| (0.0..=MAX_STRENGTH).contains(&b))
    }

    #[test]
    fn test_too_short_fails() {
        for s in ["", "A", "ACGU", "acgua"] {
            let res = RelaxationEngine::try_from(s);
            if s.len() <= MIN_LOOP {
                assert!(matches!(res, Err(InvalidInput::SequenceTooShort { .. })));
            } else {
                assert!(res.unwrap().bonds().is_empty());
            }
        }
        assert!(matches!(
            RelaxationEngine::try_from("ACGUAXAC"),
            Err(InvalidInput::InvalidSymbol { symbol: 'X', position: 5 })
        ));
    }

    #[test]
    fn test_mask_and_initial_state() {
        let net = RelaxationEngine::try_from("AACUAAGUU").unwrap();
        let space = net.pair_space();
        assert_eq!(space.len(), 10);
        assert_eq!(net.epoch_count(), 0);
        for (k, p) in space.iter().enumerate() {
            let allowed = matches!((p.i(), p.j()), (0, 7) | (0, 8) | (1, 7) | (1, 8));
            assert_eq!(net.mask()[k], if allowed { 2.0 } else { 0.0 });
            assert_eq!(net.bonds()[k], if allowed { 0.5 } else { 0.0 });
        }
    }

    #[test]
    fn test_nine_nucleotides_twenty_epochs() {
        let mut net = RelaxationEngine::try_from("AACUAAGUU").unwrap();
        for _ in 0..20 {
            net.epoch();
            assert!(in_bounds(&net));
        }
        assert_eq!(net.epoch_count(), 20);
        let mut sink: Vec<BondDump> = Vec::new();
        net.run(0, &mut sink).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].bonds.len(), 9);
        assert_eq!(sink[0].chain[0][1], 1.0);
    }

    #[test]
    fn test_bounded_on_random_sequences() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let n = rng.random_range(5..40);
            let seq = random_sequence(&mut rng, n);
            let config = RelaxationConfig { allow_wobble: rng.random_bool(0.5), ..Default::default() };
            let mut net = RelaxationEngine::new(seq, &config).unwrap();
            for _ in 0..50 {
                net.epoch();
                assert!(in_bounds(&net));
            }
        }
    }

    #[test]
    fn test_bounded_with_strong_stimulation() {
        let config = RelaxationConfig {
            learning_rate: 1.0,
            initial_strength: 2.0,
            weights: Some(CouplingWeights { rc_inhibit: 0.0, knot_inhibit: 0.0, diag_stim: 100.0 }),
            ..Default::default()
        };
        let seq = Sequence::try_from("GGGGGAAAAACCCCC").unwrap();
        let mut net = RelaxationEngine::new(seq, &config).unwrap();
        for _ in 0..30 {
            net.epoch();
            assert!(in_bounds(&net));
        }
    }

    #[test]
    fn test_epoch_is_synchronous() {
        let seq = Sequence::try_from("GGGAAAACCCAGGGAAAACCC").unwrap();
        let mut net = RelaxationEngine::new(seq, &RelaxationConfig::default()).unwrap();
        net.epoch();
        let b0 = net.bonds().clone();
        let eta = net.learning_rate();
        let activation = net.coupling().matrix().dot(&b0)
            .mapv(|x| x.tanh().max(0.0)) * net.mask();
        let expected = &b0 * (1.0 - eta) + &activation * eta;
        net.epoch();
        for (x, y) in net.bonds().iter().zip(expected.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_prune_is_idempotent() {
        let seq = Sequence::try_from("GGGGAAAAUCCCCAGGGAAAACCCU").unwrap();
        let mut net = RelaxationEngine::new(seq, &RelaxationConfig::default()).unwrap();
        for _ in 0..7 {
            net.epoch();
        }
        net.prune();
        let once = net.bonds().clone();
        assert!(once.iter().all(|&b| b == 0.0 || b == 1.0 || b == 2.0));
        net.prune();
        assert_eq!(net.bonds(), &once);
    }

    #[test]
    fn test_prune_ties_to_even() {
        let mut net = RelaxationEngine::try_from("AACUAAGUU").unwrap();
        net.prune();
        assert!(net.bonds().iter().all(|&b| b == 0.0));
        assert!(net.predicted_pairs().is_empty());
    }

    #[test]
    fn test_stem_is_found() {
        let mut net = RelaxationEngine::try_from("GGGGAAAAAACCCC").unwrap();
        net.relax(100);
        let pairs = net.predicted_pairs();
        for (i, j) in [(0, 13), (1, 12), (2, 11), (3, 10)] {
            assert!(pairs.contains(&Pair::new(i, j)), "missing stem pair ({i},{j})");
        }
        let bm = net.bond_matrix();
        for p in pairs.iter() {
            assert!(bm[(p.i() as usize, p.j() as usize)] >= 1.0);
        }
    }

    #[test]
    fn test_reference_layers() {
        let net = RelaxationEngine::try_from("GGGGAAAAAACCCC").unwrap();
        assert_eq!(net.layers().len(), 2);

        let reference = PairSet::from_dot_bracket("((((......))))").unwrap().to_matrix();
        let net = net.with_reference(reference.clone()).unwrap();
        let layers = net.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[2], reference);
        assert_eq!(layers[0][(0, 1)], 1.0);

        let err = net.with_reference(Array2::zeros((13, 14))).err();
        assert_eq!(err, Some(InvalidInput::LengthMismatch { expected: 14, found: 13 }));
    }
}
