//! Learning the coupling weights from known structures.
//!
//! For each training example the network is relaxed with the current
//! weights (the *free* phase), and its pruned strengths are compared to the
//! reference structure (the *clamped* phase). Every unordered pair of
//! candidate pairs `(p, q)` contributes
//!
//! ```text
//! Δ = ν · (b⁺_p b⁺_q − b⁻_p b⁻_q)
//! ```
//!
//! to the weight of the rule that couples them. Uncoupled combinations
//! contribute nothing.
//!

use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use hf_structure::InvalidInput;
use hf_structure::PairSet;
use hf_structure::PairSpace;
use hf_structure::Sequence;

use crate::relation;
use crate::CouplingWeights;
use crate::RelaxationConfig;
use crate::RelaxationEngine;
use crate::Relation;


/// A sequence together with its known structure.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub sequence: Sequence,
    pub structure: PairSet,
}

impl TryFrom<(&str, &str)> for TrainingExample {
    type Error = InvalidInput;

    fn try_from((sequence, structure): (&str, &str)) -> Result<Self, Self::Error> {
        let sequence = Sequence::try_from(sequence)?;
        let structure = PairSet::from_dot_bracket(structure)?;
        if structure.length() != sequence.len() {
            return Err(InvalidInput::LengthMismatch {
                expected: sequence.len(),
                found: structure.length(),
            });
        }
        Ok(Self { sequence, structure })
    }
}

/// Accumulated change of the three coupling weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightDelta {
    pub rc_inhibit: f64,
    pub knot_inhibit: f64,
    pub diag_stim: f64,
}

impl CouplingWeights {
    pub fn apply(&mut self, delta: WeightDelta) {
        self.rc_inhibit += delta.rc_inhibit;
        self.knot_inhibit += delta.knot_inhibit;
        self.diag_stim += delta.diag_stim;
    }
}

/// Contrastive update between the clamped (reference) and free (relaxed)
/// strength vectors of one pair space.
pub fn contrastive_delta(
    space: &PairSpace,
    clamped: &Array1<f64>,
    free: &Array1<f64>,
    max_stack_offset: usize,
    rate: f64,
) -> WeightDelta {
    debug_assert_eq!(clamped.len(), space.len());
    debug_assert_eq!(free.len(), space.len());

    let mut delta = WeightDelta::default();
    for ((k, p), (l, q)) in space.as_slice().iter().copied().enumerate().tuple_combinations() {
        let d = rate * (clamped[k] * clamped[l] - free[k] * free[l]);
        if d == 0.0 {
            continue;
        }
        match relation(p, q, max_stack_offset) {
            Relation::Exclusive => delta.rc_inhibit += d,
            Relation::Knot => delta.knot_inhibit += d,
            Relation::Stack(_) => delta.diag_stim += d,
            Relation::Independent => (),
        }
    }
    delta
}

pub struct WeightLearner {
    weights: CouplingWeights,
    config: RelaxationConfig,
    rate: f64,
}

impl WeightLearner {
    pub fn new(weights: CouplingWeights) -> Self {
        Self {
            weights,
            config: RelaxationConfig::default(),
            rate: 0.01,
        }
    }

    /// Network parameters for the free phase. Its `weights` are ignored.
    pub fn with_config(mut self, config: RelaxationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn weights(&self) -> CouplingWeights {
        self.weights
    }

    /// One pass over the examples, relaxing each for `epochs` epochs.
    pub fn train(
        &mut self,
        examples: &[TrainingExample],
        epochs: usize,
    ) -> Result<CouplingWeights, InvalidInput> {
        for example in examples {
            let config = RelaxationConfig {
                weights: Some(self.weights),
                ..self.config.clone()
            };
            let mut net = RelaxationEngine::new(example.sequence.clone(), &config)?;
            net.relax(epochs);

            let clamped: Array1<f64> = net.pair_space().iter()
                .map(|p| if example.structure.contains(&p) { 1.0 } else { 0.0 })
                .collect();
            let delta = contrastive_delta(
                net.pair_space(),
                &clamped,
                net.bonds(),
                config.max_stack_offset,
                self.rate,
            );
            self.weights.apply(delta);
            debug!("Trained on {}: {:?} -> {:?}", example.sequence, delta, self.weights);
        }
        Ok(self.weights)
    }
}
