use std::fs;

use log::info;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use hf_network::CouplingWeights;
use hf_network::TrainingExample;
use hf_network::WeightLearner;

use crate::cli::TrainArgs;
use crate::config::HopfoldConfig;
use crate::error::Result;

const DEFAULT_RATE: f64 = 0.01;

/// One line of a training set, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub sequence: String,
    pub structure: String,
}

/// Starting weights: the configured ones, or the defaults for the mean
/// sequence length of the training set.
fn initial_weights(examples: &[TrainingExample], config: &HopfoldConfig) -> CouplingWeights {
    config.network.weights.unwrap_or_else(|| {
        let total: usize = examples.iter().map(|e| e.sequence.len()).sum();
        CouplingWeights::for_length(total / examples.len().max(1))
    })
}

pub fn run(args: TrainArgs, config: &HopfoldConfig) -> Result<CouplingWeights> {
    let text = fs::read_to_string(&args.input)?;
    let records: Vec<TrainingRecord> = serde_json::from_str(&text)?;
    let examples = records.iter()
        .map(|r| TrainingExample::try_from((r.sequence.as_str(), r.structure.as_str())))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if examples.is_empty() {
        warn!("No training examples in {}.", args.input.display());
    }

    let epochs = args.epochs.unwrap_or(config.epochs);
    let mut learner = WeightLearner::new(initial_weights(&examples, config))
        .with_config(config.network.clone())
        .with_rate(args.rate.unwrap_or(DEFAULT_RATE));
    info!("Training on {} examples, {epochs} epochs each.", examples.len());
    let weights = learner.train(&examples, epochs)?;

    println!("{}", serde_json::to_string_pretty(&weights)?);
    Ok(weights)
}
