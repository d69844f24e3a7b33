use std::path::PathBuf;

use colored::Colorize;
use log::info;

use hf_network::DEFAULT_DUMP_FILE;
use hf_network::JsonDumpFile;
use hf_network::RelaxationEngine;
use hf_structure::PairSet;

use crate::cli::FoldArgs;
use crate::commands::build_network;
use crate::config::HopfoldConfig;
use crate::error::Result;

/// What a relaxed network predicts, compared against its reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldReport {
    pub sequence: String,
    pub pairs: PairSet,
    /// Pairs of the reference structure that were predicted, and the
    /// size of the reference.
    pub recovered: Option<(usize, usize)>,
}

impl FoldReport {
    pub fn from_network(net: &RelaxationEngine) -> Self {
        let pairs = net.predicted_pairs();
        let recovered = net.reference().map(|reference| {
            let reference = PairSet::from_matrix(reference, 0.5);
            let hits = reference.iter().filter(|p| pairs.contains(p)).count();
            (hits, reference.len())
        });
        Self {
            sequence: net.sequence().to_string(),
            pairs,
            recovered,
        }
    }

    pub fn print(&self) {
        println!("{}", self.sequence);
        match self.pairs.dot_bracket() {
            Some(db) => println!("{} {}", db.bold(), format!("({} pairs)", self.pairs.len()).dimmed()),
            None => {
                println!("{}", "Prediction is not a secondary structure:".yellow());
                println!("{}", self.pairs);
            }
        }
        if let Some((hits, total)) = self.recovered {
            let line = format!("Reference pairs recovered: {hits}/{total}");
            if hits == total {
                println!("{}", line.green());
            } else {
                println!("{}", line.yellow());
            }
        }
    }
}

pub fn run(args: FoldArgs, config: &HopfoldConfig) -> Result<FoldReport> {
    let epochs = args.network.epochs.unwrap_or(config.epochs);
    let mut net = build_network(&args.network, config)?;

    let dump = args.dump.unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_FILE));
    let mut sink = JsonDumpFile::new(dump);
    info!("Relaxing {} nt for {epochs} epochs.", net.sequence().len());
    net.run(epochs, &mut sink)?;

    let report = FoldReport::from_network(&net);
    report.print();
    Ok(report)
}
