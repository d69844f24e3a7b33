use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "hopfold - RNA secondary structure prediction with a relaxation network, and spring layouts of the result."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// JSON configuration file (network, layout and run parameters)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relax the network for a sequence, print the structure and dump the bonds.
    Fold(FoldArgs),
    /// Relax the network, lay out the result and render it as SVG.
    Layout(LayoutArgs),
    /// Learn coupling weights from sequences with known structures.
    Train(TrainArgs),
}

/// Options shared by everything that builds a network.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// RNA sequence over A, C, G, U (case-insensitive)
    #[arg(value_name = "SEQUENCE")]
    pub sequence: String,

    /// Number of epochs before pruning
    #[arg(short, long, value_name = "NUM")]
    pub epochs: Option<usize>,

    /// Reference structure in dot-bracket notation
    #[arg(short, long, value_name = "DOTBRACKET")]
    pub reference: Option<String>,

    /// Accept G-U wobble pairs
    #[arg(long)]
    pub wobble: bool,
}

#[derive(Args, Debug)]
pub struct FoldArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Where to write the bond dump
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Number of layout steps
    #[arg(short, long, value_name = "NUM")]
    pub steps: Option<usize>,

    /// Time step per layout step
    #[arg(long, value_name = "SECONDS")]
    pub dt: Option<f64>,

    /// Width of the layout area
    #[arg(long, value_name = "PX")]
    pub width: Option<f64>,

    /// Height of the layout area
    #[arg(long, value_name = "PX")]
    pub height: Option<f64>,

    /// Output SVG file
    #[arg(long, required = true, value_name = "PATH")]
    pub svg: PathBuf,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON file with a list of {"sequence": ..., "structure": ...} records
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Number of epochs per example
    #[arg(short, long, value_name = "NUM")]
    pub epochs: Option<usize>,

    /// Learning rate of the weight updates
    #[arg(long, value_name = "RATE")]
    pub rate: Option<f64>,
}
