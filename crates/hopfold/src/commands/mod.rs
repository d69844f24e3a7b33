pub mod fold;
pub mod layout;
pub mod train;

use log::debug;

use hf_network::RelaxationEngine;
use hf_structure::PairSet;
use hf_structure::Sequence;

use crate::cli::NetworkArgs;
use crate::config::HopfoldConfig;
use crate::error::Result;

/// Build the network for the sequence on the command line, with the
/// reference structure attached if one was given.
pub fn build_network(args: &NetworkArgs, config: &HopfoldConfig) -> Result<RelaxationEngine> {
    let mut network = config.network.clone();
    network.allow_wobble |= args.wobble;

    let sequence = Sequence::try_from(args.sequence.as_str())?;
    let mut net = RelaxationEngine::new(sequence, &network)?;
    if let Some(reference) = &args.reference {
        let reference = PairSet::from_dot_bracket(reference)?;
        debug!("Reference structure with {} pairs.", reference.len());
        net = net.with_reference(reference.to_matrix())?;
    }
    Ok(net)
}
