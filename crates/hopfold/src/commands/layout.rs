use log::debug;
use log::info;

use hf_layout::LayoutEngine;

use crate::cli::LayoutArgs;
use crate::commands::build_network;
use crate::config::HopfoldConfig;
use crate::error::Result;
use crate::render::render_svg;

pub fn run(args: LayoutArgs, config: &HopfoldConfig) -> Result<LayoutEngine> {
    let epochs = args.network.epochs.unwrap_or(config.epochs);
    let steps = args.steps.unwrap_or(config.steps);
    let dt = args.dt.unwrap_or(config.dt);
    let width = args.width.unwrap_or(config.width);
    let height = args.height.unwrap_or(config.height);

    let mut net = build_network(&args.network, config)?;
    net.relax(epochs);

    let mut layout = LayoutEngine::new(net.sequence().len(), width, height, config.layout)
        .with_layers(&net.layers())?;
    info!("Laying out {} nodes and {} edges for {steps} steps.", layout.node_count(), layout.edges().len());
    for step in 0..steps {
        layout.step(dt);
        if (step + 1) % 100 == 0 {
            debug!("Step {}: kinetic energy {:.3}.", step + 1, layout.kinetic_energy());
        }
    }

    render_svg(&layout, &args.svg)?;
    println!("Wrote {}", args.svg.display());
    Ok(layout)
}
