use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An adjacency layer does not match the number of nodes.
    #[error("layer {layer} has shape {rows}x{cols}, expected {nodes}x{nodes}")]
    DimensionMismatch {
        layer: usize,
        rows: usize,
        cols: usize,
        nodes: usize,
    },
}
