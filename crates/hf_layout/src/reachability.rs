//! Merging adjacency layers into one weighted graph.
//!
//! Layer `i` of the reachability set is symmetrized and weighted by
//! `base^i`, so later layers dominate the springs. The merged matrix is
//! normalized to a maximum of 1. Each layer also keeps its own edge list,
//! drawn in a fixed color whose alpha follows the edge weight relative to
//! the strongest edge of that layer.
//!

use ndarray::Array2;

use crate::LayoutError;


/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Layer colors, by layer index (cycled beyond six layers).
pub const PALETTE: [Rgba; 6] = [
    Rgba::new(0.0, 0.0, 1.0, 1.0),
    Rgba::new(0.0, 1.0, 0.0, 1.0),
    Rgba::new(1.0, 0.0, 0.0, 1.0),
    Rgba::new(0.0, 1.0, 1.0, 1.0),
    Rgba::new(1.0, 0.0, 1.0, 1.0),
    Rgba::new(1.0, 1.0, 0.0, 1.0),
];

/// A connection `source <= target` of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub layer: usize,
    /// Symmetrized weight within its layer.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reachability {
    merged: Array2<f64>,
    edges: Vec<Edge>,
    colors: Vec<Rgba>,
}

impl Reachability {
    /// No connections at all.
    pub fn empty(nodes: usize) -> Self {
        Self {
            merged: Array2::zeros((nodes, nodes)),
            edges: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn from_layers(layers: &[Array2<f64>], nodes: usize, base: f64) -> Result<Self, LayoutError> {
        let mut reach = Self::empty(nodes);

        for (layer, x) in layers.iter().enumerate() {
            let (rows, cols) = x.dim();
            if rows != nodes || cols != nodes {
                return Err(LayoutError::DimensionMismatch { layer, rows, cols, nodes });
            }
            let sym = x + &x.t();
            reach.merged.scaled_add(base.powi(layer as i32), &sym);

            let max = sym.fold(0.0_f64, |m, &w| m.max(w));
            let color = PALETTE[layer % PALETTE.len()];
            for ((source, target), &weight) in sym.indexed_iter() {
                if source > target || weight == 0.0 {
                    continue;
                }
                let alpha = if max > 0.0 { (weight / max) as f32 } else { 1.0 };
                reach.edges.push(Edge { source, target, layer, weight });
                reach.colors.push(color.with_alpha(alpha));
            }
        }

        let max = reach.merged.fold(0.0_f64, |m, &w| m.max(w));
        if max > 0.0 {
            reach.merged.mapv_inplace(|w| w / max);
        }
        Ok(reach)
    }

    /// The normalized, symmetric spring weights.
    pub fn merged(&self) -> &Array2<f64> {
        &self.merged
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// One color per edge, in edge order.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_layers_are_weighted_and_normalized() {
        let chain = array![[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let bonds = array![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        let reach = Reachability::from_layers(&[chain, bonds], 3, 20.0).unwrap();
        let m = reach.merged();
        assert_eq!(m[(0, 1)], 0.05);
        assert_eq!(m[(1, 0)], 0.05);
        assert_eq!(m[(1, 2)], 1.0);
        assert_eq!(m[(2, 1)], 1.0);
        assert_eq!(m[(0, 2)], 0.0);

        assert_eq!(reach.edges().len(), 2);
        assert_eq!(reach.edges()[0], Edge { source: 0, target: 1, layer: 0, weight: 1.0 });
        assert_eq!(reach.edges()[1], Edge { source: 1, target: 2, layer: 1, weight: 1.0 });
        assert_eq!(reach.colors()[0], PALETTE[0]);
        assert_eq!(reach.colors()[1], PALETTE[1]);
    }

    #[test]
    fn test_alpha_follows_weight() {
        let layer = array![[0.0, 2.0, 1.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let reach = Reachability::from_layers(&[layer], 3, 20.0).unwrap();
        let alphas: Vec<f32> = reach.colors().iter().map(|c| c.a).collect();
        assert_eq!(alphas, vec![1.0, 0.5]);
    }

    #[test]
    fn test_symmetric_input_is_not_duplicated() {
        let layer = array![[0.0, 1.0], [1.0, 0.0]];
        let reach = Reachability::from_layers(&[layer], 2, 20.0).unwrap();
        assert_eq!(reach.edges().len(), 1);
        assert_eq!(reach.edges()[0].weight, 2.0);
        assert_eq!(reach.merged()[(0, 1)], 1.0);
    }

    #[test]
    fn test_zero_layers_stay_zero() {
        let reach = Reachability::from_layers(&[Array2::zeros((4, 4))], 4, 20.0).unwrap();
        assert!(reach.merged().iter().all(|&w| w == 0.0));
        assert!(reach.edges().is_empty());
        assert_eq!(Reachability::from_layers(&[], 4, 20.0).unwrap(), Reachability::empty(4));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Reachability::from_layers(&[Array2::zeros((3, 3)), Array2::zeros((3, 2))], 3, 20.0);
        assert_eq!(err, Err(LayoutError::DimensionMismatch { layer: 1, rows: 3, cols: 2, nodes: 3 }));
    }

    #[test]
    fn test_palette_cycles() {
        let layers: Vec<Array2<f64>> = (0..7)
            .map(|_| array![[0.0, 1.0], [0.0, 0.0]])
            .collect();
        let reach = Reachability::from_layers(&layers, 2, 2.0).unwrap();
        assert_eq!(reach.colors()[6], PALETTE[0]);
    }
}
