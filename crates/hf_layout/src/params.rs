use serde::Deserialize;
use serde::Serialize;


/// Force constants and limits of the spring layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Strength of the pull towards the origin.
    pub gravity: f64,
    /// Strength of the pairwise node repulsion.
    pub repulsion: f64,
    /// Spring constant of the edges.
    pub spring: f64,
    /// Length at which an edge exerts no force.
    pub rest_length: f64,
    /// Velocity factor applied after every step.
    pub damping: f64,
    /// Component-wise velocity limit.
    pub max_speed: f64,
    /// Squared distance within which `pin` grabs a node.
    pub pin_radius_sq: f64,
    /// Layer `i` is weighted by `layer_base^i` in the merged graph.
    pub layer_base: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            gravity: 100.0,
            repulsion: 10000.0,
            spring: 0.01,
            rest_length: 30.0,
            damping: 0.98,
            max_speed: 20.0,
            pin_radius_sq: 100.0,
            layer_base: 20.0,
        }
    }
}
