//! The spring layout integrator.
//!
//! Every step computes, for each node `a`, the sum of
//!
//! ```text
//! repulsion:  R · Σ_b (p_b − p_a) / d³
//! springs:   −S · Σ_b (p_b − p_a) · W[a,b] · (d − rest_length)
//! gravity:    G · p_a / Σ_all |p|²
//! ```
//!
//! and advances the state with an explicit Euler step:
//! `v ← clamp((v − F·dt) · damping)`, then `p ← clamp(p + v·dt)`.
//! A pinned node has its state replaced by its frozen snapshot between
//! the two halves, so it does not move but still acts on the others.
//!

use std::f64::consts::TAU;

use log::trace;
use log::warn;
use ndarray::Array2;

use crate::Edge;
use crate::LayoutError;
use crate::LayoutParams;
use crate::Reachability;
use crate::Rgba;


/// Distance used in place of zero for coincident nodes.
pub const SELF_DISTANCE: f64 = 1.0;

/// Position and velocity of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl NodeState {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, vx: 0.0, vy: 0.0 }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The rectangle `[-w/2, w/2] × [-h/2, h/2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    half_width: f64,
    half_height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            half_width: width.abs() / 2.0,
            half_height: height.abs() / 2.0,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.half_width && y.abs() <= self.half_height
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(-self.half_width, self.half_width),
            y.clamp(-self.half_height, self.half_height),
        )
    }
}

/// The two endpoints of an edge at the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pin {
    index: usize,
    frozen: NodeState,
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    params: LayoutParams,
    bounds: Bounds,
    nodes: Vec<NodeState>,
    reach: Reachability,
    segments: Vec<Segment>,
    pin: Option<Pin>,
}

impl LayoutEngine {
    /// Nodes at rest on a circle of radius `(width / 2) / 1.4` around the
    /// origin, without any connections.
    pub fn new(node_count: usize, width: f64, height: f64, params: LayoutParams) -> Self {
        let bounds = Bounds::new(width, height);
        let radius = bounds.half_width() / 1.4;
        let nodes = (0..node_count)
            .map(|k| {
                let angle = TAU * k as f64 / node_count as f64;
                NodeState::at(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();

        Self {
            params,
            bounds,
            nodes,
            reach: Reachability::empty(node_count),
            segments: Vec::new(),
            pin: None,
        }
    }

    /// Replace the initial placement. A hint of the wrong size is ignored.
    pub fn with_positions(mut self, positions: &[(f64, f64)]) -> Self {
        if positions.len() != self.nodes.len() {
            warn!(
                "Ignoring {} initial positions for {} nodes.",
                positions.len(),
                self.nodes.len()
            );
            return self;
        }
        for (node, &(x, y)) in self.nodes.iter_mut().zip(positions) {
            *node = NodeState::at(x, y);
        }
        self.refresh_segments();
        self
    }

    pub fn with_layers(mut self, layers: &[Array2<f64>]) -> Result<Self, LayoutError> {
        self.set_adjacency(layers)?;
        Ok(self)
    }

    /// Replace all connections. Node states are left untouched.
    pub fn set_adjacency(&mut self, layers: &[Array2<f64>]) -> Result<(), LayoutError> {
        self.reach = Reachability::from_layers(layers, self.nodes.len(), self.params.layer_base)?;
        self.refresh_segments();
        Ok(())
    }

    /// Advance the simulation by `dt`.
    pub fn step(&mut self, dt: f64) {
        let p = self.params;
        let weights = self.reach.merged();
        let spread: f64 = self.nodes.iter().map(|s| s.x * s.x + s.y * s.y).sum();

        let forces: Vec<(f64, f64)> = self.nodes.iter()
            .enumerate()
            .map(|(a, na)| {
                let (mut ex, mut ey) = (0.0, 0.0);
                let (mut sx, mut sy) = (0.0, 0.0);
                for (b, nb) in self.nodes.iter().enumerate() {
                    if a == b {
                        continue;
                    }
                    let (dx, dy) = (nb.x - na.x, nb.y - na.y);
                    let mut dist = dx.hypot(dy);
                    if dist == 0.0 {
                        dist = SELF_DISTANCE;
                    }
                    let inv3 = 1.0 / (dist * dist * dist);
                    ex += dx * inv3;
                    ey += dy * inv3;

                    let w = weights[(a, b)];
                    if w != 0.0 {
                        let stretch = w * (dist - p.rest_length);
                        sx -= dx * stretch;
                        sy -= dy * stretch;
                    }
                }
                let (gx, gy) = if spread > 0.0 {
                    (na.x / spread * p.gravity, na.y / spread * p.gravity)
                } else {
                    (0.0, 0.0)
                };
                (
                    ex * p.repulsion + sx * p.spring + gx,
                    ey * p.repulsion + sy * p.spring + gy,
                )
            })
            .collect();

        let limit = p.max_speed.abs();
        for (node, (fx, fy)) in self.nodes.iter_mut().zip(forces) {
            node.vx = ((node.vx - fx * dt) * p.damping).clamp(-limit, limit);
            node.vy = ((node.vy - fy * dt) * p.damping).clamp(-limit, limit);
        }

        // The pin overrides whatever the forces did to that node.
        if let Some(pin) = self.pin {
            self.nodes[pin.index] = pin.frozen;
        }

        let bounds = self.bounds;
        for node in self.nodes.iter_mut() {
            (node.x, node.y) = bounds.clamp(node.x + dt * node.vx, node.y + dt * node.vy);
        }
        self.refresh_segments();

        trace!("Layout step dt={dt}: kinetic energy {:.3}.", self.kinetic_energy());
    }

    /// Pin the node nearest to `(x, y)`, if it lies within the pin radius.
    pub fn pin(&mut self, x: f64, y: f64) -> Option<usize> {
        let (index, d2) = self.nodes.iter()
            .enumerate()
            .map(|(k, s)| (k, (s.x - x).powi(2) + (s.y - y).powi(2)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if d2 >= self.params.pin_radius_sq {
            return None;
        }
        let frozen = NodeState { vx: 0.0, vy: 0.0, ..self.nodes[index] };
        self.pin = Some(Pin { index, frozen });
        Some(index)
    }

    /// Drag the pinned node; no-op without a pin.
    pub fn move_pinned(&mut self, dx: f64, dy: f64) {
        if let Some(pin) = &mut self.pin {
            pin.frozen.x += dx;
            pin.frozen.y += dy;
        }
    }

    pub fn release(&mut self) {
        self.pin = None;
    }

    /// New bounding box; positions are clamped on the next step.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Bounds::new(width, height);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.nodes.iter().map(NodeState::position).collect()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn edges(&self) -> &[Edge] {
        self.reach.edges()
    }

    pub fn edge_colors(&self) -> &[Rgba] {
        self.reach.colors()
    }

    pub fn reachability(&self) -> &Reachability {
        &self.reach
    }

    /// Index of the pinned node, if any.
    pub fn pinned(&self) -> Option<usize> {
        self.pin.map(|pin| pin.index)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Sum of `(vx² + vy²) / 2` over all nodes.
    pub fn kinetic_energy(&self) -> f64 {
        self.nodes.iter().map(|s| 0.5 * (s.vx * s.vx + s.vy * s.vy)).sum()
    }

    fn refresh_segments(&mut self) {
        let nodes = &self.nodes;
        self.segments = self.reach.edges().iter()
            .map(|e| Segment {
                from: nodes[e.source].position(),
                to: nodes[e.target].position(),
            })
            .collect();
    }
}
