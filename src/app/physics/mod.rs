use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::knowledge::{ConceptId, GraphEdge};

use super::model::{Bounds, SimNode};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ForceParams {
    pub(in crate::app) center_gravity: f32,
    pub(in crate::app) repulsion_range: f32,
    pub(in crate::app) repulsion_strength: f32,
    pub(in crate::app) repulsion_scale: f32,
    pub(in crate::app) ideal_length: f32,
    pub(in crate::app) spring_strength: f32,
    pub(in crate::app) damping: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            center_gravity: 0.001,
            repulsion_range: 150.0,
            repulsion_strength: 0.5,
            repulsion_scale: 0.01,
            ideal_length: 100.0,
            spring_strength: 0.01,
            damping: 0.9,
        }
    }
}

/// Unit vector from `first` to `second` used when the two sit exactly on top
/// of each other. Swapping the arguments flips the direction.
fn coincident_direction(first: usize, second: usize) -> Vec2 {
    let (low, high) = (first.min(second), first.max(second));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if first <= second { direction } else { -direction }
}

fn separation(from: Vec2, to: Vec2, first: usize, second: usize) -> (Vec2, f32) {
    let delta = to - from;
    let distance = delta.length();
    if distance > 0.0 {
        (delta, distance)
    } else {
        (coincident_direction(first, second), 1.0)
    }
}

#[derive(Default)]
pub(in crate::app) struct ForceSimulator {
    params: ForceParams,
    index_by_id: HashMap<ConceptId, usize>,
}

impl ForceSimulator {
    pub(in crate::app) fn new(params: ForceParams) -> Self {
        Self {
            params,
            index_by_id: HashMap::new(),
        }
    }

    pub(in crate::app) fn step(
        &mut self,
        nodes: &mut [SimNode],
        edges: &[GraphEdge],
        bounds: Bounds,
    ) {
        let params = self.params;
        let node_count = nodes.len();
        if node_count == 0 {
            return;
        }

        let center = bounds.center();
        for node in nodes.iter_mut() {
            node.velocity += (center - node.position) * params.center_gravity;
        }

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let (delta, distance) = separation(nodes[i].position, nodes[j].position, i, j);
                if distance >= params.repulsion_range {
                    continue;
                }

                let force =
                    (params.repulsion_range - distance) / distance * params.repulsion_strength;
                let push = delta * force * params.repulsion_scale;
                nodes[i].velocity -= push;
                nodes[j].velocity += push;
            }
        }

        self.index_by_id.clear();
        self.index_by_id
            .extend(nodes.iter().enumerate().map(|(index, node)| (node.id, index)));

        for edge in edges {
            let (Some(&from), Some(&to)) = (
                self.index_by_id.get(&edge.source),
                self.index_by_id.get(&edge.target),
            ) else {
                continue;
            };
            if from == to {
                continue;
            }

            let (delta, distance) = separation(nodes[from].position, nodes[to].position, from, to);
            let direction = delta / distance;
            let force = (distance - params.ideal_length) * params.spring_strength;

            nodes[from].velocity += direction * force;
            nodes[to].velocity -= direction * force;
        }

        for node in nodes.iter_mut() {
            node.velocity *= params.damping;
            node.position += node.velocity;
            node.position = bounds.clamp(node.position);
        }
    }
}
