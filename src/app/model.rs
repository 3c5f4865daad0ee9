use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Vec2, vec2};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::knowledge::{
    ConceptId, ConceptType, GraphEdge, GraphNode, KnowledgeApi, KnowledgeError, KnowledgeGraph,
};

pub(in crate::app) const MARGIN: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Bounds {
    pub(in crate::app) width: f32,
    pub(in crate::app) height: f32,
}

impl Bounds {
    pub(in crate::app) fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub(in crate::app) fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    /// Upper limit for a coordinate on an axis of the given extent. Canvases
    /// narrower than two margins collapse onto the margin line.
    fn axis_max(extent: f32) -> f32 {
        (extent - MARGIN).max(MARGIN)
    }

    pub(in crate::app) fn clamp(self, position: Vec2) -> Vec2 {
        vec2(
            position.x.clamp(MARGIN, Self::axis_max(self.width)),
            position.y.clamp(MARGIN, Self::axis_max(self.height)),
        )
    }

    #[cfg(test)]
    pub(in crate::app) fn contains(self, position: Vec2) -> bool {
        (MARGIN..=Self::axis_max(self.width)).contains(&position.x)
            && (MARGIN..=Self::axis_max(self.height)).contains(&position.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Placement {
    Seeded(u64),
    Entropy,
}

impl Placement {
    pub(in crate::app) fn rng(self) -> StdRng {
        match self {
            Self::Seeded(seed) => StdRng::seed_from_u64(seed),
            Self::Entropy => StdRng::from_entropy(),
        }
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct SimNode {
    pub(in crate::app) id: ConceptId,
    pub(in crate::app) name: Arc<str>,
    pub(in crate::app) concept_type: ConceptType,
    pub(in crate::app) mention_count: u32,
    pub(in crate::app) position: Vec2,
    pub(in crate::app) velocity: Vec2,
}

pub(in crate::app) struct GraphModel {
    nodes: Vec<GraphNode>,
    edges: Arc<[GraphEdge]>,
}

impl GraphModel {
    pub(in crate::app) fn load(
        api: &dyn KnowledgeApi,
        max_nodes: usize,
    ) -> Result<Self, KnowledgeError> {
        let graph = api.fetch_graph(max_nodes)?;
        info!(
            "loaded knowledge graph: {} concepts, {} connections",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Self::from_graph(graph))
    }

    pub(in crate::app) fn from_graph(graph: KnowledgeGraph) -> Self {
        let model = Self {
            nodes: graph.nodes,
            edges: graph.edges.into(),
        };

        let dangling = model.dangling_edge_count();
        if dangling > 0 {
            warn!("{dangling} connection(s) reference concepts outside this graph and will be skipped");
        }

        model
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(in crate::app) fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &Arc<[GraphEdge]> {
        &self.edges
    }

    pub(in crate::app) fn node(&self, id: ConceptId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub(in crate::app) fn dangling_edge_count(&self) -> usize {
        let known = self.nodes.iter().map(|node| node.id).collect::<HashSet<_>>();
        self.edges
            .iter()
            .filter(|edge| !known.contains(&edge.source) || !known.contains(&edge.target))
            .count()
    }

    pub(in crate::app) fn place(&self, bounds: Bounds, rng: &mut impl Rng) -> Vec<SimNode> {
        let max_x = Bounds::axis_max(bounds.width);
        let max_y = Bounds::axis_max(bounds.height);

        self.nodes
            .iter()
            .map(|node| SimNode {
                id: node.id,
                name: Arc::clone(&node.name),
                concept_type: node.concept_type.clone(),
                mention_count: node.mention_count,
                position: vec2(rng.gen_range(MARGIN..=max_x), rng.gen_range(MARGIN..=max_y)),
                velocity: Vec2::ZERO,
            })
            .collect()
    }
}

#[cfg(test)]
pub(in crate::app) mod test_support {
    use std::sync::Arc;

    use crate::knowledge::{ConceptId, ConceptType, GraphEdge, GraphNode, KnowledgeGraph};

    pub(in crate::app) fn node(id: ConceptId, mention_count: u32) -> GraphNode {
        GraphNode {
            id,
            name: Arc::from(format!("concept-{id}")),
            concept_type: ConceptType::Concept,
            mention_count,
            description: None,
        }
    }

    pub(in crate::app) fn edge(source: ConceptId, target: ConceptId) -> GraphEdge {
        GraphEdge {
            source,
            target,
            relation: "related_to".to_owned(),
            strength: 1.0,
        }
    }

    pub(in crate::app) fn graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> KnowledgeGraph {
        KnowledgeGraph { nodes, edges }
    }
}
