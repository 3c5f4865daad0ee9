use std::sync::Arc;

use eframe::egui::Vec2;
use log::debug;

use crate::knowledge::{ConceptId, ConceptType, GraphEdge};

use super::model::{Bounds, GraphModel, Placement, SimNode};
use super::physics::{ForceParams, ForceSimulator};
use super::render_utils::node_radius;

pub(in crate::app) const MAX_TICKS: u32 = 200;

#[derive(Clone, Debug)]
pub(in crate::app) struct PlacedNode {
    pub(in crate::app) id: ConceptId,
    pub(in crate::app) name: Arc<str>,
    pub(in crate::app) concept_type: ConceptType,
    pub(in crate::app) mention_count: u32,
    pub(in crate::app) position: Vec2,
}

impl PlacedNode {
    pub(in crate::app) fn radius(&self) -> f32 {
        node_radius(self.mention_count)
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct LayoutSnapshot {
    pub(in crate::app) tick: u32,
    pub(in crate::app) nodes: Vec<PlacedNode>,
    pub(in crate::app) edges: Arc<[GraphEdge]>,
}

impl LayoutSnapshot {
    pub(in crate::app) fn empty() -> Self {
        Self {
            tick: 0,
            nodes: Vec::new(),
            edges: Arc::from(Vec::new()),
        }
    }

    fn capture(tick: u32, nodes: &[SimNode], edges: &Arc<[GraphEdge]>) -> Self {
        Self {
            tick,
            nodes: nodes
                .iter()
                .map(|node| PlacedNode {
                    id: node.id,
                    name: Arc::clone(&node.name),
                    concept_type: node.concept_type.clone(),
                    mention_count: node.mention_count,
                    position: node.position,
                })
                .collect(),
            edges: Arc::clone(edges),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SchedulerState {
    Idle,
    Running,
    Settled,
    Cancelled,
}

pub(in crate::app) struct AnimationScheduler {
    simulator: ForceSimulator,
    nodes: Vec<SimNode>,
    edges: Arc<[GraphEdge]>,
    ticks: u32,
    state: SchedulerState,
    snapshot: Arc<LayoutSnapshot>,
}

impl AnimationScheduler {
    pub(in crate::app) fn new() -> Self {
        Self {
            simulator: ForceSimulator::new(ForceParams::default()),
            nodes: Vec::new(),
            edges: Arc::from(Vec::new()),
            ticks: 0,
            state: SchedulerState::Idle,
            snapshot: Arc::new(LayoutSnapshot::empty()),
        }
    }

    pub(in crate::app) fn start(&mut self, model: &GraphModel, bounds: Bounds, placement: Placement) {
        self.nodes = model.place(bounds, &mut placement.rng());
        self.edges = Arc::clone(model.edges());
        self.ticks = 0;
        self.state = if self.nodes.is_empty() {
            SchedulerState::Settled
        } else {
            SchedulerState::Running
        };
        self.publish();
        debug!(
            "layout started: {} nodes, {} edges, {placement:?}",
            self.nodes.len(),
            self.edges.len()
        );
    }

    pub(in crate::app) fn tick(&mut self, bounds: Bounds) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }

        self.simulator.step(&mut self.nodes, &self.edges, bounds);
        self.ticks += 1;
        self.publish();

        if self.ticks >= MAX_TICKS {
            self.state = SchedulerState::Settled;
            debug!("layout settled after {} ticks", self.ticks);
        }
        true
    }

    pub(in crate::app) fn cancel(&mut self) {
        if self.state == SchedulerState::Running {
            debug!("layout cancelled at tick {}", self.ticks);
            self.state = SchedulerState::Cancelled;
        }
    }

    pub(in crate::app) fn state(&self) -> SchedulerState {
        self.state
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub(in crate::app) fn ticks(&self) -> u32 {
        self.ticks
    }

    pub(in crate::app) fn snapshot(&self) -> Arc<LayoutSnapshot> {
        Arc::clone(&self.snapshot)
    }

    fn publish(&mut self) {
        self.snapshot = Arc::new(LayoutSnapshot::capture(self.ticks, &self.nodes, &self.edges));
    }
}
