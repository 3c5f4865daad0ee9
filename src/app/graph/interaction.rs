use eframe::egui::Vec2;

use crate::knowledge::ConceptId;

use super::super::ViewModel;
use super::super::scheduler::{LayoutSnapshot, PlacedNode};

pub(in crate::app) fn hit_test(pointer: Vec2, nodes: &[PlacedNode]) -> Option<ConceptId> {
    nodes
        .iter()
        .find(|node| {
            let radius = node.radius();
            (pointer - node.position).length_sq() < radius * radius
        })
        .map(|node| node.id)
}

impl ViewModel {
    pub(in crate::app) fn handle_click(
        &mut self,
        pointer: Vec2,
        snapshot: &LayoutSnapshot,
    ) -> Option<ConceptId> {
        let hit = hit_test(pointer, &snapshot.nodes);
        self.set_selected(hit);
        hit
    }
}
