use std::collections::HashMap;

use eframe::egui::{self, PointerButton, Sense, Ui, vec2};

use super::super::model::Bounds;
use super::super::render_utils::{
    BACKGROUND, EDGE_STROKE, LABEL_COLOR, LABEL_FONT_SIZE, NODE_OUTLINE, type_color,
};
use super::super::scheduler::{LayoutSnapshot, SchedulerState};
use super::super::ViewModel;
use super::interaction::hit_test;
use super::surface::{PainterSurface, Surface};

pub(in crate::app) fn draw_layout(surface: &mut impl Surface, snapshot: &LayoutSnapshot) {
    surface.clear(BACKGROUND);

    let positions = snapshot
        .nodes
        .iter()
        .map(|node| (node.id, node.position))
        .collect::<HashMap<_, _>>();

    for edge in snapshot.edges.iter() {
        let (Some(&from), Some(&to)) = (positions.get(&edge.source), positions.get(&edge.target))
        else {
            continue;
        };
        surface.line(from, to, EDGE_STROKE);
    }

    for node in &snapshot.nodes {
        surface.circle(
            node.position,
            node.radius(),
            type_color(&node.concept_type),
            NODE_OUTLINE,
        );
    }

    for node in &snapshot.nodes {
        surface.label(
            node.position + vec2(0.0, node.radius() + 3.0),
            &node.name,
            LABEL_FONT_SIZE,
            LABEL_COLOR,
        );
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let bounds = Bounds::new(rect.width(), rect.height());

        if self.scheduler.state() == SchedulerState::Idle {
            self.scheduler.start(&self.model, bounds, self.placement);
        }
        self.scheduler.tick(bounds);
        if self.scheduler.is_running() {
            ui.ctx().request_repaint();
        }

        let snapshot = self.scheduler.snapshot();
        let painter = ui.painter_at(rect);
        draw_layout(&mut PainterSurface::new(&painter, rect), &snapshot);

        let hovering_node = response
            .hover_pos()
            .is_some_and(|pointer| hit_test(pointer - rect.min, &snapshot.nodes).is_some());
        if hovering_node {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.handle_click(pointer - rect.min, &snapshot);
        }
    }
}
