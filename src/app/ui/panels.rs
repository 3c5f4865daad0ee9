use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Align, Color32, Context, Layout, Sense, Ui, vec2};

use crate::knowledge::{ConceptId, ConceptType, KnowledgeApi};

use super::super::model::{GraphModel, Placement};
use super::super::render_utils::type_color;
use super::super::scheduler::{AnimationScheduler, MAX_TICKS, SchedulerState};
use super::super::{AppState, ConceptGraphApp, DetailState, ViewModel};

pub(in crate::app) const ERROR_COLOR: Color32 = Color32::from_rgb(248, 113, 113);

#[derive(Default)]
pub(in crate::app) struct TopBarAction {
    pub(in crate::app) extract: bool,
    pub(in crate::app) reload: bool,
}

fn legend_entry(ui: &mut Ui, color: Color32, label: &str) {
    let (rect, _response) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
    ui.painter().circle_filled(rect.center(), 6.0, color);
    ui.label(label);
    ui.add_space(8.0);
}

impl ConceptGraphApp {
    pub(in crate::app) fn draw_top_bar(&self, ctx: &Context) -> TopBarAction {
        let mut action = TopBarAction::default();
        let is_extracting = self.extraction.is_some();
        let can_reload =
            !matches!(self.state, AppState::Loading { .. }) && self.reload_rx.is_none();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Knowledge Graph");
                    ui.separator();

                    let extract_label = if is_extracting {
                        "Extracting..."
                    } else {
                        "Extract from All Reports"
                    };
                    if ui
                        .add_enabled(!is_extracting, egui::Button::new(extract_label))
                        .clicked()
                    {
                        action.extract = true;
                    }
                    if ui
                        .add_enabled(can_reload, egui::Button::new("Reload graph"))
                        .clicked()
                    {
                        action.reload = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(task) = &self.extraction
                            && let Some(progress) = task.progress()
                        {
                            ui.label(progress);
                        } else if let Some(error) = &self.extraction_error {
                            ui.colored_label(ERROR_COLOR, format!("Extraction failed: {error}"));
                        }
                    });
                });

                ui.label(
                    "Explore connections between concepts across all your analyzed content. \
                     Click on a node to see details and related reports.",
                );
                ui.horizontal_wrapped(|ui| {
                    for concept_type in &ConceptType::KNOWN {
                        legend_entry(ui, type_color(concept_type), concept_type.label());
                    }
                });
                ui.add_space(4.0);
            });

        action
    }

    pub(in crate::app) fn draw_empty_state(ui: &mut Ui, is_extracting: bool) -> bool {
        let mut clicked = false;
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.label("No concepts extracted yet.");
            ui.add_space(8.0);
            let label = if is_extracting {
                "Extracting..."
            } else {
                "Extract Concepts from Reports"
            };
            clicked = ui
                .add_enabled(!is_extracting, egui::Button::new(label))
                .clicked();
        });
        clicked
    }

    pub(in crate::app) fn draw_error_state(ui: &mut Ui, error: &str) -> bool {
        ui.heading("Failed to load knowledge graph");
        ui.add_space(6.0);
        ui.colored_label(ERROR_COLOR, error);
        ui.add_space(10.0);
        ui.button("Retry").clicked()
    }
}

impl ViewModel {
    pub(in crate::app) fn new(
        api: Arc<dyn KnowledgeApi>,
        model: GraphModel,
        placement: Placement,
    ) -> Self {
        Self {
            api,
            model,
            placement,
            scheduler: AnimationScheduler::new(),
            selected: None,
            detail: DetailState::Idle,
            detail_rx: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, is_reloading: bool) {
        self.poll_detail();

        egui::TopBottomPanel::bottom("stats")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("{} concepts", self.model.nodes().len()));
                    ui.label(format!("{} connections", self.model.edges().len()));
                    ui.separator();
                    ui.label(self.layout_status_text());
                });
            });

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_reloading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });

        if self.detail_rx.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn layout_status_text(&self) -> String {
        match self.scheduler.state() {
            SchedulerState::Idle => "layout: waiting".to_owned(),
            SchedulerState::Running => {
                format!("layout: tick {}/{MAX_TICKS}", self.scheduler.ticks())
            }
            SchedulerState::Settled => "layout: settled".to_owned(),
            SchedulerState::Cancelled => {
                format!("layout: stopped at tick {}", self.scheduler.ticks())
            }
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<ConceptId>) {
        let Some(id) = selected else {
            self.selected = None;
            self.detail = DetailState::Idle;
            self.detail_rx = None;
            return;
        };

        let already_shown = self.selected == Some(id)
            && matches!(self.detail, DetailState::Loading | DetailState::Loaded(_));
        if already_shown {
            return;
        }

        self.selected = Some(id);
        self.request_detail(id);
    }
}
