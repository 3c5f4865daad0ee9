use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{Color32, RichText, Ui};
use log::{debug, warn};

use crate::knowledge::{ConceptId, KnowledgeApi};

use super::super::render_utils::type_color;
use super::super::{DetailResult, DetailState, ViewModel};
use super::panels::ERROR_COLOR;

const MAX_LISTED_REPORTS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Connection {
    pub(in crate::app) other: ConceptId,
    pub(in crate::app) other_name: Arc<str>,
    pub(in crate::app) relation: String,
    pub(in crate::app) strength: f32,
    pub(in crate::app) outgoing: bool,
}

fn spawn_detail(api: Arc<dyn KnowledgeApi>, id: ConceptId) -> Receiver<DetailResult> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = api.fetch_concept_detail(id).map_err(|error| {
            warn!("failed to load details for concept {id}: {error}");
            error.to_string()
        });
        let _ = tx.send((id, result));
    });

    rx
}

impl ViewModel {
    pub(in crate::app) fn request_detail(&mut self, id: ConceptId) {
        debug!("requesting details for concept {id}");
        self.detail = DetailState::Loading;
        self.detail_rx = Some(spawn_detail(Arc::clone(&self.api), id));
    }

    fn retry_detail(&mut self) {
        if let Some(id) = self.selected {
            self.request_detail(id);
        }
    }

    pub(in crate::app) fn poll_detail(&mut self) {
        let Some(rx) = self.detail_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => self.apply_detail_result(result),
            Err(TryRecvError::Empty) => self.detail_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                if self.selected.is_some() {
                    self.detail = DetailState::Failed("Detail worker disconnected".to_owned());
                }
            }
        }
    }

    /// Answers for a concept that is no longer selected are dropped. A failed
    /// fetch keeps the selection so the panel can offer a retry.
    pub(in crate::app) fn apply_detail_result(&mut self, (id, result): DetailResult) {
        if self.selected != Some(id) {
            debug!("dropping stale details for concept {id}");
            return;
        }

        self.detail = match result {
            Ok(detail) => DetailState::Loaded(Box::new(detail)),
            Err(message) => DetailState::Failed(message),
        };
    }

    pub(in crate::app) fn connections(&self, id: ConceptId) -> Vec<Connection> {
        self.model
            .edges()
            .iter()
            .filter_map(|edge| {
                let (other, outgoing) = if edge.source == id {
                    (edge.target, true)
                } else if edge.target == id {
                    (edge.source, false)
                } else {
                    return None;
                };
                let other_name = self.model.node(other)?.name.clone();
                Some(Connection {
                    other,
                    other_name,
                    relation: edge.relation.clone(),
                    strength: edge.strength,
                    outgoing,
                })
            })
            .collect()
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Concept Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected else {
            ui.label("Click a node to see details.");
            return;
        };

        let mut retry = false;
        match &self.detail {
            DetailState::Idle | DetailState::Loading => {
                if let Some(node) = self.model.node(selected_id) {
                    ui.label(RichText::new(node.name.as_ref()).strong());
                    if let Some(description) = &node.description {
                        ui.label(description);
                    }
                }
                ui.spinner();
            }
            DetailState::Loaded(detail) => {
                ui.label(RichText::new(&detail.name).size(18.0).strong());
                ui.label(
                    RichText::new(detail.concept_type.label())
                        .color(Color32::WHITE)
                        .background_color(type_color(&detail.concept_type)),
                );
                if let Some(description) = &detail.description {
                    ui.add_space(4.0);
                    ui.label(description);
                }
                ui.add_space(4.0);
                ui.label(format!("Mentioned in {} report(s)", detail.mention_count));

                if !detail.reports.is_empty() {
                    ui.separator();
                    ui.label(RichText::new("Related Reports").strong());
                    for report in detail.reports.iter().take(MAX_LISTED_REPORTS) {
                        ui.push_id(report.id, |ui| {
                            ui.label(&report.title);
                            ui.small(&report.content_type);
                        });
                    }
                }
            }
            DetailState::Failed(message) => {
                ui.colored_label(ERROR_COLOR, format!("Failed to load concept details: {message}"));
                retry = ui.button("Retry").clicked();
            }
        }

        ui.separator();
        let connections = self.connections(selected_id);
        ui.label(RichText::new(format!("Connections ({})", connections.len())).strong());
        if connections.is_empty() {
            ui.label("No connections in the current graph.");
        }
        let mut navigate = None;
        for connection in &connections {
            let arrow = if connection.outgoing { "->" } else { "<-" };
            ui.horizontal(|ui| {
                ui.label(arrow);
                if ui.link(connection.other_name.as_ref()).clicked() {
                    navigate = Some(connection.other);
                }
                ui.small(format!(
                    "{}, strength {:.2}",
                    connection.relation, connection.strength
                ));
            });
        }

        ui.add_space(8.0);
        let close = ui.button("Close").clicked();

        if retry {
            self.retry_detail();
        }
        if close {
            self.set_selected(None);
        } else if navigate.is_some() {
            self.set_selected(navigate);
        }
    }
}
