use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context};
use log::{error, info, warn};

use crate::config::Config;
use crate::knowledge::{ConceptDetail, ConceptId, KnowledgeApi};

mod extraction;
#[cfg(test)]
mod fake_api;
mod graph;
mod model;
mod physics;
mod render_utils;
mod scheduler;
mod ui;

use extraction::{ExtractionPolicy, ExtractionTask};
use model::{GraphModel, Placement};
use scheduler::AnimationScheduler;

type LoadResult = Result<GraphModel, String>;
type DetailResult = (ConceptId, Result<ConceptDetail, String>);

pub struct ConceptGraphApp {
    config: Config,
    api: Arc<dyn KnowledgeApi>,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
    pending_reload: bool,
    extraction: Option<ExtractionTask>,
    extraction_error: Option<String>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Empty,
    Error(String),
}

struct ViewModel {
    api: Arc<dyn KnowledgeApi>,
    model: GraphModel,
    placement: Placement,
    scheduler: AnimationScheduler,
    selected: Option<ConceptId>,
    detail: DetailState,
    detail_rx: Option<Receiver<DetailResult>>,
}

enum DetailState {
    Idle,
    Loading,
    Loaded(Box<ConceptDetail>),
    Failed(String),
}

impl ConceptGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        api: Arc<dyn KnowledgeApi>,
    ) -> Self {
        let state = Self::start_load(Arc::clone(&api), config.graph_limit);
        Self {
            config,
            api,
            state,
            reload_rx: None,
            pending_reload: false,
            extraction: None,
            extraction_error: None,
        }
    }

    fn spawn_load(api: Arc<dyn KnowledgeApi>, limit: usize) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = GraphModel::load(api.as_ref(), limit).map_err(|error| {
                error!("failed to load knowledge graph: {error}");
                error.to_string()
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(api: Arc<dyn KnowledgeApi>, limit: usize) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(api, limit),
        }
    }

    fn placement(&self) -> Placement {
        match self.config.placement_seed {
            Some(seed) => Placement::Seeded(seed),
            None => Placement::Entropy,
        }
    }

    fn loaded_state(&self, result: LoadResult) -> AppState {
        match result {
            Ok(model) if model.is_empty() => {
                info!("knowledge graph is empty");
                AppState::Empty
            }
            Ok(model) => AppState::Ready(Box::new(ViewModel::new(
                Arc::clone(&self.api),
                model,
                self.placement(),
            ))),
            Err(error) => AppState::Error(error),
        }
    }

    fn start_extraction(&mut self) {
        if self.extraction.is_some() {
            return;
        }

        info!(
            "starting bulk concept extraction for up to {} reports",
            self.config.extract_limit
        );
        self.extraction_error = None;
        self.extraction = Some(ExtractionTask::spawn(
            Arc::clone(&self.api),
            self.config.extract_limit,
            ExtractionPolicy::default(),
        ));
    }

    fn poll_extraction(&mut self) -> bool {
        let Some(task) = self.extraction.as_mut() else {
            return false;
        };

        match task.poll() {
            None => false,
            Some(Ok(())) => {
                info!("concept extraction finished; reloading graph");
                self.extraction = None;
                true
            }
            Some(Err(message)) => {
                warn!("concept extraction failed: {message}");
                self.extraction = None;
                self.extraction_error = Some(message);
                false
            }
        }
    }

    /// Records a reload request and polls the reload in flight, if any.
    /// Returns the next state once that reload has finished.
    fn poll_reload(&mut self, reload_requested: bool) -> Option<AppState> {
        self.pending_reload |= reload_requested;

        let rx = self.reload_rx.take()?;
        match rx.try_recv() {
            Ok(result) => Some(self.loaded_state(result)),
            Err(TryRecvError::Empty) => {
                self.reload_rx = Some(rx);
                None
            }
            Err(TryRecvError::Disconnected) => Some(AppState::Error(
                "Background load worker disconnected".to_owned(),
            )),
        }
    }

    /// Installs the next state, then starts a requested reload once no other
    /// load is in flight. A request that arrives mid-load is held until that
    /// load has finished.
    fn finish_frame(&mut self, transition: Option<AppState>) {
        if let Some(next_state) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.scheduler.cancel();
            }
            self.reload_rx = None;
            self.state = next_state;
        }

        let loading = matches!(self.state, AppState::Loading { .. });
        if self.pending_reload && !loading && self.reload_rx.is_none() {
            info!("reloading knowledge graph");
            self.pending_reload = false;
            self.reload_rx = Some(Self::spawn_load(
                Arc::clone(&self.api),
                self.config.graph_limit,
            ));
        }
    }

    fn is_busy(&self) -> bool {
        self.extraction.is_some()
            || self.pending_reload
            || self.reload_rx.is_some()
            || matches!(self.state, AppState::Loading { .. })
    }
}

impl eframe::App for ConceptGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut reload_requested = self.poll_extraction();
        let top_bar = self.draw_top_bar(ctx);
        let mut extract_requested = top_bar.extract;
        reload_requested |= top_bar.reload;

        let mut transition = None;
        let mut finished_load = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => finished_load = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Empty => {
                let is_extracting = self.extraction.is_some();
                egui::CentralPanel::default().show(ctx, |ui| {
                    if Self::draw_empty_state(ui, is_extracting) {
                        extract_requested = true;
                    }
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    retry = Self::draw_error_state(ui, error);
                });
                if retry {
                    transition = Some(Self::start_load(
                        Arc::clone(&self.api),
                        self.config.graph_limit,
                    ));
                }
            }
            AppState::Ready(model) => {
                model.show(ctx, self.reload_rx.is_some());
            }
        }

        if let Some(result) = finished_load {
            transition = Some(self.loaded_state(result));
        }

        if extract_requested {
            self.start_extraction();
        }

        if let Some(next_state) = self.poll_reload(reload_requested) {
            transition = Some(next_state);
        }
        self.finish_frame(transition);

        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fake_api::FakeKnowledgeApi;
    use crate::app::model::test_support::{graph, node};
    use crate::knowledge::{ExtractionAck, JobStatus};

    fn config(seed: Option<u64>) -> Config {
        Config {
            api_url: "http://localhost:8000/api".to_owned(),
            graph_limit: 150,
            extract_limit: 50,
            placement_seed: seed,
            request_timeout: Duration::from_secs(1),
        }
    }

    fn app(api: FakeKnowledgeApi, seed: Option<u64>) -> ConceptGraphApp {
        let api: Arc<dyn KnowledgeApi> = Arc::new(api);
        ConceptGraphApp {
            state: AppState::Empty,
            config: config(seed),
            api,
            reload_rx: None,
            pending_reload: false,
            extraction: None,
            extraction_error: None,
        }
    }

    fn wait_for_load(rx: Receiver<LoadResult>) -> LoadResult {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("load worker answered")
    }

    #[test]
    fn load_error_is_distinct_from_empty_graph() {
        let failing = app(FakeKnowledgeApi::default(), None);
        let result = wait_for_load(ConceptGraphApp::spawn_load(Arc::clone(&failing.api), 150));
        assert!(matches!(failing.loaded_state(result), AppState::Error(message) if message.contains("503")));

        let empty = app(FakeKnowledgeApi::default().with_graph(graph(vec![], vec![])), None);
        let result = wait_for_load(ConceptGraphApp::spawn_load(Arc::clone(&empty.api), 150));
        assert!(matches!(empty.loaded_state(result), AppState::Empty));
    }

    #[test]
    fn non_empty_graph_becomes_ready_with_configured_seed() {
        let ready = app(
            FakeKnowledgeApi::default().with_graph(graph(vec![node(1, 0), node(2, 1)], vec![])),
            Some(9),
        );
        let result = wait_for_load(ConceptGraphApp::spawn_load(Arc::clone(&ready.api), 150));

        match ready.loaded_state(result) {
            AppState::Ready(view) => {
                assert_eq!(view.placement, Placement::Seeded(9));
                assert_eq!(view.model.nodes().len(), 2);
                assert!(view.selected.is_none());
            }
            _ => panic!("expected ready state"),
        }
    }

    #[test]
    fn failed_extraction_keeps_message_and_skips_reload() {
        let mut app = app(FakeKnowledgeApi::default(), None);
        app.start_extraction();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut reload = false;
        while app.extraction.is_some() {
            reload |= app.poll_extraction();
            assert!(std::time::Instant::now() < deadline);
            thread::sleep(Duration::from_millis(5));
        }

        assert!(!reload);
        assert!(app.extraction_error.is_some());
    }

    fn finish_extraction(app: &mut ConceptGraphApp) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut reload = false;
        while app.extraction.is_some() {
            reload |= app.poll_extraction();
            assert!(std::time::Instant::now() < deadline);
            thread::sleep(Duration::from_millis(5));
        }
        reload
    }

    #[test]
    fn completed_extraction_reloads_after_stale_load_finishes() {
        let mut app = app(
            FakeKnowledgeApi::default()
                .with_graph(graph(vec![node(1, 0), node(2, 0)], vec![]))
                .with_ack(Ok(ExtractionAck {
                    message: "queued".to_owned(),
                    job_id: Some("job-7".to_owned()),
                }))
                .with_job(JobStatus::Completed, None),
            Some(1),
        );
        let (stale_tx, stale_rx) = mpsc::channel();
        app.reload_rx = Some(stale_rx);

        app.extraction = Some(ExtractionTask::spawn(
            Arc::clone(&app.api),
            5,
            ExtractionPolicy {
                poll_interval: Duration::ZERO,
                fallback_delay: Duration::ZERO,
                max_polls: 3,
            },
        ));
        assert!(finish_extraction(&mut app));

        let next = app.poll_reload(true);
        assert!(next.is_none());
        app.finish_frame(next);
        assert!(app.pending_reload);
        assert!(app.is_busy());

        stale_tx
            .send(Ok(GraphModel::from_graph(graph(vec![], vec![]))))
            .unwrap();
        let next = app.poll_reload(false);
        assert!(matches!(next, Some(AppState::Empty)));
        app.finish_frame(next);

        assert!(matches!(app.state, AppState::Empty));
        assert!(!app.pending_reload);
        let fresh = app.reload_rx.take().expect("second load spawned");
        let model = wait_for_load(fresh).unwrap();
        assert_eq!(model.nodes().len(), 2);
    }

    #[test]
    fn reload_requested_during_initial_load_waits_for_it() {
        let mut app = app(
            FakeKnowledgeApi::default().with_graph(graph(vec![node(1, 0)], vec![])),
            None,
        );
        let (_initial_tx, initial_rx) = mpsc::channel();
        app.state = AppState::Loading { rx: initial_rx };

        let next = app.poll_reload(true);
        app.finish_frame(next);
        assert!(app.reload_rx.is_none());
        assert!(app.pending_reload);

        let loaded = GraphModel::from_graph(graph(vec![node(1, 0)], vec![]));
        let ready = app.loaded_state(Ok(loaded));
        app.finish_frame(Some(ready));

        assert!(matches!(app.state, AppState::Ready(_)));
        assert!(!app.pending_reload);
        assert!(app.reload_rx.is_some());
    }

    #[test]
    fn idle_reload_starts_immediately() {
        let mut app = app(
            FakeKnowledgeApi::default().with_graph(graph(vec![node(3, 0)], vec![])),
            None,
        );

        let next = app.poll_reload(true);
        assert!(next.is_none());
        app.finish_frame(next);

        let rx = app.reload_rx.take().expect("reload spawned");
        assert_eq!(wait_for_load(rx).unwrap().nodes().len(), 1);
    }

}
