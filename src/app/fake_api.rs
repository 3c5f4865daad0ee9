use std::collections::VecDeque;
use std::sync::Mutex;

use crate::knowledge::{
    ConceptDetail, ConceptId, ConceptType, ExtractionAck, ExtractionJob, JobStatus, KnowledgeApi,
    KnowledgeError, KnowledgeGraph,
};

/// Scripted stand-in for the knowledge backend. Unscripted calls answer with
/// a 503 status error.
#[derive(Default)]
pub(in crate::app) struct FakeKnowledgeApi {
    graph: Mutex<Option<KnowledgeGraph>>,
    failing_details: Vec<ConceptId>,
    ack: Mutex<Option<Result<ExtractionAck, KnowledgeError>>>,
    jobs: Mutex<VecDeque<ExtractionJob>>,
    status_calls: Mutex<usize>,
    extract_limit: Mutex<Option<usize>>,
}

fn unavailable(url: &str) -> KnowledgeError {
    KnowledgeError::Status {
        url: url.to_owned(),
        status: 503,
        body: "unscripted".to_owned(),
    }
}

impl FakeKnowledgeApi {
    pub(in crate::app) fn with_graph(self, graph: KnowledgeGraph) -> Self {
        *self.graph.lock().unwrap() = Some(graph);
        self
    }

    pub(in crate::app) fn with_failing_detail(mut self, id: ConceptId) -> Self {
        self.failing_details.push(id);
        self
    }

    pub(in crate::app) fn with_ack(self, ack: Result<ExtractionAck, KnowledgeError>) -> Self {
        *self.ack.lock().unwrap() = Some(ack);
        self
    }

    pub(in crate::app) fn with_job(self, status: JobStatus, progress: Option<&str>) -> Self {
        self.jobs.lock().unwrap().push_back(ExtractionJob {
            status,
            progress_message: progress.map(str::to_owned),
            error_message: None,
        });
        self
    }

    pub(in crate::app) fn with_failed_job(self, message: &str) -> Self {
        self.jobs.lock().unwrap().push_back(ExtractionJob {
            status: JobStatus::Failed,
            progress_message: None,
            error_message: Some(message.to_owned()),
        });
        self
    }

    pub(in crate::app) fn status_calls(&self) -> usize {
        *self.status_calls.lock().unwrap()
    }

    pub(in crate::app) fn last_extract_limit(&self) -> Option<usize> {
        *self.extract_limit.lock().unwrap()
    }
}

impl KnowledgeApi for FakeKnowledgeApi {
    fn fetch_graph(&self, _limit: usize) -> Result<KnowledgeGraph, KnowledgeError> {
        self.graph
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| unavailable("/knowledge-graph"))
    }

    fn fetch_concept_detail(&self, id: ConceptId) -> Result<ConceptDetail, KnowledgeError> {
        if self.failing_details.contains(&id) {
            return Err(unavailable("/knowledge-graph/concept"));
        }

        Ok(ConceptDetail {
            id,
            name: format!("concept-{id}"),
            concept_type: ConceptType::Concept,
            description: None,
            mention_count: 1,
            reports: Vec::new(),
        })
    }

    fn trigger_bulk_extraction(&self, limit: usize) -> Result<ExtractionAck, KnowledgeError> {
        *self.extract_limit.lock().unwrap() = Some(limit);
        self.ack
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(unavailable("/knowledge-graph/extract-all")))
    }

    fn extraction_status(&self, _job_id: &str) -> Result<ExtractionJob, KnowledgeError> {
        *self.status_calls.lock().unwrap() += 1;
        self.jobs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| unavailable("/knowledge-graph/extract-all/jobs"))
    }
}
