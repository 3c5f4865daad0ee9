use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};

use super::error::KnowledgeError;
use super::graph::{ConceptDetail, ConceptId, ExtractionAck, ExtractionJob, KnowledgeGraph};
use super::parse::{
    parse_concept_detail, parse_extraction_ack, parse_extraction_job, parse_graph,
};

/// Operations the graph view needs from the knowledge backend.
///
/// Every call blocks, so callers run them on worker threads and never from
/// the frame callback.
pub trait KnowledgeApi: Send + Sync {
    fn fetch_graph(&self, limit: usize) -> Result<KnowledgeGraph, KnowledgeError>;

    fn fetch_concept_detail(&self, id: ConceptId) -> Result<ConceptDetail, KnowledgeError>;

    fn trigger_bulk_extraction(&self, limit: usize) -> Result<ExtractionAck, KnowledgeError>;

    fn extraction_status(&self, job_id: &str) -> Result<ExtractionJob, KnowledgeError>;
}

pub struct HttpKnowledgeApi {
    base_url: String,
    client: Client,
}

impl HttpKnowledgeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for the knowledge API")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/knowledge-graph{path}", self.base_url)
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<(StatusCode, String), KnowledgeError> {
        debug!("knowledge api request: {url}");
        let response = request.send().map_err(|source| KnowledgeError::Transport {
            url: url.to_owned(),
            source,
        })?;

        let status = response.status();
        let body = response.text().map_err(|source| KnowledgeError::Transport {
            url: url.to_owned(),
            source,
        })?;
        Ok((status, body))
    }

    fn expect_success(
        url: &str,
        status: StatusCode,
        body: String,
    ) -> Result<String, KnowledgeError> {
        if status.is_success() {
            Ok(body)
        } else {
            Err(KnowledgeError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body,
            })
        }
    }

    fn concept_detail_response(
        id: ConceptId,
        url: &str,
        status: StatusCode,
        body: String,
    ) -> Result<ConceptDetail, KnowledgeError> {
        if status == StatusCode::NOT_FOUND {
            return Err(KnowledgeError::NotFound(id));
        }
        parse_concept_detail(&Self::expect_success(url, status, body)?)
    }
}

impl KnowledgeApi for HttpKnowledgeApi {
    fn fetch_graph(&self, limit: usize) -> Result<KnowledgeGraph, KnowledgeError> {
        let url = self.url("");
        let request = self.client.get(&url).query(&[("limit", limit)]);
        let (status, body) = self.send(request, &url)?;
        parse_graph(&Self::expect_success(&url, status, body)?)
    }

    fn fetch_concept_detail(&self, id: ConceptId) -> Result<ConceptDetail, KnowledgeError> {
        let url = self.url(&format!("/concept/{id}"));
        let (status, body) = self.send(self.client.get(&url), &url)?;
        Self::concept_detail_response(id, &url, status, body)
    }

    fn trigger_bulk_extraction(&self, limit: usize) -> Result<ExtractionAck, KnowledgeError> {
        let url = self.url("/extract-all");
        let request = self.client.post(&url).query(&[("limit", limit)]);
        let (status, body) = self.send(request, &url)?;
        parse_extraction_ack(&Self::expect_success(&url, status, body)?)
    }

    fn extraction_status(&self, job_id: &str) -> Result<ExtractionJob, KnowledgeError> {
        let url = self.url(&format!("/extract-all/jobs/{job_id}"));
        let (status, body) = self.send(self.client.get(&url), &url)?;
        parse_extraction_job(&Self::expect_success(&url, status, body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpKnowledgeApi::new("http://localhost:8000/api/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            api.url("/concept/4"),
            "http://localhost:8000/api/knowledge-graph/concept/4"
        );
        assert_eq!(api.url(""), "http://localhost:8000/api/knowledge-graph");
    }

    #[test]
    fn non_success_status_keeps_body() {
        let error = HttpKnowledgeApi::expect_success(
            "http://x/knowledge-graph",
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_owned(),
        )
        .unwrap_err();

        match error {
            KnowledgeError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_concept_maps_to_not_found() {
        let error = HttpKnowledgeApi::concept_detail_response(
            7,
            "http://x/knowledge-graph/concept/7",
            StatusCode::NOT_FOUND,
            r#"{"detail": "Concept not found"}"#.to_owned(),
        )
        .unwrap_err();
        assert!(matches!(error, KnowledgeError::NotFound(7)));

        let detail = HttpKnowledgeApi::concept_detail_response(
            7,
            "http://x/knowledge-graph/concept/7",
            StatusCode::OK,
            r#"{"id": 7, "name": "Rust", "concept_type": "technology", "mention_count": 3, "reports": []}"#
                .to_owned(),
        )
        .unwrap();
        assert_eq!(detail.name, "Rust");
    }

}
