use serde::de::DeserializeOwned;

use super::error::KnowledgeError;
use super::graph::{ConceptDetail, ExtractionAck, ExtractionJob, KnowledgeGraph};

fn decode<T: DeserializeOwned>(raw: &str, what: &'static str) -> Result<T, KnowledgeError> {
    serde_json::from_str(raw).map_err(|source| KnowledgeError::Decode { what, source })
}

pub(super) fn parse_graph(raw: &str) -> Result<KnowledgeGraph, KnowledgeError> {
    decode(raw, "knowledge graph")
}

pub(super) fn parse_concept_detail(raw: &str) -> Result<ConceptDetail, KnowledgeError> {
    decode(raw, "concept detail")
}

pub(super) fn parse_extraction_ack(raw: &str) -> Result<ExtractionAck, KnowledgeError> {
    if raw.trim().is_empty() {
        return Ok(ExtractionAck::default());
    }
    decode(raw, "extraction acknowledgement")
}

pub(super) fn parse_extraction_job(raw: &str) -> Result<ExtractionJob, KnowledgeError> {
    decode(raw, "extraction job")
}
