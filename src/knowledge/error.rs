use thiserror::Error;

use super::graph::ConceptId;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("concept {0} was not found")]
    NotFound(ConceptId),
    #[error("invalid {what} payload: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
