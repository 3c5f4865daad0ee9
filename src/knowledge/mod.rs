mod client;
mod error;
mod graph;
mod parse;

pub use client::{HttpKnowledgeApi, KnowledgeApi};
pub use error::KnowledgeError;
pub use graph::{
    ConceptDetail, ConceptId, ConceptType, ExtractionAck, ExtractionJob, GraphEdge, GraphNode,
    JobStatus, KnowledgeGraph,
};
