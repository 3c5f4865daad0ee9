use std::sync::Arc;

use serde::Deserialize;

pub type ConceptId = i64;

/// Category assigned to a concept by the extractor. Anything outside the
/// fixed set is kept verbatim so it can still be shown in the details panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ConceptType {
    Person,
    Organization,
    Technology,
    #[default]
    Concept,
    Event,
    Place,
    Product,
    Method,
    Other(String),
}

impl ConceptType {
    pub const KNOWN: [ConceptType; 8] = [
        Self::Person,
        Self::Organization,
        Self::Technology,
        Self::Concept,
        Self::Event,
        Self::Place,
        Self::Product,
        Self::Method,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "person" => Self::Person,
            "organization" => Self::Organization,
            "technology" => Self::Technology,
            "concept" => Self::Concept,
            "event" => Self::Event,
            "place" => Self::Place,
            "product" => Self::Product,
            "method" => Self::Method,
            _ => Self::Other(raw.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Technology => "technology",
            Self::Concept => "concept",
            Self::Event => "event",
            Self::Place => "place",
            Self::Product => "product",
            Self::Method => "method",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ConceptType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
    pub id: ConceptId,
    pub name: Arc<str>,
    #[serde(default, rename = "type")]
    pub concept_type: ConceptType,
    #[serde(default)]
    pub mention_count: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Directed relationship between two concept ids.
///
/// `strength` is carried through from the backend but the layout springs do
/// not scale by it; every edge pulls with the same stiffness.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
    pub source: ConceptId,
    pub target: ConceptId,
    #[serde(default = "default_relation", rename = "type")]
    pub relation: String,
    #[serde(default = "default_strength")]
    pub strength: f32,
}

fn default_relation() -> String {
    "related_to".to_owned()
}

fn default_strength() -> f32 {
    1.0
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default, rename = "links", alias = "edges")]
    pub edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RelatedReport {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_type: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ConceptDetail {
    pub id: ConceptId,
    pub name: String,
    #[serde(default)]
    pub concept_type: ConceptType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mention_count: u32,
    #[serde(default, alias = "related_reports")]
    pub reports: Vec<RelatedReport>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExtractionAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExtractionJob {
    pub status: JobStatus,
    #[serde(default)]
    pub progress_message: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}
