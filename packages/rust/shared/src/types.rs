//! Core domain types for the WiseWays question graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the hashed bag-of-words sketch stored on every node.
pub const EMBEDDING_DIM: usize = 100;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new time-sortable identifier.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a question node.
    NodeId
);
uuid_id!(
    /// Identifier of a link between two questions.
    LinkId
);
uuid_id!(
    /// Identifier of a thinking room.
    RoomId
);

// ---------------------------------------------------------------------------
// Taxonomies
// ---------------------------------------------------------------------------

/// Max-Neef human need assigned to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Need {
    Subsistence,
    Protection,
    Affection,
    Understanding,
    Participation,
    Creation,
    Identity,
    Freedom,
    Idleness,
    Unknown,
}

impl Need {
    /// All labels in display order, `Unknown` last.
    pub const ALL: [Need; 10] = [
        Need::Subsistence,
        Need::Protection,
        Need::Affection,
        Need::Understanding,
        Need::Participation,
        Need::Creation,
        Need::Identity,
        Need::Freedom,
        Need::Idleness,
        Need::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subsistence => "SUBSISTENCE",
            Self::Protection => "PROTECTION",
            Self::Affection => "AFFECTION",
            Self::Understanding => "UNDERSTANDING",
            Self::Participation => "PARTICIPATION",
            Self::Creation => "CREATION",
            Self::Identity => "IDENTITY",
            Self::Freedom => "FREEDOM",
            Self::Idleness => "IDLENESS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Need {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Being / having / doing / interacting axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Being,
    Having,
    Doing,
    Interacting,
    Unknown,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Being,
        Dimension::Having,
        Dimension::Doing,
        Dimension::Interacting,
        Dimension::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Being => "BEING",
            Self::Having => "HAVING",
            Self::Doing => "DOING",
            Self::Interacting => "INTERACTING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer status of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    #[default]
    Unanswered,
    InProgress,
    Answered,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unanswered => "unanswered",
            Self::InProgress => "in_progress",
            Self::Answered => "answered",
        }
    }
}

/// Causal pattern detected between two questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    ProblemSolution,
    CauseEffect,
    Dependency,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProblemSolution => "problem-solution",
            Self::CauseEffect => "cause-effect",
            Self::Dependency => "dependency",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A classified question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Trimmed question text.
    pub text: String,
    pub need: Need,
    pub dimension: Dimension,
    /// 0 = purely strategic, 1 = purely execution-oriented.
    pub pipeline_score: f64,
    /// Hashed bag-of-words sketch, [`EMBEDDING_DIM`] slots.
    pub embedding: Vec<f64>,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_answered_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// A weighted, unordered edge between two questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    /// The endpoint that was processed first.
    pub source: NodeId,
    pub target: NodeId,
    /// Composite score of all relatedness signals.
    pub weight: f64,
    pub relation_type: Option<RelationType>,
    /// Raw weighted-term cosine similarity, before weighting.
    pub semantic_score: f64,
    /// Human-readable summary of the dominant signals.
    pub reason: String,
}

impl Link {
    /// Whether `id` is one of the endpoints.
    pub fn touches(&self, id: &NodeId) -> bool {
        self.source == *id || self.target == *id
    }

    /// Order-independent key for the endpoint pair.
    pub fn pair_key(&self) -> (NodeId, NodeId) {
        pair_key(self.source, self.target)
    }
}

/// Order-independent key for an unordered node pair.
pub fn pair_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A user who joined a thinking room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: String,
    pub user_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Lifecycle state of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Open,
}

/// A cluster of strongly related questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// `{need of first member} Room {ordinal}`.
    pub name: String,
    /// Comma-joined common terms, or a fallback built from member text.
    pub theme: String,
    /// Member node ids, at least two.
    pub question_ids: Vec<NodeId>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    /// Cluster size as a percentage of all questions.
    pub strength: f64,
}

// ---------------------------------------------------------------------------
// GraphSnapshot
// ---------------------------------------------------------------------------

/// Full graph view handed to collaborators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub thinking_rooms: Vec<Room>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_roundtrip() {
        let id = NodeId::new();
        let parsed: NodeId = id.to_string().parse().expect("parse NodeId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn labels_serialize_as_upper_case() {
        let json = serde_json::to_string(&Need::Understanding).expect("serialize");
        assert_eq!(json, "\"UNDERSTANDING\"");
        let json = serde_json::to_string(&Dimension::Interacting).expect("serialize");
        assert_eq!(json, "\"INTERACTING\"");
        assert_eq!(Need::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn relation_and_status_wire_names() {
        let json = serde_json::to_string(&RelationType::ProblemSolution).expect("serialize");
        assert_eq!(json, "\"problem-solution\"");
        let json = serde_json::to_string(&QuestionStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"in_progress\"");
        let none: Option<RelationType> = serde_json::from_str("null").expect("deserialize");
        assert!(none.is_none());
    }

    #[test]
    fn link_endpoints() {
        let a = NodeId::new();
        let b = NodeId::new();
        let link = Link {
            id: LinkId::new(),
            source: b,
            target: a,
            weight: 0.4,
            relation_type: None,
            semantic_score: 0.0,
            reason: String::new(),
        };
        assert!(link.touches(&a));
        assert!(!link.touches(&NodeId::new()));
        assert_eq!(link.pair_key(), pair_key(a, b));
    }

    #[test]
    fn snapshot_serialization() {
        let snapshot = GraphSnapshot::default();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert!(json.contains("thinking_rooms"));
        let parsed: GraphSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert!(parsed.nodes.is_empty());
    }
}
