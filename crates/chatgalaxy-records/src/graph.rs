//! Co-occurrence graph wire shape: `{nodes: [...], links: [...]}`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Reference from a link to a node id.
///
/// Serialized as the plain id. On read it also accepts a bare number or an
/// object carrying an `id` field, which is what a force-layout leaves behind
/// after replacing endpoints with node references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(pub String);

impl NodeRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        NodeRef(id.to_string())
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        NodeRef(index.to_string())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEndpoint {
    Id(RawId),
    Node { id: RawId },
}

impl Serialize for NodeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = match RawEndpoint::deserialize(deserializer)? {
            RawEndpoint::Id(id) => id,
            RawEndpoint::Node { id } => id,
        };
        Ok(NodeRef(id.into_string()))
    }
}

/// A keyword node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    /// Keyword frequency
    #[serde(default, alias = "value")]
    pub count: u64,
    /// Display size
    #[serde(default)]
    pub val: f64,
    /// Earliest timestamp (seconds) of a message carrying this keyword
    #[serde(default, alias = "firstSeen")]
    pub first_seen: i64,
}

/// A weighted co-occurrence edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: NodeRef,
    pub target: NodeRef,
    pub value: u64,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl Graph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
