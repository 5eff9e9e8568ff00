use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Input flow graph, as decoded from the JSON document. Read-only after
/// decoding; the pipeline never mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Explicit layer assignment: outer index is the rank, inner lists the
    /// node ids in that rank. Takes precedence over `metadata.layers`.
    #[serde(default)]
    pub order: Option<Vec<Vec<String>>>,
    #[serde(default, rename = "rankSets")]
    pub rank_sets: Vec<RankSet>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub title: Option<Title>,
    #[serde(default)]
    pub style: Option<String>,
    /// Remaining attributes, kept for manual-position lookup by name.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A node title is either a plain string or a structured object carrying
/// a `label` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Text(String),
    Structured { label: String },
}

impl Title {
    pub fn label(&self) -> &str {
        match self {
            Title::Text(text) => text,
            Title::Structured { label } => label,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
    /// Flow quantity; required. Absence fails decoding, not layout.
    pub value: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: Option<LinkStyle>,
}

/// A link style is either a bare class name (`"process"`) or an attribute
/// object that may carry an explicit color.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LinkStyle {
    Class(String),
    Attrs(LinkStyleAttrs),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkStyleAttrs {
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// Same-rank constraint: the listed nodes are pinned to one layer.
#[derive(Debug, Clone, Deserialize)]
pub struct RankSet {
    #[serde(default, rename = "type")]
    pub set_type: Option<String>,
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<Vec<String>>>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Document title, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref()?.title.as_deref()
    }

    /// Layer assignment to feed the layout engine: explicit `order` wins
    /// over `metadata.layers`; `None` leaves the engine free to choose.
    pub fn ordering(&self) -> Option<&[Vec<String>]> {
        if let Some(order) = &self.order {
            return Some(order);
        }
        self.metadata.as_ref()?.layers.as_deref()
    }
}

/// Decode a graph from JSON text. Any shape violation, including a link
/// without a numeric `value`, is an `InvalidInput`. Negative values are
/// rejected here too: a flow cannot be drawn backwards, and dropping it
/// silently would misstate the totals.
pub fn decode_graph(input: &str) -> Result<Graph> {
    let graph: Graph =
        serde_json::from_str(input).map_err(|err| Error::InvalidInput(err.to_string()))?;
    for link in &graph.links {
        if link.value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "link {:?} -> {:?} has negative value {}",
                link.source, link.target, link.value
            )));
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_minimal_graph() {
        let graph = decode_graph(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"links":[{"source":"a","target":"b","value":10}]}"#,
        )
        .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].value, 10.0);
    }

    #[test]
    fn link_without_value_is_invalid_input() {
        let err = decode_graph(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"links":[{"source":"a","target":"b"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn negative_link_value_is_invalid_input() {
        let err = decode_graph(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],
                "links":[{"source":"a","target":"b","value":-3}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn structured_title_exposes_label() {
        let graph = decode_graph(
            r#"{"nodes":[{"id":"a","title":{"label":"Alpha"}}],"links":[]}"#,
        )
        .unwrap();
        assert_eq!(graph.nodes[0].title.as_ref().unwrap().label(), "Alpha");
    }

    #[test]
    fn explicit_order_beats_metadata_layers() {
        let graph = decode_graph(
            r#"{"nodes":[{"id":"a"}],"links":[],
                "order":[["a"]],
                "metadata":{"layers":[["x"]]}}"#,
        )
        .unwrap();
        assert_eq!(graph.ordering().unwrap()[0], vec!["a".to_string()]);
    }

    #[test]
    fn extra_attributes_survive_decoding() {
        let graph = decode_graph(
            r#"{"nodes":[{"id":"a","x":3.5,"depth":2}],"links":[]}"#,
        )
        .unwrap();
        let node = &graph.nodes[0];
        assert_eq!(node.extra.get("x").and_then(Value::as_f64), Some(3.5));
        assert_eq!(node.extra.get("depth").and_then(Value::as_f64), Some(2.0));
    }
}
