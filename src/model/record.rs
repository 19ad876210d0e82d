// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialized form of a workflow, as handed to the persistence collaborator and MCP clients.
//!
//! Records keep ids as plain strings; conversion into a `GraphDocument` validates them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{GraphDocument, WorkflowMeta};
use super::edge::{Edge, EdgeStyle};
use super::geometry::Point;
use super::ids::{EdgeId, IdError, NodeId};
use super::node::{Node, NodeData, NodeKind, NodeStyle};
use super::TRACING_TARGET;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Point,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invalid node id {id:?}: {source}")]
    InvalidNodeId { id: String, source: IdError },
    #[error("invalid edge id {id:?}: {source}")]
    InvalidEdgeId { id: String, source: IdError },
    #[error("duplicate node id {0:?}")]
    DuplicateNodeId(String),
    #[error("duplicate edge id {0:?}")]
    DuplicateEdgeId(String),
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            kind: node.kind(),
            position: node.position(),
            data: node.data().to_wire(),
            style: node.style().cloned(),
        }
    }
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id().to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            label: edge.label().map(ToOwned::to_owned),
            animated: edge.animated(),
            style: edge.style().cloned(),
        }
    }
}

impl From<&GraphDocument> for WorkflowRecord {
    fn from(doc: &GraphDocument) -> Self {
        Self {
            name: doc.meta().name.clone(),
            description: doc.meta().description.clone(),
            nodes: doc.nodes().map(NodeRecord::from).collect(),
            edges: doc.edges().map(EdgeRecord::from).collect(),
        }
    }
}

impl NodeRecord {
    pub fn into_node(self) -> Result<Node, RecordError> {
        let id = NodeId::new(self.id.clone()).map_err(|source| RecordError::InvalidNodeId {
            id: self.id,
            source,
        })?;
        let data = NodeData::from_wire(self.kind, self.data);
        Ok(Node::new(id, self.kind, self.position, data).with_style(self.style))
    }
}

impl GraphDocument {
    /// Rebuilds a document from its record. Edges whose endpoints are missing are dropped.
    pub fn from_record(record: WorkflowRecord) -> Result<Self, RecordError> {
        let WorkflowRecord {
            name,
            description,
            nodes,
            edges,
        } = record;
        let mut doc = GraphDocument::new(WorkflowMeta::new(name, description));

        for node_record in nodes {
            let raw_id = node_record.id.clone();
            if !doc.insert_node(node_record.into_node()?) {
                return Err(RecordError::DuplicateNodeId(raw_id));
            }
        }

        for edge_record in edges {
            let id = EdgeId::new(edge_record.id.clone()).map_err(|source| {
                RecordError::InvalidEdgeId {
                    id: edge_record.id.clone(),
                    source,
                }
            })?;
            if doc.edge(&id).is_some() {
                return Err(RecordError::DuplicateEdgeId(edge_record.id));
            }

            let endpoints = NodeId::new(edge_record.source.as_str())
                .ok()
                .zip(NodeId::new(edge_record.target.as_str()).ok())
                .filter(|(source, target)| doc.contains_node(source) && doc.contains_node(target));
            let Some((source, target)) = endpoints else {
                tracing::warn!(
                    target: TRACING_TARGET,
                    edge_id = %id,
                    source = %edge_record.source,
                    target_node = %edge_record.target,
                    "dropping dangling edge on import"
                );
                continue;
            };

            let edge = Edge::new(id, source, target, edge_record.label)
                .with_presentation(edge_record.animated, edge_record.style);
            doc.insert_edge(edge);
        }

        doc.set_rev(0);
        Ok(doc)
    }

    pub fn to_record(&self) -> WorkflowRecord {
        WorkflowRecord::from(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{RecordError, WorkflowRecord};
    use crate::model::{DetailField, GraphDocument, NodeData, NodeKind, Point, WorkflowMeta};

    fn record(value: serde_json::Value) -> WorkflowRecord {
        serde_json::from_value(value).expect("workflow record")
    }

    #[test]
    fn document_survives_a_record_round_trip() {
        let mut doc = GraphDocument::new(WorkflowMeta::new("triage", "route tickets"));
        let input = doc
            .add_node(NodeKind::Input, Point::new(0.0, 0.0), NodeData::new(NodeKind::Input, "Ticket"))
            .id()
            .clone();
        let mut agent_data = NodeData::new(NodeKind::Agent, "Classifier");
        agent_data.set_note(Some("prefers short labels"));
        let agent = doc
            .add_node(NodeKind::Agent, Point::new(250.0, 0.0), agent_data)
            .id()
            .clone();
        doc.add_edge(&input, &agent, Some("raw".to_owned()))
            .expect("edge");

        let json = serde_json::to_value(doc.to_record()).expect("serialize");
        let back = GraphDocument::from_record(serde_json::from_value(json).expect("deserialize"))
            .expect("import");

        assert_eq!(back.to_record(), doc.to_record());
        assert_eq!(back.meta(), doc.meta());
    }

    #[test]
    fn import_drops_dangling_edges() {
        let doc = GraphDocument::from_record(record(json!({
            "name": "w",
            "nodes": [
                {"id": "input-1", "type": "input", "position": {"x": 0, "y": 0}, "data": {"label": "A"}},
                {"id": "output-2", "type": "output", "position": {"x": 300, "y": 0}, "data": {"label": "B"}}
            ],
            "edges": [
                {"id": "edge-3", "source": "input-1", "target": "output-2", "animated": true},
                {"id": "edge-4", "source": "input-1", "target": "agent-9"}
            ]
        })))
        .expect("import");

        assert_eq!(doc.node_count(), 2);
        assert_eq!(doc.edge_count(), 1);
        assert_eq!(doc.rev(), 0);
    }

    #[test]
    fn import_strips_reserved_keys_and_types_known_fields() {
        let doc = GraphDocument::from_record(record(json!({
            "name": "w",
            "nodes": [{
                "id": "agent-1",
                "type": "agent",
                "position": {"x": 10, "y": 20},
                "data": {"label": "A", "selected": true, "__rf": {}, "model": "m1", "team": "core"}
            }]
        })))
        .expect("import");

        let node = doc.nodes().next().expect("node");
        let data = node.data();
        assert_eq!(
            data.details().get(DetailField::Model).map(|v| v.display_text()),
            Some("m1".to_owned())
        );
        assert_eq!(data.extra().keys().collect::<Vec<_>>(), vec!["team"]);
    }

    #[test]
    fn import_rejects_duplicate_and_invalid_ids() {
        let dup = GraphDocument::from_record(record(json!({
            "name": "w",
            "nodes": [
                {"id": "task-1", "type": "task", "position": {"x": 0, "y": 0}},
                {"id": "task-1", "type": "task", "position": {"x": 0, "y": 0}}
            ]
        })));
        assert_eq!(dup, Err(RecordError::DuplicateNodeId("task-1".to_owned())));

        let invalid = GraphDocument::from_record(record(json!({
            "name": "w",
            "nodes": [{"id": "", "type": "task", "position": {"x": 0, "y": 0}}]
        })));
        assert!(matches!(invalid, Err(RecordError::InvalidNodeId { .. })));
    }

    #[test]
    fn new_ids_never_collide_with_imported_ones() {
        let mut doc = GraphDocument::from_record(record(json!({
            "name": "w",
            "nodes": [{"id": "tool-7", "type": "tool", "position": {"x": 0, "y": 0}}]
        })))
        .expect("import");

        let fresh = doc
            .add_node(NodeKind::Tool, Point::ORIGIN, NodeData::new(NodeKind::Tool, "t"))
            .id()
            .clone();
        assert_eq!(fresh.as_str(), "tool-8");
    }
}
