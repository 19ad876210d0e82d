// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::edge::Edge;
use super::geometry::Point;
use super::ids::{EdgeId, IdAllocator, NodeId};
use super::node::{Node, NodeData, NodeDataPatch, NodeKind};
use super::TRACING_TARGET;

/// Workflow-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowMeta {
    pub name: String,
    pub description: String,
}

impl WorkflowMeta {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// What `remove_node` took out of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: Vec<Edge>,
}

/// All nodes and edges of one workflow plus its metadata.
///
/// Every operation is total: an id that is not present turns the call into a no-op reported
/// through the return value. After any sequence of calls, every edge references two nodes that
/// exist in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDocument {
    meta: WorkflowMeta,
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    ids: IdAllocator,
    rev: u64,
}

impl GraphDocument {
    pub fn new(meta: WorkflowMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.name = name.into();
        self.bump_rev();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.meta.description = description.into();
        self.bump_rev();
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl DoubleEndedIterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn has_node_of_kind(&self, kind: NodeKind) -> bool {
        self.nodes.values().any(|node| node.kind() == kind)
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |edge| edge.touches(node_id))
    }

    /// Creates a node with a fresh `<type>-<n>` id and the kind's default style.
    pub fn add_node(&mut self, kind: NodeKind, position: Point, data: NodeData) -> &Node {
        let id = self.fresh_node_id(kind);
        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            kind = %kind,
            x = position.x,
            y = position.y,
            "node added"
        );
        self.bump_rev();
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id, kind, position, data))
    }

    /// Inserts a fully formed node, keeping its id. Returns `false` when the id is taken.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.ids.observe(node.id());
        self.nodes.insert(node.id().clone(), node);
        self.bump_rev();
        true
    }

    /// Connects `source` to `target`. Returns `None` (and changes nothing) when either node is
    /// missing.
    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        label: Option<String>,
    ) -> Option<&Edge> {
        if !self.nodes.contains_key(source) || !self.nodes.contains_key(target) {
            tracing::trace!(
                target: TRACING_TARGET,
                source = %source,
                target_node = %target,
                "add_edge ignored: endpoint missing"
            );
            return None;
        }

        let id = self.fresh_edge_id();
        tracing::debug!(
            target: TRACING_TARGET,
            edge_id = %id,
            source = %source,
            target_node = %target,
            "edge added"
        );
        self.bump_rev();
        let edge = Edge::new(id.clone(), source.clone(), target.clone(), label);
        Some(self.edges.entry(id).or_insert(edge))
    }

    /// Inserts a fully formed edge. Refuses taken ids and dangling endpoints.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edges.contains_key(edge.id())
            || !self.nodes.contains_key(edge.source())
            || !self.nodes.contains_key(edge.target())
        {
            return false;
        }
        self.ids.observe(edge.id());
        self.edges.insert(edge.id().clone(), edge);
        self.bump_rev();
        true
    }

    pub fn update_node_position(&mut self, id: &NodeId, position: Point) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            tracing::trace!(target: TRACING_TARGET, node_id = %id, "move ignored: node missing");
            return false;
        };
        if node.position() == position {
            return true;
        }
        node.set_position(position);
        self.bump_rev();
        true
    }

    /// Merges `patch` into the node's data. Returns `false` only when the node is missing.
    pub fn update_node_data(&mut self, id: &NodeId, patch: NodeDataPatch) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            tracing::trace!(target: TRACING_TARGET, node_id = %id, "update ignored: node missing");
            return false;
        };
        if node.data_mut().apply_patch(patch) {
            tracing::debug!(target: TRACING_TARGET, node_id = %id, "node data updated");
            self.bump_rev();
        }
        true
    }

    /// Removes the node and every edge that starts or ends at it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<RemovedNode> {
        let node = self.nodes.remove(id)?;
        let touching = self
            .edges
            .values()
            .filter(|edge| edge.touches(id))
            .map(|edge| edge.id().clone())
            .collect::<Vec<_>>();
        let edges = touching
            .iter()
            .filter_map(|edge_id| self.edges.remove(edge_id))
            .collect::<Vec<_>>();

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            cascaded_edges = edges.len(),
            "node removed"
        );
        self.bump_rev();
        Some(RemovedNode { node, edges })
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        tracing::debug!(target: TRACING_TARGET, edge_id = %id, "edge removed");
        self.bump_rev();
        Some(edge)
    }

    fn fresh_node_id(&mut self, kind: NodeKind) -> NodeId {
        let nodes = &self.nodes;
        self.ids.fresh(kind.as_str(), |id| nodes.contains_key(id))
    }

    fn fresh_edge_id(&mut self) -> EdgeId {
        let edges = &self.edges;
        self.ids.fresh("edge", |id| edges.contains_key(id))
    }
}
