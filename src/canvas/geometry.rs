// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node boxes, connection handles, edge curves and hit testing.
//!
//! Shapes live in document space. Hit radii are given in client pixels so handles stay
//! grabbable at any zoom level.

use crate::model::{Edge, EdgeId, GraphDocument, Node, NodeId, Point, Rect};

use super::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMetrics {
    pub node_width: f64,
    pub node_height: f64,
    /// Client-space radius around a handle that still counts as a hit.
    pub handle_radius: f64,
    /// Client-space radius of the delete control drawn at an edge's midpoint.
    pub edge_control_radius: f64,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            node_height: 48.0,
            handle_radius: 10.0,
            edge_control_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Target side, left middle of the box.
    Input,
    /// Source side, right middle of the box.
    Output,
}

pub fn node_rect(node: &Node, metrics: &CanvasMetrics) -> Rect {
    Rect::new(node.position(), metrics.node_width, metrics.node_height)
}

/// Document-space position of a handle, or `None` when the node kind has no such handle.
pub fn handle_position(node: &Node, handle: HandleKind, metrics: &CanvasMetrics) -> Option<Point> {
    let rect = node_rect(node, metrics);
    match handle {
        HandleKind::Input if node.kind().has_input_handle() => Some(rect.left_middle()),
        HandleKind::Output if node.kind().has_output_handle() => Some(rect.right_middle()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    /// Horizontal S-curve from a source handle to a target handle.
    pub fn connector(from: Point, to: Point) -> Self {
        let ctrl_dist = ((to.x - from.x).abs() / 2.0).max(50.0);
        Self {
            p0: from,
            p1: Point::new(from.x + ctrl_dist, from.y),
            p2: Point::new(to.x - ctrl_dist, to.y),
            p3: to,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        self.p0 * (mt * mt * mt)
            + self.p1 * (3.0 * mt * mt * t)
            + self.p2 * (3.0 * mt * t * t)
            + self.p3 * (t * t * t)
    }

    /// Curve point at `t = 0.5`: `(p0 + 3 p1 + 3 p2 + p3) / 8`.
    pub fn midpoint(&self) -> Point {
        (self.p0 + self.p1 * 3.0 + self.p2 * 3.0 + self.p3) * 0.125
    }

    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }
}

/// Curve between the source's output handle and the target's input handle.
///
/// Falls back to the box edges when a handle does not exist on that kind, so imported edges that
/// touch such nodes still render.
pub fn edge_curve(doc: &GraphDocument, edge: &Edge, metrics: &CanvasMetrics) -> Option<CubicBezier> {
    let source = doc.node(edge.source())?;
    let target = doc.node(edge.target())?;
    let from = handle_position(source, HandleKind::Output, metrics)
        .unwrap_or_else(|| node_rect(source, metrics).right_middle());
    let to = handle_position(target, HandleKind::Input, metrics)
        .unwrap_or_else(|| node_rect(target, metrics).left_middle());
    Some(CubicBezier::connector(from, to))
}

pub fn edge_midpoint(doc: &GraphDocument, edge: &Edge, metrics: &CanvasMetrics) -> Option<Point> {
    edge_curve(doc, edge, metrics).map(|curve| curve.midpoint())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    EdgeControl(EdgeId),
    Handle { node_id: NodeId, handle: HandleKind },
    Node(NodeId),
    Empty,
}

/// Resolves what lies under a client point. Edge delete controls win over handles, handles win
/// over node bodies, and later (topmost) nodes win over earlier ones.
pub fn hit_test(
    doc: &GraphDocument,
    viewport: &Viewport,
    client: Point,
    metrics: &CanvasMetrics,
) -> Hit {
    for edge in doc.edges().rev() {
        let Some(mid) = edge_midpoint(doc, edge, metrics) else {
            continue;
        };
        if viewport.to_client(mid).distance_to(client) <= metrics.edge_control_radius {
            return Hit::EdgeControl(edge.id().clone());
        }
    }

    for node in doc.nodes().rev() {
        for handle in [HandleKind::Output, HandleKind::Input] {
            let Some(at) = handle_position(node, handle, metrics) else {
                continue;
            };
            if viewport.to_client(at).distance_to(client) <= metrics.handle_radius {
                return Hit::Handle {
                    node_id: node.id().clone(),
                    handle,
                };
            }
        }
    }

    let document = viewport.to_document(client);
    doc.nodes()
        .rev()
        .find(|node| node_rect(node, metrics).contains(document))
        .map(|node| Hit::Node(node.id().clone()))
        .unwrap_or(Hit::Empty)
}
