// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer gestures to document mutations.
//!
//! The controller owns the viewport, the in-flight gesture and the picker anchor. Selection is
//! stored here too, but only the editor changes it: the controller reports
//! [`CanvasEvent::SelectRequested`] / [`CanvasEvent::DeselectRequested`] so the editor can run
//! the configuration panel's unsaved-changes guard first.
//!
//! ```text
//! Idle --click node--> NodeSelected --click empty--> Idle
//! Idle --right-click empty--> PickerOpen --pick | click outside--> Idle
//! Idle --drag from output handle--> Connecting --drop--> Idle
//! ```

use crate::config::EditorConfig;
use crate::model::{EdgeId, GraphDocument, NodeData, NodeId, Point};

use super::geometry::{hit_test, CanvasMetrics, HandleKind, Hit};
use super::payload::{DragTransfer, PayloadError};
use super::viewport::{Viewport, ZoomBounds};
use super::TRACING_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasState {
    Idle,
    NodeSelected,
    PickerOpen,
    Connecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

/// What a gesture did or asks the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    SelectRequested(NodeId),
    DeselectRequested,
    /// Right click on a node; `at` is the client point for the menu.
    NodeMenuRequested { node_id: NodeId, at: Point },
    /// `anchor` is in document space.
    PickerOpened { anchor: Point },
    PickerClosed,
    NodeMoved(NodeId),
    NodeCreated(NodeId),
    EdgeCreated(EdgeId),
    EdgeRemoved(EdgeId),
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    None,
    DraggingNode {
        node_id: NodeId,
        grab_offset: Point,
    },
    Panning {
        last: Point,
        moved: bool,
    },
    Connecting {
        source: NodeId,
        cursor: Point,
    },
}

#[derive(Debug, Clone)]
pub struct CanvasController {
    viewport: Viewport,
    selection: Option<NodeId>,
    gesture: Gesture,
    picker_anchor: Option<Point>,
    metrics: CanvasMetrics,
    zoom_bounds: ZoomBounds,
    wheel_step: f64,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl CanvasController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            viewport: Viewport::default(),
            selection: None,
            gesture: Gesture::None,
            picker_anchor: None,
            metrics: config.metrics,
            zoom_bounds: config.zoom_bounds,
            wheel_step: config.wheel_zoom_step,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn state(&self) -> CanvasState {
        if matches!(self.gesture, Gesture::Connecting { .. }) {
            CanvasState::Connecting
        } else if self.picker_anchor.is_some() {
            CanvasState::PickerOpen
        } else if self.selection.is_some() {
            CanvasState::NodeSelected
        } else {
            CanvasState::Idle
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn metrics(&self) -> &CanvasMetrics {
        &self.metrics
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, node_id: Option<NodeId>) {
        self.selection = node_id;
    }

    pub fn picker_anchor(&self) -> Option<Point> {
        self.picker_anchor
    }

    pub fn open_picker(&mut self, anchor: Point) {
        self.picker_anchor = Some(anchor);
    }

    pub fn close_picker(&mut self) -> bool {
        self.picker_anchor.take().is_some()
    }

    /// Source node and document-space cursor of an in-flight connection.
    pub fn pending_connection(&self) -> Option<(&NodeId, Point)> {
        match &self.gesture {
            Gesture::Connecting { source, cursor } => Some((source, *cursor)),
            _ => None,
        }
    }

    pub fn dragging_node(&self) -> Option<&NodeId> {
        match &self.gesture {
            Gesture::DraggingNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }

    pub fn hit(&self, doc: &GraphDocument, client: Point) -> Hit {
        hit_test(doc, &self.viewport, client, &self.metrics)
    }

    pub fn pointer_down(
        &mut self,
        doc: &mut GraphDocument,
        button: PointerButton,
        client: Point,
    ) -> Option<CanvasEvent> {
        self.gesture = Gesture::None;

        if self.picker_anchor.is_some() {
            // Any press that reaches the canvas is outside the picker.
            self.picker_anchor = None;
            return Some(CanvasEvent::PickerClosed);
        }

        match button {
            PointerButton::Left => self.left_down(doc, client),
            PointerButton::Right => self.right_down(doc, client),
        }
    }

    fn left_down(&mut self, doc: &mut GraphDocument, client: Point) -> Option<CanvasEvent> {
        match self.hit(doc, client) {
            Hit::EdgeControl(edge_id) => {
                let removed = doc.remove_edge(&edge_id)?;
                tracing::debug!(target: TRACING_TARGET, edge_id = %removed.id(), "edge removed from control");
                Some(CanvasEvent::EdgeRemoved(edge_id))
            }
            Hit::Handle {
                node_id,
                handle: HandleKind::Output,
            } => {
                self.gesture = Gesture::Connecting {
                    source: node_id,
                    cursor: self.viewport.to_document(client),
                };
                None
            }
            Hit::Handle {
                node_id,
                handle: HandleKind::Input,
            }
            | Hit::Node(node_id) => {
                let position = doc.node(&node_id)?.position();
                self.gesture = Gesture::DraggingNode {
                    grab_offset: self.viewport.to_document(client) - position,
                    node_id: node_id.clone(),
                };
                Some(CanvasEvent::SelectRequested(node_id))
            }
            Hit::Empty => {
                self.gesture = Gesture::Panning {
                    last: client,
                    moved: false,
                };
                None
            }
        }
    }

    fn right_down(&mut self, doc: &GraphDocument, client: Point) -> Option<CanvasEvent> {
        match self.hit(doc, client) {
            Hit::Node(node_id) | Hit::Handle { node_id, .. } => Some(CanvasEvent::NodeMenuRequested {
                node_id,
                at: client,
            }),
            Hit::EdgeControl(_) => None,
            Hit::Empty => {
                let anchor = self.viewport.to_document(client);
                self.picker_anchor = Some(anchor);
                Some(CanvasEvent::PickerOpened { anchor })
            }
        }
    }

    pub fn pointer_move(&mut self, doc: &mut GraphDocument, client: Point) -> Option<CanvasEvent> {
        let document = self.viewport.to_document(client);
        match &mut self.gesture {
            Gesture::None => None,
            Gesture::DraggingNode {
                node_id,
                grab_offset,
            } => {
                let node_id = node_id.clone();
                if !doc.contains_node(&node_id) {
                    // Deleted mid-drag.
                    self.gesture = Gesture::None;
                    return None;
                }
                doc.update_node_position(&node_id, document - *grab_offset)
                    .then_some(CanvasEvent::NodeMoved(node_id))
            }
            Gesture::Panning { last, moved } => {
                let delta = client - *last;
                if delta != Point::ORIGIN {
                    *last = client;
                    *moved = true;
                    self.viewport.pan_by(delta);
                }
                None
            }
            Gesture::Connecting { cursor, .. } => {
                *cursor = document;
                None
            }
        }
    }

    pub fn pointer_up(&mut self, doc: &mut GraphDocument, client: Point) -> Option<CanvasEvent> {
        match std::mem::replace(&mut self.gesture, Gesture::None) {
            Gesture::None | Gesture::DraggingNode { .. } => None,
            Gesture::Panning { moved, .. } => (!moved).then_some(CanvasEvent::DeselectRequested),
            Gesture::Connecting { source, .. } => {
                let Hit::Handle {
                    node_id: target,
                    handle: HandleKind::Input,
                } = self.hit(doc, client)
                else {
                    return None;
                };
                if target == source {
                    tracing::trace!(target: TRACING_TARGET, node_id = %source, "self-connection ignored");
                    return None;
                }
                let edge = doc.add_edge(&source, &target, None)?;
                tracing::debug!(
                    target: TRACING_TARGET,
                    edge_id = %edge.id(),
                    source_id = %source,
                    target_id = %target,
                    "edge connected"
                );
                Some(CanvasEvent::EdgeCreated(edge.id().clone()))
            }
        }
    }

    /// Zooms around `client` by `wheel_step ^ notches`. Positive notches zoom in.
    pub fn wheel(&mut self, client: Point, notches: f64) {
        let factor = self.wheel_step.powf(notches);
        self.viewport.zoom_by(factor, client, self.zoom_bounds);
    }

    /// Creates a node from a drag payload dropped at `client`. The drop point becomes the
    /// node's top-left corner in document space.
    pub fn drop_transfer(
        &mut self,
        doc: &mut GraphDocument,
        transfer: &DragTransfer,
        client: Point,
    ) -> Result<NodeId, PayloadError> {
        let payload = transfer.node_payload()?;
        let position = self.viewport.to_document(client);
        let node_id = doc
            .add_node(payload.kind, position, NodeData::new(payload.kind, payload.label))
            .id()
            .clone();
        self.picker_anchor = None;
        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %node_id,
            x = position.x,
            y = position.y,
            "node dropped"
        );
        Ok(node_id)
    }

    /// Drops any in-flight gesture and closes the picker. Returns whether anything was active.
    pub fn cancel(&mut self) -> bool {
        let had_gesture = !matches!(self.gesture, Gesture::None);
        self.gesture = Gesture::None;
        self.close_picker() || had_gesture
    }
}
