// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NodeDataPatch, NodeId, Point, RemovedNode};

use super::{Editor, TRACING_TARGET};

/// Context menu opened by right-clicking a node. `at` is in client space.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMenu {
    pub node_id: NodeId,
    pub at: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Settings,
    Clone,
    Note,
    Delete,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [Self::Settings, Self::Clone, Self::Note, Self::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Self::Settings => "Settings",
            Self::Clone => "Clone",
            Self::Note => "Add/Edit note",
            Self::Delete => "Delete",
        }
    }
}

/// Modal note editor, seeded with the node's current note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditor {
    node_id: NodeId,
    text: String,
}

impl NoteEditor {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.text.pop();
    }
}

impl Editor {
    pub fn run_menu_action(&mut self, action: MenuAction) {
        let Some(menu) = self.node_menu.take() else {
            return;
        };
        match action {
            MenuAction::Settings => self.request_select(menu.node_id),
            MenuAction::Clone => {
                self.clone_node(&menu.node_id);
            }
            MenuAction::Note => {
                self.open_note_editor(&menu.node_id);
            }
            MenuAction::Delete => {
                self.delete_node(&menu.node_id);
            }
        }
    }

    /// Duplicates a node: same kind, equal data, fresh id, shifted by the clone offset.
    /// Incident edges are not cloned.
    pub fn clone_node(&mut self, node_id: &NodeId) -> Option<NodeId> {
        let node = self.doc.node(node_id)?;
        let kind = node.kind();
        let position = node.position() + self.config.clone_offset;
        let data = node.data().clone();

        let clone_id = self.doc.add_node(kind, position, data).id().clone();
        tracing::debug!(
            target: TRACING_TARGET,
            source_id = %node_id,
            node_id = %clone_id,
            "node cloned"
        );
        Some(clone_id)
    }

    /// Deletes a node and its edges. No confirmation: an open panel for the node is dropped
    /// together with its draft.
    pub fn delete_node(&mut self, node_id: &NodeId) -> Option<RemovedNode> {
        let removed = self.doc.remove_node(node_id)?;
        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %node_id,
            edges = removed.edges.len(),
            "node deleted"
        );
        self.reconcile();
        Some(removed)
    }

    pub fn open_note_editor(&mut self, node_id: &NodeId) -> bool {
        let Some(node) = self.doc.node(node_id) else {
            return false;
        };
        self.note_editor = Some(NoteEditor {
            node_id: node_id.clone(),
            text: node.data().note().unwrap_or_default().to_owned(),
        });
        true
    }

    /// Writes the note editor's text into the node. Blank text removes the note.
    pub fn save_note(&mut self) -> bool {
        let Some(editor) = self.note_editor.take() else {
            return false;
        };
        let note = Some(editor.text).filter(|text| !text.trim().is_empty());
        let changed = self
            .doc
            .update_node_data(&editor.node_id, NodeDataPatch::note(note));
        self.reconcile();
        changed
    }

    pub fn cancel_note(&mut self) {
        self.note_editor = None;
    }

    /// Inline rename from the node toolbar. Written through immediately.
    pub fn rename_node(&mut self, node_id: &NodeId, label: impl Into<String>) -> bool {
        let changed = self
            .doc
            .update_node_data(node_id, NodeDataPatch::label(label));
        self.reconcile();
        changed
    }

    /// Inline description edit from the node toolbar. Written through immediately.
    pub fn set_node_description(
        &mut self,
        node_id: &NodeId,
        description: impl Into<String>,
    ) -> bool {
        let changed = self
            .doc
            .update_node_data(node_id, NodeDataPatch::description(description));
        self.reconcile();
        changed
    }
}
