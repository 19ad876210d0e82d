// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The editor aggregate.
//!
//! `Editor` owns the graph document together with everything layered on top of it: the canvas
//! controller, the node picker, the node context menu, the note editor, the configuration panel
//! and the confirmation prompt. All state is explicit; a test can drive the whole editor without
//! a terminal.
//!
//! The configuration panel's unsaved-changes guard is the one confirmation point. Selecting a
//! different node, clicking empty canvas and closing the panel all go through
//! [`Editor::request_select`] / [`Editor::request_close_panel`], which park the action in a
//! [`ConfirmPrompt`] while the draft is dirty.

mod actions;
pub mod panel;
pub mod picker;

pub use actions::{MenuAction, NodeMenu, NoteEditor};
pub use panel::{CloseRequest, ConfigPanel, PanelError, PanelField};
pub use picker::{catalog_entry, filter_catalog, CatalogEntry, NodePicker, CATALOG};

use crate::canvas::{
    CanvasController, CanvasEvent, DragTransfer, PayloadError, PointerButton,
};
use crate::config::EditorConfig;
use crate::model::{GraphDocument, NodeData, NodeId, NodeKind, Point};

/// Tracing target for editor actions.
pub const TRACING_TARGET: &str = "flowstudio::editor";

/// Action parked behind the unsaved-changes prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Select(NodeId),
    ClosePanel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: String,
    pub action: PendingAction,
}

/// Something the host should tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorNotice {
    PanelSaved { label: String },
}

#[derive(Debug, Clone)]
pub struct Editor {
    doc: GraphDocument,
    canvas: CanvasController,
    config: EditorConfig,
    picker: NodePicker,
    panel: Option<ConfigPanel>,
    node_menu: Option<NodeMenu>,
    note_editor: Option<NoteEditor>,
    prompt: Option<ConfirmPrompt>,
}

impl Editor {
    pub fn new(doc: GraphDocument, config: EditorConfig) -> Self {
        Self {
            doc,
            canvas: CanvasController::new(&config),
            config,
            picker: NodePicker::default(),
            panel: None,
            node_menu: None,
            note_editor: None,
            prompt: None,
        }
    }

    pub fn document(&self) -> &GraphDocument {
        &self.doc
    }

    /// Direct document access for programmatic edits. Call [`Editor::reconcile`] afterwards so
    /// overlays drop references to removed nodes.
    pub fn document_mut(&mut self) -> &mut GraphDocument {
        &mut self.doc
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &CanvasController {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasController {
        &mut self.canvas
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.canvas.selection()
    }

    pub fn picker(&self) -> &NodePicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut NodePicker {
        &mut self.picker
    }

    pub fn is_picker_open(&self) -> bool {
        self.canvas.picker_anchor().is_some()
    }

    pub fn panel(&self) -> Option<&ConfigPanel> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut ConfigPanel> {
        self.panel.as_mut()
    }

    pub fn prompt(&self) -> Option<&ConfirmPrompt> {
        self.prompt.as_ref()
    }

    pub fn node_menu(&self) -> Option<&NodeMenu> {
        self.node_menu.as_ref()
    }

    pub fn note_editor(&self) -> Option<&NoteEditor> {
        self.note_editor.as_ref()
    }

    pub fn note_editor_mut(&mut self) -> Option<&mut NoteEditor> {
        self.note_editor.as_mut()
    }

    pub fn pointer_down(&mut self, button: PointerButton, client: Point) -> Option<CanvasEvent> {
        self.node_menu = None;
        let event = self.canvas.pointer_down(&mut self.doc, button, client);
        self.handle_canvas_event(event.as_ref());
        event
    }

    pub fn pointer_move(&mut self, client: Point) -> Option<CanvasEvent> {
        if self.prompt.is_some() {
            return None;
        }
        self.canvas.pointer_move(&mut self.doc, client)
    }

    pub fn pointer_up(&mut self, client: Point) -> Option<CanvasEvent> {
        let event = self.canvas.pointer_up(&mut self.doc, client);
        self.handle_canvas_event(event.as_ref());
        event
    }

    pub fn wheel(&mut self, client: Point, notches: f64) {
        self.canvas.wheel(client, notches);
    }

    fn handle_canvas_event(&mut self, event: Option<&CanvasEvent>) {
        match event {
            Some(CanvasEvent::SelectRequested(node_id)) => self.request_select(node_id.clone()),
            Some(CanvasEvent::DeselectRequested) => self.request_close_panel(),
            Some(CanvasEvent::NodeMenuRequested { node_id, at }) => {
                self.node_menu = Some(NodeMenu {
                    node_id: node_id.clone(),
                    at: *at,
                });
            }
            Some(CanvasEvent::PickerOpened { .. }) => self.picker.reset(),
            _ => {}
        }
        // A pending prompt owns the pointer until it is answered.
        if self.prompt.is_some() {
            self.canvas.cancel();
        }
    }

    /// Selects `node_id` and opens its panel, asking first when a dirty draft for another node
    /// would be discarded.
    pub fn request_select(&mut self, node_id: NodeId) {
        if !self.doc.contains_node(&node_id) {
            return;
        }
        match &self.panel {
            Some(panel) if panel.node_id() == &node_id => {}
            Some(panel) if panel.is_dirty() => {
                self.prompt = Some(ConfirmPrompt {
                    message: discard_message(panel),
                    action: PendingAction::Select(node_id),
                });
            }
            _ => self.select(node_id),
        }
    }

    /// Closes the panel and clears the selection, asking first when the draft is dirty.
    pub fn request_close_panel(&mut self) {
        match &self.panel {
            Some(panel) if panel.request_close() == CloseRequest::NeedsConfirmation => {
                self.prompt = Some(ConfirmPrompt {
                    message: discard_message(panel),
                    action: PendingAction::ClosePanel,
                });
            }
            _ => self.close_panel(),
        }
    }

    /// Discards the draft and runs the parked action.
    pub fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        tracing::debug!(target: TRACING_TARGET, action = ?prompt.action, "unsaved draft discarded");
        match prompt.action {
            PendingAction::Select(node_id) => self.select(node_id),
            PendingAction::ClosePanel => self.close_panel(),
        }
    }

    /// Keeps the panel open with its draft intact.
    pub fn decline_prompt(&mut self) {
        self.prompt = None;
    }

    fn select(&mut self, node_id: NodeId) {
        let Some(node) = self.doc.node(&node_id) else {
            return;
        };
        self.panel = Some(ConfigPanel::open(node));
        self.canvas.set_selection(Some(node_id));
    }

    fn close_panel(&mut self) {
        self.panel = None;
        self.canvas.set_selection(None);
    }

    /// Saves the panel draft into the document. `Ok(None)` when there is no panel or nothing to
    /// save.
    pub fn save_panel(&mut self) -> Result<Option<EditorNotice>, PanelError> {
        let Some(panel) = self.panel.as_mut() else {
            return Ok(None);
        };
        if !panel.commit(&mut self.doc)? {
            return Ok(None);
        }
        Ok(Some(EditorNotice::PanelSaved {
            label: panel.draft().label().to_owned(),
        }))
    }

    /// Creates a node of `kind` at the picker anchor and closes the picker.
    pub fn pick(&mut self, kind: NodeKind) -> Option<NodeId> {
        let anchor = self.canvas.picker_anchor()?;
        self.canvas.close_picker();
        let entry = catalog_entry(kind);
        let node_id = self
            .doc
            .add_node(kind, anchor, NodeData::new(kind, entry.label))
            .id()
            .clone();
        tracing::debug!(target: TRACING_TARGET, node_id = %node_id, "node picked");
        Some(node_id)
    }

    /// Creates the highlighted picker entry.
    pub fn pick_highlighted(&mut self) -> Option<NodeId> {
        let kind = self.picker.highlighted_entry()?.kind;
        self.pick(kind)
    }

    pub fn close_picker(&mut self) -> bool {
        self.canvas.close_picker()
    }

    pub fn drop_transfer(
        &mut self,
        transfer: &DragTransfer,
        client: Point,
    ) -> Result<NodeId, PayloadError> {
        self.canvas.drop_transfer(&mut self.doc, transfer, client)
    }

    /// Escape: closes the innermost overlay.
    pub fn escape(&mut self) {
        if self.prompt.is_some() {
            self.decline_prompt();
            return;
        }
        if self.note_editor.is_some() {
            self.cancel_note();
            return;
        }
        if self.node_menu.take().is_some() || self.canvas.cancel() {
            return;
        }
        if self.panel.is_some() {
            self.request_close_panel();
        }
    }

    /// Drops overlay state that points at nodes no longer in the document.
    pub fn reconcile(&mut self) {
        let doc = &self.doc;
        if self
            .panel
            .as_ref()
            .is_some_and(|panel| !doc.contains_node(panel.node_id()))
        {
            self.panel = None;
            if matches!(
                self.prompt.as_ref().map(|prompt| &prompt.action),
                Some(PendingAction::ClosePanel)
            ) {
                self.prompt = None;
            }
        }
        if self
            .canvas
            .selection()
            .is_some_and(|node_id| !doc.contains_node(node_id))
        {
            self.canvas.set_selection(None);
        }
        let stale_select = matches!(
            self.prompt.as_ref().map(|prompt| &prompt.action),
            Some(PendingAction::Select(node_id))
                if !doc.contains_node(node_id) || self.panel.is_none()
        );
        if stale_select {
            self.prompt = None;
        }
        if self
            .node_menu
            .as_ref()
            .is_some_and(|menu| !doc.contains_node(&menu.node_id))
        {
            self.node_menu = None;
        }
        if self
            .note_editor
            .as_ref()
            .is_some_and(|note| !doc.contains_node(note.node_id()))
        {
            self.note_editor = None;
        }
        if let Some(panel) = self.panel.as_mut() {
            if let Some(node) = doc.node(panel.node_id()) {
                panel.absorb(node.data());
            }
        }
    }
}

fn discard_message(panel: &ConfigPanel) -> String {
    format!(
        "Discard unsaved changes to \"{}\"?",
        panel.snapshot().label()
    )
}
