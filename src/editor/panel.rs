// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Configuration panel bound to the selected node.
//!
//! The panel keeps a snapshot of the node's data taken at open time and a draft that receives
//! every edit. The document is only touched by [`ConfigPanel::commit`]. `is_dirty` compares
//! draft and snapshot, so reverting an edit by hand clears the flag again.

use std::borrow::Cow;

use crate::collab::FetchedContent;
use crate::model::{
    AttrValue, DetailError, DetailField, GraphDocument, Node, NodeData, NodeDataPatch, NodeId,
    NodeKind, ValueKind,
};

use super::TRACING_TARGET;

/// One row of the panel form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelField {
    Label,
    Description,
    Note,
    Detail(DetailField),
    Extra(String),
}

impl PanelField {
    pub fn title(&self) -> Cow<'static, str> {
        match self {
            Self::Label => Cow::Borrowed("Label"),
            Self::Description => Cow::Borrowed("Description"),
            Self::Note => Cow::Borrowed("Note"),
            Self::Detail(field) => Cow::Borrowed(field.label()),
            Self::Extra(key) => Cow::Owned(key.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("{0} is not editable")]
    NotEditable(String),
    #[error("{field}: {input:?} is not a number")]
    InvalidNumber { field: String, input: String },
    #[error("{field}: {input:?} is not true or false")]
    InvalidBool { field: String, input: String },
    #[error(transparent)]
    Detail(#[from] DetailError),
    #[error("node {0} no longer exists")]
    NodeMissing(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    Closed,
    /// The draft has unsaved edits; the caller must confirm before discarding.
    NeedsConfirmation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPanel {
    node_id: NodeId,
    kind: NodeKind,
    snapshot: NodeData,
    draft: NodeData,
    focused: usize,
}

impl ConfigPanel {
    pub fn open(node: &Node) -> Self {
        Self {
            node_id: node.id().clone(),
            kind: node.kind(),
            snapshot: node.data().clone(),
            draft: node.data().clone(),
            focused: 0,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn snapshot(&self) -> &NodeData {
        &self.snapshot
    }

    pub fn draft(&self) -> &NodeData {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.snapshot
    }

    /// Rows shown by the panel, in display order.
    ///
    /// `note` only appears when the node had one when the panel opened. Extra attributes are
    /// listed when their value is primitive and no typed field shadows their key.
    pub fn fields(&self) -> Vec<PanelField> {
        let mut fields = vec![PanelField::Label, PanelField::Description];
        if self.snapshot.note().is_some() {
            fields.push(PanelField::Note);
        }
        fields.extend(
            self.draft
                .details()
                .fields()
                .iter()
                .map(|field| PanelField::Detail(*field)),
        );
        fields.extend(
            self.draft
                .extra()
                .iter()
                .filter(|(key, value)| {
                    value.is_primitive() && !self.draft.is_well_known_key(key)
                })
                .map(|(key, _)| PanelField::Extra(key.clone())),
        );
        fields
    }

    pub fn value(&self, field: &PanelField) -> Option<AttrValue> {
        match field {
            PanelField::Label => Some(AttrValue::Text(self.draft.label().to_owned())),
            PanelField::Description => Some(AttrValue::Text(self.draft.description().to_owned())),
            PanelField::Note => self
                .draft
                .note()
                .map(|note| AttrValue::Text(note.to_owned())),
            PanelField::Detail(detail) => self.draft.details().get(*detail),
            PanelField::Extra(key) => self.draft.extra().get(key).cloned(),
        }
    }

    pub fn value_kind(&self, field: &PanelField) -> ValueKind {
        match field {
            PanelField::Label => ValueKind::Text,
            PanelField::Description | PanelField::Note => ValueKind::Multiline,
            PanelField::Detail(detail) => detail.value_kind(),
            PanelField::Extra(key) => match self.draft.extra().get(key) {
                Some(AttrValue::Bool(_)) => ValueKind::Bool,
                _ => ValueKind::Text,
            },
        }
    }

    /// Text currently shown in the input for `field`.
    pub fn text(&self, field: &PanelField) -> String {
        self.value(field)
            .map(|value| value.display_text())
            .unwrap_or_default()
    }

    /// Parses `input` according to the field's type and writes it into the draft.
    pub fn set_text(&mut self, field: &PanelField, input: &str) -> Result<(), PanelError> {
        match field {
            PanelField::Label => self.draft.set_label(input),
            PanelField::Description => self.draft.set_description(input),
            PanelField::Note => self.draft.set_note(Some(input)),
            PanelField::Detail(detail) => {
                let value = match detail.value_kind() {
                    ValueKind::Text | ValueKind::Multiline => Some(AttrValue::Text(input.to_owned())),
                    ValueKind::Number if input.trim().is_empty() => None,
                    ValueKind::Number => Some(AttrValue::Number(parse_number(field, input)?)),
                    ValueKind::Bool => Some(AttrValue::Bool(parse_bool(field, input)?)),
                };
                self.draft.details_mut().set(*detail, value)?;
            }
            PanelField::Extra(key) => {
                let value = match self.draft.extra().get(key) {
                    Some(AttrValue::Text(_)) => AttrValue::Text(input.to_owned()),
                    Some(AttrValue::Number(_)) => AttrValue::Number(parse_number(field, input)?),
                    Some(AttrValue::Bool(_)) => AttrValue::Bool(parse_bool(field, input)?),
                    Some(AttrValue::Structured(_)) | None => {
                        return Err(PanelError::NotEditable(key.clone()));
                    }
                };
                if !self.draft.set_extra(key.clone(), value) {
                    return Err(PanelError::NotEditable(key.clone()));
                }
            }
        }
        Ok(())
    }

    /// Flips a boolean field.
    pub fn toggle(&mut self, field: &PanelField) -> Result<(), PanelError> {
        if self.value_kind(field) != ValueKind::Bool {
            return Err(PanelError::NotEditable(field.title().into_owned()));
        }
        let current = matches!(self.value(field), Some(AttrValue::Bool(true)));
        self.set_text(field, if current { "false" } else { "true" })
    }

    /// Writes the whole draft back into the document. A clean draft is a no-op and returns
    /// `Ok(false)`.
    pub fn commit(&mut self, doc: &mut GraphDocument) -> Result<bool, PanelError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        if !doc.contains_node(&self.node_id) {
            return Err(PanelError::NodeMissing(self.node_id.clone()));
        }
        doc.update_node_data(&self.node_id, NodeDataPatch::from(self.draft.clone()));
        self.snapshot = self.draft.clone();
        tracing::debug!(target: TRACING_TARGET, node_id = %self.node_id, "panel draft saved");
        Ok(true)
    }

    pub fn request_close(&self) -> CloseRequest {
        if self.is_dirty() {
            CloseRequest::NeedsConfirmation
        } else {
            CloseRequest::Closed
        }
    }

    /// Picks up changes made to the node outside the panel. A clean draft follows the node;
    /// a dirty draft keeps every label, description or note the user has already edited.
    pub fn absorb(&mut self, data: &NodeData) {
        if &self.snapshot == data {
            return;
        }
        if !self.is_dirty() {
            self.snapshot = data.clone();
            self.draft = data.clone();
            return;
        }
        if self.draft.label() == self.snapshot.label() {
            self.draft.set_label(data.label());
        }
        if self.draft.description() == self.snapshot.description() {
            self.draft.set_description(data.description());
        }
        if self.draft.note() == self.snapshot.note() {
            self.draft.set_note(data.note());
        }
        self.snapshot = data.clone();
    }

    /// Stores fetched spec content in the draft. Ignored unless the panel still shows
    /// `node_id` and its spec URI still equals `uri`.
    pub fn apply_fetched(&mut self, node_id: &NodeId, uri: &str, fetched: &FetchedContent) -> bool {
        if &self.node_id != node_id {
            return false;
        }
        let current_uri = self.draft.details().get(DetailField::SpecUri);
        if current_uri != Some(AttrValue::Text(uri.to_owned())) {
            return false;
        }
        let details = self.draft.details_mut();
        details
            .set(
                DetailField::SpecContent,
                Some(AttrValue::Text(fetched.content.clone())),
            )
            .and_then(|()| {
                details.set(
                    DetailField::SpecFormat,
                    Some(AttrValue::Text(fetched.format.as_str().to_owned())),
                )
            })
            .is_ok()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focused_field(&self) -> Option<PanelField> {
        self.fields().into_iter().nth(self.focused)
    }

    pub fn move_focus(&mut self, delta: isize) {
        let len = self.fields().len() as isize;
        if len > 0 {
            self.focused = (self.focused as isize + delta).rem_euclid(len) as usize;
        }
    }
}

fn parse_number(field: &PanelField, input: &str) -> Result<f64, PanelError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| PanelError::InvalidNumber {
            field: field.title().into_owned(),
            input: input.to_owned(),
        })
}

fn parse_bool(field: &PanelField, input: &str) -> Result<bool, PanelError> {
    match input.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(PanelError::InvalidBool {
            field: field.title().into_owned(),
            input: input.to_owned(),
        }),
    }
}
