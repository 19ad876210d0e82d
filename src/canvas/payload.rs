// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transient drag payload attached when a picker entry is dragged onto the canvas.

use serde::{Deserialize, Serialize};

use crate::model::NodeKind;

/// Media type under which a node payload travels.
pub const NODE_PAYLOAD_MIME: &str = "application/x-flowstudio-node";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
}

impl DragPayload {
    /// Payload for `kind` carrying its default label.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: kind.default_label().to_owned(),
        }
    }

    pub fn encode(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A typed data item as carried by a drag operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransfer {
    pub mime: String,
    pub data: String,
}

impl DragTransfer {
    pub fn new(mime: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn node(payload: &DragPayload) -> Result<Self, PayloadError> {
        Ok(Self::new(NODE_PAYLOAD_MIME, payload.encode()?))
    }

    pub fn node_payload(&self) -> Result<DragPayload, PayloadError> {
        if self.mime != NODE_PAYLOAD_MIME {
            return Err(PayloadError::UnsupportedMime(self.mime.clone()));
        }
        DragPayload::decode(&self.data)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("unsupported drag payload type {0:?}")]
    UnsupportedMime(String),
    #[error("malformed node payload: {0}")]
    Json(#[from] serde_json::Error),
}
