// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ids::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            stroke: "#94a3b8".to_owned(),
            stroke_width: 2.0,
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    label: Option<String>,
    animated: bool,
    style: Option<EdgeStyle>,
}

impl Edge {
    /// A freshly connected edge: animated, default stroke.
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, label: Option<String>) -> Self {
        Self {
            id,
            source,
            target,
            label,
            animated: true,
            style: Some(EdgeStyle::default()),
        }
    }

    pub(crate) fn with_presentation(mut self, animated: bool, style: Option<EdgeStyle>) -> Self {
        self.animated = animated;
        self.style = style;
        self
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn style(&self) -> Option<&EdgeStyle> {
        self.style.as_ref()
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
