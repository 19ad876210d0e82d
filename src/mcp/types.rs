// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{NodeKind, WorkflowRecord};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowReadResponse {
    pub rev: u64,
    /// `true` when the document changed since the last successful save.
    pub modified: bool,
    pub selected_node_id: Option<String>,
    /// Session actions still running (`save`, `run`, `deploy`, `fetch`).
    pub in_flight: Vec<String>,
    pub workflow: WorkflowRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpCatalogEntry {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub icon: String,
    pub description: String,
    pub has_input: bool,
    pub has_output: bool,
    /// Well-known `data` keys for this node type.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogResponse {
    pub entries: Vec<McpCatalogEntry>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApplyOpsParams {
    pub base_rev: u64,
    pub ops: Vec<McpOp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeltaSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
    pub meta_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyOpsResponse {
    pub new_rev: u64,
    pub applied: u64,
    /// Ops that referenced missing nodes or edges.
    pub skipped: u64,
    pub delta: DeltaSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SaveResponse {
    pub accepted: bool,
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpOp {
    AddNode {
        node_id: Option<String>,
        kind: NodeKind,
        x: f64,
        y: f64,
        label: Option<String>,
        description: Option<String>,
        /// Well-known fields and extra attributes, keyed as in `workflow.read`.
        data: Option<Map<String, Value>>,
    },
    MoveNode {
        node_id: String,
        x: f64,
        y: f64,
    },
    UpdateNode {
        node_id: String,
        label: Option<String>,
        description: Option<String>,
        data: Option<Map<String, Value>>,
    },
    SetNodeNote {
        node_id: String,
        note: Option<String>,
    },
    RemoveNode {
        node_id: String,
    },
    AddEdge {
        edge_id: Option<String>,
        source: String,
        target: String,
        label: Option<String>,
    },
    RemoveEdge {
        edge_id: String,
    },
    SetMeta {
        name: Option<String>,
        description: Option<String>,
    },
}
