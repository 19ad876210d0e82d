// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Graph document model.
//!
//! A workflow is a `GraphDocument`: typed nodes, directed edges between them, and workflow
//! metadata. `record` holds the serialized shape handed to collaborators.

pub mod demo;
pub mod document;
pub mod edge;
pub mod element_ref;
pub mod geometry;
pub mod ids;
pub mod node;
pub mod record;

pub use demo::{demo_workflow, starter_workflow};
pub use document::{GraphDocument, RemovedNode, WorkflowMeta};
pub use edge::{Edge, EdgeStyle};
pub use element_ref::{ElementRef, ParseElementRefError};
pub use geometry::{Point, Rect};
pub use ids::{EdgeId, Id, IdAllocator, IdError, NodeId};
pub use node::{
    format_number, is_reserved_key, AttrValue, DetailError, DetailField, Node, NodeData,
    NodeDataPatch, NodeDetails, NodeKind, NodeStyle, UnknownNodeKind, ValueKind,
};
pub use record::{EdgeRecord, NodeRecord, RecordError, WorkflowRecord};

/// Tracing target for document mutations.
pub const TRACING_TARGET: &str = "flowstudio::document";
