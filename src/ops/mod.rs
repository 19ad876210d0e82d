// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Batch mutation operations for workflow documents.
//!
//! Operations are applied with optimistic concurrency (revision checks) and produce a minimal
//! delta that the UI can use to refresh derived state. A batch is all-or-nothing for hard
//! errors; ops that only reference missing elements are skipped, matching the document's
//! no-op semantics for stale references.

use std::collections::HashSet;

use crate::model::{
    Edge, EdgeId, ElementRef, GraphDocument, Node, NodeData, NodeDataPatch, NodeId, NodeKind,
    Point,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        node_id: Option<NodeId>,
        kind: NodeKind,
        position: Point,
        data: NodeData,
    },
    MoveNode {
        node_id: NodeId,
        position: Point,
    },
    UpdateNode {
        node_id: NodeId,
        patch: NodeDataPatch,
    },
    SetNodeNote {
        node_id: NodeId,
        note: Option<String>,
    },
    RemoveNode {
        node_id: NodeId,
    },
    AddEdge {
        edge_id: Option<EdgeId>,
        source: NodeId,
        target: NodeId,
        label: Option<String>,
    },
    RemoveEdge {
        edge_id: EdgeId,
    },
    SetMeta {
        name: Option<String>,
        description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub skipped: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
///
/// This is intentionally coarse: it reports only added/removed/updated `ElementRef`s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementRef>,
    pub removed: Vec<ElementRef>,
    pub updated: Vec<ElementRef>,
    pub meta_changed: bool,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.updated.is_empty()
            && !self.meta_changed
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ElementRef>,
    removed: HashSet<ElementRef>,
    updated: HashSet<ElementRef>,
    meta_changed: bool,
}

impl DeltaBuilder {
    fn record_added(&mut self, element: ElementRef) {
        self.removed.remove(&element);
        self.updated.remove(&element);
        self.added.insert(element);
    }

    fn record_removed(&mut self, element: ElementRef) {
        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&element) {
            self.updated.remove(&element);
            return;
        }
        self.updated.remove(&element);
        self.removed.insert(element);
    }

    fn record_updated(&mut self, element: ElementRef) {
        if self.added.contains(&element) || self.removed.contains(&element) {
            return;
        }
        self.updated.insert(element);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
            meta_changed: self.meta_changed,
        }
    }
}

pub fn apply_ops(
    doc: &mut GraphDocument,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = doc.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            skipped: 0,
            delta: Delta::default(),
        });
    }

    let mut working = doc.clone();
    let mut delta = DeltaBuilder::default();
    let mut applied = 0;
    let mut skipped = 0;

    for op in ops {
        match apply_op(&mut working, op, &mut delta)? {
            OpOutcome::Applied => applied += 1,
            OpOutcome::Skipped => skipped += 1,
        }
    }

    let delta = delta.finish();
    if delta.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied,
            skipped,
            delta,
        });
    }

    working.set_rev(current_rev.saturating_add(1));
    *doc = working;

    Ok(ApplyResult {
        new_rev: doc.rev(),
        applied,
        skipped,
        delta,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("stale base_rev (base_rev={base_rev}, current_rev={current_rev})")]
    Conflict { base_rev: u64, current_rev: u64 },
    #[error("element already exists ({0})")]
    AlreadyExists(ElementRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpOutcome {
    Applied,
    Skipped,
}

// Extracted per-op implementation.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
