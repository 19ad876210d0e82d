// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

use flowstudio::editor::CATALOG;
use flowstudio::model::{starter_workflow, GraphDocument, NodeData, NodeId, Point};

pub const COLUMNS: usize = 12;
pub const COLUMN_GAP: f64 = 240.0;
pub const ROW_GAP: f64 = 120.0;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub const ALL: [Case; 3] = [Case::Small, Case::Medium, Case::Large];

    pub fn id(self) -> &'static str {
        match self {
            Case::Small => "small",
            Case::Medium => "medium",
            Case::Large => "large",
        }
    }

    pub fn nodes(self) -> usize {
        match self {
            Case::Small => 8,
            Case::Medium => 120,
            Case::Large => 1200,
        }
    }
}

/// Deterministic grid of nodes cycling through the catalog, each row chained left to right.
pub fn fixture(case: Case) -> GraphDocument {
    let mut doc = starter_workflow(format!("bench_{}", case.id()));
    let mut previous: Option<NodeId> = None;
    for idx in 0..case.nodes() {
        let entry = &CATALOG[idx % CATALOG.len()];
        let position = grid_position(idx);
        let mut data = NodeData::new(entry.kind, format!("{} {idx}", entry.label));
        data.set_description(format!("bench node {idx:05}"));
        let node_id = doc.add_node(entry.kind, position, data).id().clone();

        if idx % COLUMNS != 0 {
            if let Some(previous) = previous.as_ref() {
                doc.add_edge(previous, &node_id, None);
            }
        }
        previous = Some(node_id);
    }
    doc
}

pub fn grid_position(idx: usize) -> Point {
    Point::new(
        (idx % COLUMNS) as f64 * COLUMN_GAP,
        (idx / COLUMNS) as f64 * ROW_GAP,
    )
}
