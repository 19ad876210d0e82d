// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::document::{GraphDocument, WorkflowMeta};
use super::geometry::Point;
use super::node::{AttrValue, DetailField, NodeData, NodeKind};

/// Empty workflow used when a folder has no saved workflow yet.
pub fn starter_workflow(name: impl Into<String>) -> GraphDocument {
    GraphDocument::new(WorkflowMeta::new(name, ""))
}

/// A small support-desk pipeline: input -> agent -> tool -> output.
pub fn demo_workflow() -> GraphDocument {
    let mut doc = GraphDocument::new(WorkflowMeta::new(
        "Support desk",
        "Answers customer questions using the knowledge base",
    ));

    let mut question = NodeData::new(NodeKind::Input, "Customer question");
    question.set_description("Free-form text from the help widget");

    let mut agent = NodeData::new(NodeKind::Agent, "Support agent");
    agent.set_description("Drafts an answer and decides when to search");
    agent.set_note(Some("Keep answers under 120 words"));
    set_detail(&mut agent, DetailField::Model, AttrValue::Text("gpt-4o-mini".to_owned()));
    set_detail(&mut agent, DetailField::Temperature, AttrValue::Number(0.2));

    let mut search = NodeData::new(NodeKind::Tool, "Knowledge search");
    search.set_description("Full-text search over published articles");
    search.set_note(Some("Index is rebuilt nightly"));
    set_detail(&mut search, DetailField::ToolId, AttrValue::Text("kb-search".to_owned()));

    let mut answer = NodeData::new(NodeKind::Output, "Answer");
    set_detail(&mut answer, DetailField::OutputFormat, AttrValue::Text("markdown".to_owned()));

    let ids = [
        (NodeKind::Input, Point::new(80.0, 160.0), question),
        (NodeKind::Agent, Point::new(340.0, 160.0), agent),
        (NodeKind::Tool, Point::new(600.0, 160.0), search),
        (NodeKind::Output, Point::new(860.0, 160.0), answer),
    ]
    .into_iter()
    .map(|(kind, position, data)| doc.add_node(kind, position, data).id().clone())
    .collect::<Vec<_>>();

    for pair in ids.windows(2) {
        doc.add_edge(&pair[0], &pair[1], None);
    }
    doc.set_rev(0);
    doc
}

fn set_detail(data: &mut NodeData, field: DetailField, value: AttrValue) {
    // Demo fields always match the node kind.
    let _ = data.details_mut().set(field, Some(value));
}
