// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Single-op application used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(
    doc: &mut GraphDocument,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<OpOutcome, ApplyError> {
    match op {
        Op::AddNode {
            node_id,
            kind,
            position,
            data,
        } => {
            let id = match node_id {
                Some(node_id) => {
                    let node = Node::new(node_id.clone(), *kind, *position, data.clone());
                    if !doc.insert_node(node) {
                        return Err(ApplyError::AlreadyExists(ElementRef::Node(node_id.clone())));
                    }
                    node_id.clone()
                }
                None => doc.add_node(*kind, *position, data.clone()).id().clone(),
            };
            delta.record_added(ElementRef::Node(id));
            Ok(OpOutcome::Applied)
        }
        Op::MoveNode { node_id, position } => {
            if !doc.update_node_position(node_id, *position) {
                return Ok(OpOutcome::Skipped);
            }
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(OpOutcome::Applied)
        }
        Op::UpdateNode { node_id, patch } => {
            if !doc.update_node_data(node_id, patch.clone()) {
                return Ok(OpOutcome::Skipped);
            }
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(OpOutcome::Applied)
        }
        Op::SetNodeNote { node_id, note } => {
            let note = note.clone().filter(|note| !note.trim().is_empty());
            if !doc.update_node_data(node_id, NodeDataPatch::note(note)) {
                return Ok(OpOutcome::Skipped);
            }
            delta.record_updated(ElementRef::Node(node_id.clone()));
            Ok(OpOutcome::Applied)
        }
        Op::RemoveNode { node_id } => {
            let Some(removed) = doc.remove_node(node_id) else {
                return Ok(OpOutcome::Skipped);
            };
            for edge in &removed.edges {
                delta.record_removed(ElementRef::Edge(edge.id().clone()));
            }
            delta.record_removed(ElementRef::Node(node_id.clone()));
            Ok(OpOutcome::Applied)
        }
        Op::AddEdge {
            edge_id,
            source,
            target,
            label,
        } => {
            if !doc.contains_node(source) || !doc.contains_node(target) {
                return Ok(OpOutcome::Skipped);
            }
            let id = match edge_id {
                Some(edge_id) => {
                    if doc.edge(edge_id).is_some() {
                        return Err(ApplyError::AlreadyExists(ElementRef::Edge(edge_id.clone())));
                    }
                    let edge =
                        Edge::new(edge_id.clone(), source.clone(), target.clone(), label.clone());
                    doc.insert_edge(edge);
                    edge_id.clone()
                }
                None => match doc.add_edge(source, target, label.clone()) {
                    Some(edge) => edge.id().clone(),
                    None => return Ok(OpOutcome::Skipped),
                },
            };
            delta.record_added(ElementRef::Edge(id));
            Ok(OpOutcome::Applied)
        }
        Op::RemoveEdge { edge_id } => {
            if doc.remove_edge(edge_id).is_none() {
                return Ok(OpOutcome::Skipped);
            }
            delta.record_removed(ElementRef::Edge(edge_id.clone()));
            Ok(OpOutcome::Applied)
        }
        Op::SetMeta { name, description } => {
            if let Some(name) = name {
                doc.set_name(name.clone());
            }
            if let Some(description) = description {
                doc.set_description(description.clone());
            }
            delta.meta_changed |= name.is_some() || description.is_some();
            Ok(OpOutcome::Applied)
        }
    }
}
