// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// request handling on the session owner, op mapping, and error mapping.
fn read_response(session: &WorkflowSession) -> WorkflowReadResponse {
    let editor = session.editor();
    WorkflowReadResponse {
        rev: editor.document().rev(),
        modified: session.is_modified(),
        selected_node_id: editor.selection().map(ToString::to_string),
        in_flight: session
            .in_flight()
            .iter()
            .map(|action| action.as_str().to_owned())
            .collect(),
        workflow: session.record(),
    }
}

fn catalog_response() -> CatalogResponse {
    let entries = CATALOG
        .iter()
        .map(|entry| McpCatalogEntry {
            kind: entry.kind,
            label: entry.label.to_owned(),
            icon: entry.icon.to_owned(),
            description: entry.description.to_owned(),
            has_input: entry.kind.has_input_handle(),
            has_output: entry.kind.has_output_handle(),
            fields: NodeDetails::empty(entry.kind)
                .fields()
                .iter()
                .map(|field| field.key().to_owned())
                .collect(),
        })
        .collect();
    CatalogResponse { entries }
}

fn apply_request(
    session: &mut WorkflowSession,
    params: ApplyOpsParams,
    dry_run: bool,
) -> Result<ApplyOpsResponse, ErrorData> {
    let ApplyOpsParams { base_rev, ops } = params;
    let doc = session.editor().document();
    let ops = ops
        .iter()
        .map(|op| mcp_op_to_internal(op, doc))
        .collect::<Result<Vec<_>, _>>()?;

    if dry_run {
        let mut candidate = doc.clone();
        let result = apply_ops(&mut candidate, base_rev, &ops).map_err(map_apply_error)?;
        return Ok(apply_response(result));
    }

    let editor = session.editor_mut();
    let result = apply_ops(editor.document_mut(), base_rev, &ops).map_err(map_apply_error)?;
    editor.reconcile();
    tracing::info!(
        target: TRACING_TARGET,
        base_rev,
        new_rev = result.new_rev,
        applied = result.applied,
        skipped = result.skipped,
        "applied ops"
    );
    Ok(apply_response(result))
}

fn save_request(session: &mut WorkflowSession) -> Result<SaveResponse, ErrorData> {
    session.save().map_err(|rejected| {
        ErrorData::invalid_request(
            format!("save rejected: {rejected}"),
            Some(serde_json::json!({ "reason": rejected.to_string() })),
        )
    })?;
    Ok(SaveResponse {
        accepted: true,
        rev: session.editor().document().rev(),
    })
}

fn apply_response(result: ApplyResult) -> ApplyOpsResponse {
    let refs = |elements: Vec<ElementRef>| {
        elements
            .into_iter()
            .map(|element| element.to_string())
            .collect::<Vec<_>>()
    };
    ApplyOpsResponse {
        new_rev: result.new_rev,
        applied: result.applied as u64,
        skipped: result.skipped as u64,
        delta: DeltaSummary {
            added: refs(result.delta.added),
            removed: refs(result.delta.removed),
            updated: refs(result.delta.updated),
            meta_changed: result.delta.meta_changed,
        },
    }
}

fn mcp_op_to_internal(op: &McpOp, doc: &GraphDocument) -> Result<Op, ErrorData> {
    let op = match op {
        McpOp::AddNode {
            node_id,
            kind,
            x,
            y,
            label,
            description,
            data,
        } => {
            let node_id = node_id.as_deref().map(parse_node_id).transpose()?;
            let mut map = data.clone().unwrap_or_default();
            overlay_text(&mut map, "label", label.as_deref());
            overlay_text(&mut map, "description", description.as_deref());
            Op::AddNode {
                node_id,
                kind: *kind,
                position: Point::new(*x, *y),
                data: NodeData::from_wire(*kind, map),
            }
        }
        McpOp::MoveNode { node_id, x, y } => Op::MoveNode {
            node_id: parse_node_id(node_id)?,
            position: Point::new(*x, *y),
        },
        McpOp::UpdateNode {
            node_id,
            label,
            description,
            data,
        } => {
            let node_id = parse_node_id(node_id)?;
            // Attribute updates merge over the node's current wire form so typed fields are
            // re-parsed with the node's own kind.
            let patch = match (doc.node(&node_id), data) {
                (Some(node), Some(data)) => {
                    let mut map = node.data().to_wire();
                    map.extend(data.clone());
                    overlay_text(&mut map, "label", label.as_deref());
                    overlay_text(&mut map, "description", description.as_deref());
                    NodeDataPatch::from(NodeData::from_wire(node.kind(), map))
                }
                _ => NodeDataPatch {
                    label: label.clone(),
                    description: description.clone(),
                    ..NodeDataPatch::default()
                },
            };
            Op::UpdateNode { node_id, patch }
        }
        McpOp::SetNodeNote { node_id, note } => Op::SetNodeNote {
            node_id: parse_node_id(node_id)?,
            note: note.clone().filter(|note| !note.trim().is_empty()),
        },
        McpOp::RemoveNode { node_id } => Op::RemoveNode {
            node_id: parse_node_id(node_id)?,
        },
        McpOp::AddEdge {
            edge_id,
            source,
            target,
            label,
        } => Op::AddEdge {
            edge_id: edge_id.as_deref().map(parse_edge_id).transpose()?,
            source: parse_node_id(source)?,
            target: parse_node_id(target)?,
            label: label.clone(),
        },
        McpOp::RemoveEdge { edge_id } => Op::RemoveEdge {
            edge_id: parse_edge_id(edge_id)?,
        },
        McpOp::SetMeta { name, description } => Op::SetMeta {
            name: name.clone(),
            description: description.clone(),
        },
    };
    Ok(op)
}

fn overlay_text(map: &mut serde_json::Map<String, serde_json::Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), serde_json::Value::String(value.to_owned()));
    }
}

fn parse_node_id(node_id: &str) -> Result<NodeId, ErrorData> {
    NodeId::new(node_id).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid node_id: {err}"),
            Some(serde_json::json!({ "node_id": node_id })),
        )
    })
}

fn parse_edge_id(edge_id: &str) -> Result<EdgeId, ErrorData> {
    EdgeId::new(edge_id).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid edge_id: {err}"),
            Some(serde_json::json!({ "edge_id": edge_id })),
        )
    })
}

fn map_apply_error(err: ApplyError) -> ErrorData {
    match err {
        ApplyError::Conflict {
            base_rev,
            current_rev,
        } => ErrorData::invalid_request(
            "conflict: stale base_rev",
            Some(serde_json::json!({
                "base_rev": base_rev,
                "current_rev": current_rev,
                "snapshot_tool": "workflow.read",
            })),
        ),
        ApplyError::AlreadyExists(element) => ErrorData::invalid_params(
            "element already exists",
            Some(serde_json::json!({ "ref": element.to_string() })),
        ),
    }
}
