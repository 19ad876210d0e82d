// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use flowstudio::canvas::{handle_position, DragTransfer, HandleKind, PointerButton, Viewport};
use flowstudio::config::EditorConfig;
use flowstudio::editor::{catalog_entry, Editor, PanelField};
use flowstudio::model::{starter_workflow, NodeData, NodeId, NodeKind, Point};

fn empty_editor() -> Editor {
    Editor::new(starter_workflow("Scenarios"), EditorConfig::default())
}

fn drop_node(editor: &mut Editor, kind: NodeKind, client: Point) -> NodeId {
    let transfer = DragTransfer::node(&catalog_entry(kind).drag_payload()).expect("transfer");
    editor.drop_transfer(&transfer, client).expect("drop")
}

fn handle(editor: &Editor, node_id: &NodeId, kind: HandleKind) -> Point {
    let node = editor.document().node(node_id).expect("node");
    let at = handle_position(node, kind, editor.canvas().metrics()).expect("handle");
    editor.canvas().viewport().to_client(at)
}

#[test]
fn deleting_a_connected_node_removes_its_edges() {
    let mut editor = empty_editor();
    let start = drop_node(&mut editor, NodeKind::Input, Point::new(100.0, 100.0));
    let end = drop_node(&mut editor, NodeKind::Output, Point::new(400.0, 100.0));
    assert!(editor.rename_node(&start, "Start"));
    assert!(editor.rename_node(&end, "End"));

    let from = handle(&editor, &start, HandleKind::Output);
    let to = handle(&editor, &end, HandleKind::Input);
    editor.pointer_down(PointerButton::Left, from);
    editor.pointer_move(to);
    editor.pointer_up(to);
    assert_eq!(editor.document().edge_count(), 1);

    editor.delete_node(&start).expect("removed");

    let doc = editor.document();
    assert_eq!(doc.node_count(), 1);
    assert_eq!(doc.edge_count(), 0);
    let remaining = doc.nodes().next().expect("end node");
    assert_eq!(remaining.label(), "End");
    assert_eq!(remaining.position(), Point::new(400.0, 100.0));
}

#[test]
fn escaping_a_dirty_panel_confirms_before_discarding() {
    let mut editor = empty_editor();
    let node_id = editor
        .document_mut()
        .add_node(
            NodeKind::Task,
            Point::new(40.0, 40.0),
            NodeData::new(NodeKind::Task, "X"),
        )
        .id()
        .clone();
    editor.request_select(node_id.clone());

    editor
        .panel_mut()
        .expect("panel open")
        .set_text(&PanelField::Description, "hello")
        .expect("description");
    editor.escape();

    assert!(editor.prompt().is_some(), "closing a dirty panel asks first");
    assert!(editor.panel().is_some());

    editor.confirm_prompt();

    assert!(editor.panel().is_none());
    assert_eq!(editor.selection(), None);
    let node = editor.document().node(&node_id).expect("node");
    assert_eq!(node.data().description(), "");
}

#[test]
fn drop_position_is_inverse_transformed_into_document_space() {
    let mut editor = empty_editor();
    *editor.canvas_mut().viewport_mut() = Viewport::new(Point::new(20.0, 20.0), 2.0);

    let node_id = drop_node(&mut editor, NodeKind::Tool, Point::new(250.0, 150.0));

    let node = editor.document().node(&node_id).expect("node");
    assert_eq!(node.kind(), NodeKind::Tool);
    assert_eq!(node.position(), Point::new(115.0, 65.0));
}
