// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::model::{
    EdgeId, ElementRef, GraphDocument, NodeData, NodeDataPatch, NodeId, NodeKind, Point,
    WorkflowMeta,
};

use super::{apply_ops, ApplyError, Op};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

fn add_node_op(id: &str, kind: NodeKind, label: &str) -> Op {
    Op::AddNode {
        node_id: Some(nid(id)),
        kind,
        position: Point::new(0.0, 0.0),
        data: NodeData::new(kind, label),
    }
}

/// `input-1 -> agent-2 -> output-3`, at rev 1.
#[fixture]
fn chain() -> GraphDocument {
    let mut doc = GraphDocument::new(WorkflowMeta::new("chain", ""));
    apply_ops(
        &mut doc,
        0,
        &[
            add_node_op("input-1", NodeKind::Input, "In"),
            add_node_op("agent-2", NodeKind::Agent, "Agent"),
            add_node_op("output-3", NodeKind::Output, "Out"),
            Op::AddEdge {
                edge_id: Some(eid("edge-4")),
                source: nid("input-1"),
                target: nid("agent-2"),
                label: None,
            },
            Op::AddEdge {
                edge_id: Some(eid("edge-5")),
                source: nid("agent-2"),
                target: nid("output-3"),
                label: None,
            },
        ],
    )
    .expect("seed chain");
    doc
}

#[rstest]
fn apply_bumps_rev_once_per_batch(chain: GraphDocument) {
    assert_eq!(chain.rev(), 1);
    assert_eq!(chain.node_count(), 3);
    assert_eq!(chain.edge_count(), 2);
}

#[rstest]
fn stale_base_rev_is_a_conflict(mut chain: GraphDocument) {
    let before = chain.clone();
    let err = apply_ops(&mut chain, 0, &[Op::RemoveNode { node_id: nid("agent-2") }])
        .expect_err("conflict");
    assert_eq!(
        err,
        ApplyError::Conflict {
            base_rev: 0,
            current_rev: 1
        }
    );
    assert_eq!(chain, before);
}

#[rstest]
fn remove_node_reports_cascaded_edges(mut chain: GraphDocument) {
    let result =
        apply_ops(&mut chain, 1, &[Op::RemoveNode { node_id: nid("agent-2") }]).expect("apply");

    assert_eq!(result.new_rev, 2);
    assert_eq!(
        result.delta.removed,
        vec![
            ElementRef::Node(nid("agent-2")),
            ElementRef::Edge(eid("edge-4")),
            ElementRef::Edge(eid("edge-5")),
        ]
    );
    assert_eq!(chain.edge_count(), 0);
}

#[rstest]
#[case::move_missing(Op::MoveNode { node_id: nid("ghost"), position: Point::new(1.0, 1.0) })]
#[case::update_missing(Op::UpdateNode { node_id: nid("ghost"), patch: NodeDataPatch::label("x") })]
#[case::remove_missing(Op::RemoveNode { node_id: nid("ghost") })]
#[case::remove_missing_edge(Op::RemoveEdge { edge_id: eid("edge-99") })]
#[case::dangling_edge(Op::AddEdge {
    edge_id: None,
    source: nid("input-1"),
    target: nid("ghost"),
    label: None,
})]
fn ops_on_missing_elements_are_skipped(mut chain: GraphDocument, #[case] op: Op) {
    let before = chain.clone();
    let result = apply_ops(&mut chain, 1, &[op]).expect("apply");
    assert_eq!(result.applied, 0);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.new_rev, 1);
    assert_eq!(chain, before);
}

#[rstest]
fn duplicate_explicit_id_fails_the_whole_batch(mut chain: GraphDocument) {
    let before = chain.clone();
    let err = apply_ops(
        &mut chain,
        1,
        &[
            Op::MoveNode {
                node_id: nid("input-1"),
                position: Point::new(5.0, 5.0),
            },
            add_node_op("agent-2", NodeKind::Agent, "dup"),
        ],
    )
    .expect_err("duplicate");
    assert_eq!(err, ApplyError::AlreadyExists(ElementRef::Node(nid("agent-2"))));
    assert_eq!(chain, before);
}

#[rstest]
fn add_then_remove_in_one_batch_nets_out(mut chain: GraphDocument) {
    let result = apply_ops(
        &mut chain,
        1,
        &[
            add_node_op("task-9", NodeKind::Task, "temp"),
            Op::RemoveNode {
                node_id: nid("task-9"),
            },
        ],
    )
    .expect("apply");
    assert!(result.delta.is_empty());
    assert_eq!(result.new_rev, 1);
    assert_eq!(result.applied, 2);
}

#[rstest]
fn note_and_meta_updates(mut chain: GraphDocument) {
    let result = apply_ops(
        &mut chain,
        1,
        &[
            Op::SetNodeNote {
                node_id: nid("agent-2"),
                note: Some("check tone".to_owned()),
            },
            Op::SetMeta {
                name: Some("renamed".to_owned()),
                description: None,
            },
        ],
    )
    .expect("apply");

    assert!(result.delta.meta_changed);
    assert_eq!(result.delta.updated, vec![ElementRef::Node(nid("agent-2"))]);
    assert_eq!(chain.meta().name, "renamed");
    assert_eq!(
        chain.node(&nid("agent-2")).and_then(|n| n.data().note()),
        Some("check tone")
    );
}

#[rstest]
fn blank_note_clears_it(mut chain: GraphDocument) {
    apply_ops(
        &mut chain,
        1,
        &[Op::SetNodeNote {
            node_id: nid("agent-2"),
            note: Some("x".to_owned()),
        }],
    )
    .expect("set");
    apply_ops(
        &mut chain,
        2,
        &[Op::SetNodeNote {
            node_id: nid("agent-2"),
            note: Some("   ".to_owned()),
        }],
    )
    .expect("clear");
    assert_eq!(chain.node(&nid("agent-2")).and_then(|n| n.data().note()), None);
}

#[rstest]
fn generated_ids_land_in_the_delta(mut chain: GraphDocument) {
    let result = apply_ops(
        &mut chain,
        1,
        &[Op::AddNode {
            node_id: None,
            kind: NodeKind::Memory,
            position: Point::new(10.0, 10.0),
            data: NodeData::new(NodeKind::Memory, "Cache"),
        }],
    )
    .expect("apply");

    let [ElementRef::Node(id)] = result.delta.added.as_slice() else {
        panic!("expected one added node, got {:?}", result.delta.added);
    };
    assert!(id.as_str().starts_with("memory-"));
    assert!(chain.contains_node(id));
}
