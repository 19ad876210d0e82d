// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{StoreError, WorkflowFolder, WriteDurability, WORKFLOW_FILENAME};
use crate::collab::WorkflowStore;
use crate::model::demo_workflow;

struct WorkflowFolderTestCtx {
    _tmp: TempDir,
    workflow_dir: PathBuf,
    folder: WorkflowFolder,
}

#[fixture]
fn ctx() -> WorkflowFolderTestCtx {
    let tmp = tempfile::Builder::new()
        .prefix("flowstudio-store-")
        .tempdir()
        .unwrap();
    let workflow_dir = tmp.path().join("support-desk");
    std::fs::create_dir_all(&workflow_dir).unwrap();
    let folder = WorkflowFolder::new(&workflow_dir);
    WorkflowFolderTestCtx {
        _tmp: tmp,
        workflow_dir,
        folder,
    }
}

#[rstest]
fn load_returns_none_for_an_empty_folder(ctx: WorkflowFolderTestCtx) {
    assert!(ctx.folder.load_workflow().unwrap().is_none());
}

#[rstest]
fn save_writes_versioned_wrapper_and_load_round_trips(ctx: WorkflowFolderTestCtx) {
    let doc = demo_workflow();
    ctx.folder.save_workflow(&doc.to_record()).unwrap();

    let raw = std::fs::read_to_string(ctx.workflow_dir.join(WORKFLOW_FILENAME)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["workflow"]["name"], "Support desk");
    assert_eq!(json["workflow"]["nodes"][0]["type"], "input");
    assert!(raw.ends_with('\n'));

    let loaded = ctx.folder.load_workflow().unwrap().unwrap();
    assert_eq!(loaded.to_record(), doc.to_record());
}

#[rstest]
fn save_leaves_no_temp_files_behind(ctx: WorkflowFolderTestCtx) {
    let folder = ctx.folder.clone().with_durability(WriteDurability::Durable);
    assert_eq!(folder.durability(), WriteDurability::Durable);
    folder.save_workflow(&demo_workflow().to_record()).unwrap();
    folder.save_workflow(&demo_workflow().to_record()).unwrap();

    let names = std::fs::read_dir(&ctx.workflow_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec![WORKFLOW_FILENAME.to_owned()]);
}

#[rstest]
fn load_or_init_seeds_a_starter_named_after_the_folder(ctx: WorkflowFolderTestCtx) {
    let doc = ctx.folder.load_or_init().unwrap();
    assert_eq!(doc.meta().name, "support-desk");
    assert!(doc.is_empty());
    assert!(ctx.folder.workflow_path().exists());

    let again = ctx.folder.load_or_init().unwrap();
    assert_eq!(again.meta().name, "support-desk");
}

#[rstest]
fn load_or_init_does_not_hide_parse_errors(ctx: WorkflowFolderTestCtx) {
    std::fs::write(ctx.folder.workflow_path(), "{ not json").unwrap();
    let err = ctx.folder.load_or_init().unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
}

#[rstest]
fn load_rejects_unknown_version(ctx: WorkflowFolderTestCtx) {
    std::fs::write(
        ctx.folder.workflow_path(),
        r#"{"version": 7, "workflow": {"name": "x"}}"#,
    )
    .unwrap();
    let err = ctx.folder.load_workflow().unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedVersion { version: 7, .. }));
}

#[rstest]
fn load_rejects_invalid_node_ids(ctx: WorkflowFolderTestCtx) {
    std::fs::write(
        ctx.folder.workflow_path(),
        r#"{"version": 1, "workflow": {"name": "x", "nodes": [
            {"id": "a/b", "type": "tool", "position": {"x": 0, "y": 0}, "data": {"label": "T"}}
        ]}}"#,
    )
    .unwrap();
    let err = ctx.folder.load_workflow().unwrap_err();
    assert!(matches!(err, StoreError::Record { .. }));
}

#[rstest]
fn save_creates_a_missing_workflow_dir(ctx: WorkflowFolderTestCtx) {
    let nested = WorkflowFolder::new(ctx.workflow_dir.join("nested/deeper"));
    nested.save_workflow(&demo_workflow().to_record()).unwrap();
    assert!(nested.workflow_path().exists());
}

#[cfg(unix)]
#[rstest]
fn save_refuses_writing_through_a_symlinked_workflow_file(ctx: WorkflowFolderTestCtx) {
    let outside = ctx.workflow_dir.join("outside.json");
    std::fs::write(&outside, "{}").unwrap();
    std::os::unix::fs::symlink(&outside, ctx.folder.workflow_path()).unwrap();

    let err = ctx
        .folder
        .save_workflow(&demo_workflow().to_record())
        .unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
    assert_eq!(std::fs::read_to_string(&outside).unwrap(), "{}");
}

#[rstest]
#[tokio::test]
async fn store_trait_saves_and_reports_location(ctx: WorkflowFolderTestCtx) {
    let receipt = ctx.folder.save(demo_workflow().to_record()).await.unwrap();
    assert!(receipt.location.ends_with(WORKFLOW_FILENAME));
    assert!(ctx.folder.load_workflow().unwrap().is_some());
}
