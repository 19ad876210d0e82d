// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! External collaborators of the editor.
//!
//! - [`WorkflowStore`]: persists a serialized workflow on explicit Save
//! - [`WorkflowRunner`] / [`WorkflowDeployer`]: execution and deployment
//! - [`ContentFetcher`]: loads remote specification content for tool nodes
//!
//! The session only talks to these traits, so tests swap in fakes and the binary wires
//! [`crate::store::WorkflowFolder`], [`SimulatedExecutor`] and [`HttpContentFetcher`].

mod executor;
mod fetch;

pub use executor::SimulatedExecutor;
pub use fetch::{detect_format, ContentFormat, FetchError, FetchedContent, HttpContentFetcher};

use crate::model::WorkflowRecord;
use crate::store::StoreError;

/// Tracing target for collaborator calls.
pub const TRACING_TARGET: &str = "flowstudio::collab";

#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The collaborator processed the request and reported failure.
    #[error("{0}")]
    Rejected(String),
    #[error("collaborator task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Where the workflow ended up (a path, URL or record id).
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub summary: String,
}

#[async_trait::async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn save(&self, workflow: WorkflowRecord) -> Result<SaveReceipt, CollabError>;
}

#[async_trait::async_trait]
pub trait WorkflowRunner: Send + Sync {
    async fn run(&self, workflow: WorkflowRecord) -> Result<ExecutionReport, CollabError>;
}

#[async_trait::async_trait]
pub trait WorkflowDeployer: Send + Sync {
    async fn deploy(&self, workflow: WorkflowRecord) -> Result<ExecutionReport, CollabError>;
}

#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<FetchedContent, FetchError>;
}
