// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use crate::model::{NodeKind, WorkflowRecord};

use super::{CollabError, ExecutionReport, WorkflowDeployer, WorkflowRunner, TRACING_TARGET};

/// Stand-in execution backend. Waits for `latency`, then decides from the graph shape alone.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    latency: Duration,
}

impl SimulatedExecutor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait::async_trait]
impl WorkflowRunner for SimulatedExecutor {
    async fn run(&self, workflow: WorkflowRecord) -> Result<ExecutionReport, CollabError> {
        tracing::debug!(
            target: TRACING_TARGET,
            workflow = %workflow.name,
            latency_ms = self.latency.as_millis(),
            "simulated run started"
        );
        tokio::time::sleep(self.latency).await;

        if workflow.nodes.is_empty() {
            return Err(CollabError::Rejected("workflow has no nodes".to_owned()));
        }
        if !workflow.nodes.iter().any(|node| node.kind == NodeKind::Input) {
            return Err(CollabError::Rejected(
                "workflow has no input node to start from".to_owned(),
            ));
        }

        Ok(ExecutionReport {
            summary: format!(
                "run completed: {} nodes, {} edges",
                workflow.nodes.len(),
                workflow.edges.len()
            ),
        })
    }
}

#[async_trait::async_trait]
impl WorkflowDeployer for SimulatedExecutor {
    async fn deploy(&self, workflow: WorkflowRecord) -> Result<ExecutionReport, CollabError> {
        tracing::debug!(
            target: TRACING_TARGET,
            workflow = %workflow.name,
            latency_ms = self.latency.as_millis(),
            "simulated deploy started"
        );
        tokio::time::sleep(self.latency).await;

        if workflow.nodes.is_empty() {
            return Err(CollabError::Rejected("cannot deploy an empty workflow".to_owned()));
        }

        Ok(ExecutionReport {
            summary: format!("deployed {:?} ({} nodes)", workflow.name, workflow.nodes.len()),
        })
    }
}
