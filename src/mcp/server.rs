// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::{mpsc, oneshot};

use crate::editor::CATALOG;
use crate::model::{
    EdgeId, ElementRef, GraphDocument, NodeData, NodeDataPatch, NodeDetails, NodeId, Point,
};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};
use crate::session::WorkflowSession;

use super::types::*;
use super::TRACING_TARGET;

/// Requests queued between the MCP transport and the session owner.
pub const INBOX_CAPACITY: usize = 32;

pub type Reply<T> = oneshot::Sender<Result<T, ErrorData>>;

/// A tool call waiting to be served by whoever owns the `WorkflowSession`.
#[derive(Debug)]
pub enum McpRequest {
    Read {
        reply: Reply<WorkflowReadResponse>,
    },
    ApplyOps {
        params: ApplyOpsParams,
        /// Validate and compute the delta on a copy, leaving the session untouched.
        dry_run: bool,
        reply: Reply<ApplyOpsResponse>,
    },
    Save {
        reply: Reply<SaveResponse>,
    },
}

impl McpRequest {
    fn tool_name(&self) -> &'static str {
        match self {
            Self::Read { .. } => "workflow.read",
            Self::ApplyOps { dry_run: false, .. } => "workflow.apply_ops",
            Self::ApplyOps { dry_run: true, .. } => "workflow.propose_ops",
            Self::Save { .. } => "workflow.save",
        }
    }
}

pub fn mcp_inbox() -> (mpsc::Sender<McpRequest>, mpsc::Receiver<McpRequest>) {
    mpsc::channel(INBOX_CAPACITY)
}

/// Serves one request against the live session. Must run on the thread that owns it.
pub fn handle_request(session: &mut WorkflowSession, request: McpRequest) {
    tracing::debug!(target: TRACING_TARGET, tool = request.tool_name(), "serving request");
    // A dropped reply receiver means the client went away; nothing to report.
    match request {
        McpRequest::Read { reply } => {
            let _ = reply.send(Ok(read_response(session)));
        }
        McpRequest::ApplyOps {
            params,
            dry_run,
            reply,
        } => {
            let _ = reply.send(apply_request(session, params, dry_run));
        }
        McpRequest::Save { reply } => {
            let _ = reply.send(save_request(session));
        }
    }
}

/// Serves every request already queued. Returns how many were handled.
pub fn drain_requests(session: &mut WorkflowSession, inbox: &mut mpsc::Receiver<McpRequest>) -> usize {
    let mut handled = 0;
    while let Ok(request) = inbox.try_recv() {
        handle_request(session, request);
        handled += 1;
    }
    handled
}

#[derive(Clone)]
pub struct FlowstudioMcp {
    inbox: mpsc::Sender<McpRequest>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FlowstudioMcp {
    pub fn new(inbox: mpsc::Sender<McpRequest>) -> Self {
        Self {
            inbox,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Current workflow document, revision, selection and running actions.
    #[tool(name = "workflow.read")]
    async fn workflow_read(&self) -> Result<Json<WorkflowReadResponse>, ErrorData> {
        self.request(|reply| McpRequest::Read { reply })
            .await
            .map(Json)
    }

    /// Node types that can be added, with their handles and well-known data keys.
    #[tool(name = "workflow.catalog")]
    async fn workflow_catalog(&self) -> Result<Json<CatalogResponse>, ErrorData> {
        Ok(Json(catalog_response()))
    }

    /// Applies a batch of ops against `base_rev`. The batch is all-or-nothing.
    #[tool(name = "workflow.apply_ops")]
    async fn workflow_apply_ops(
        &self,
        params: Parameters<ApplyOpsParams>,
    ) -> Result<Json<ApplyOpsResponse>, ErrorData> {
        let params = params.0;
        self.request(|reply| McpRequest::ApplyOps {
            params,
            dry_run: false,
            reply,
        })
        .await
        .map(Json)
    }

    /// Like `workflow.apply_ops`, but only reports the resulting delta.
    #[tool(name = "workflow.propose_ops")]
    async fn workflow_propose_ops(
        &self,
        params: Parameters<ApplyOpsParams>,
    ) -> Result<Json<ApplyOpsResponse>, ErrorData> {
        let params = params.0;
        self.request(|reply| McpRequest::ApplyOps {
            params,
            dry_run: true,
            reply,
        })
        .await
        .map(Json)
    }

    /// Starts a save. The outcome is reported in the editor's notifications.
    #[tool(name = "workflow.save")]
    async fn workflow_save(&self) -> Result<Json<SaveResponse>, ErrorData> {
        self.request(|reply| McpRequest::Save { reply })
            .await
            .map(Json)
    }
}

impl FlowstudioMcp {
    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> McpRequest,
    ) -> Result<T, ErrorData> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(build(reply))
            .await
            .map_err(|_| ErrorData::internal_error("workflow session is closed", None))?;
        response.await.map_err(|_| {
            ErrorData::internal_error("workflow session dropped the request", None)
        })?
    }
}

#[tool_handler]
impl ServerHandler for FlowstudioMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Flowstudio workflow editor (tools: workflow.read, workflow.catalog, workflow.apply_ops, workflow.propose_ops, workflow.save). Read first, then pass the returned rev as base_rev."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Extracted MCP helpers.
include!("server/helpers.rs");
