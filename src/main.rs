// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowstudio CLI entrypoint.
//!
//! By default this runs the interactive TUI and serves MCP over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp`. With `--mcp` the MCP server runs over stdio instead and the
//! workflow is edited headlessly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use axum::Router;
use clap::Parser;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tokio::sync::mpsc;

use flowstudio::collab::{HttpContentFetcher, SimulatedExecutor};
use flowstudio::config::{Cli, EditorConfig};
use flowstudio::editor::Editor;
use flowstudio::mcp::{handle_request, mcp_inbox, FlowstudioMcp, McpRequest};
use flowstudio::model::{demo_workflow, GraphDocument};
use flowstudio::session::{Collaborators, WorkflowSession};
use flowstudio::store::WorkflowFolder;
use flowstudio::telemetry::{init_tracing, LogSink, TRACING_TARGET};

/// How often the headless loop applies finished Save/Run/Deploy/fetch tasks.
const OUTCOME_POLL: Duration = Duration::from_millis(50);

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(target: TRACING_TARGET, error = %format!("{err:#}"), "exiting with error");
        eprintln!("flowstudio: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let sink = if cli.mcp {
        LogSink::Stderr
    } else {
        LogSink::File(cli.log_file_path())
    };
    init_tracing(&sink)?;
    cli.log();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async move {
        let (folder, doc) = open_workflow(&cli)?;
        let executor = Arc::new(SimulatedExecutor::new(cli.simulated_latency()));
        let collaborators = Collaborators {
            store: Arc::new(folder),
            runner: executor.clone(),
            deployer: executor,
            fetcher: Arc::new(HttpContentFetcher::new()?),
        };
        let session = WorkflowSession::new(Editor::new(doc, EditorConfig::default()), collaborators);
        let (inbox, requests) = mcp_inbox();
        let mcp = FlowstudioMcp::new(inbox);

        if cli.mcp {
            serve_headless(session, mcp, requests).await
        } else {
            serve_tui(session, mcp, requests, cli.mcp_http_port).await
        }
    })
}

fn open_workflow(cli: &Cli) -> anyhow::Result<(WorkflowFolder, GraphDocument)> {
    if cli.demo {
        let folder = WorkflowFolder::new(demo_dir()).with_durability(cli.durability());
        let doc = demo_workflow();
        folder.save_workflow(&doc.to_record())?;
        tracing::info!(target: TRACING_TARGET, root = %folder.root().display(), "demo workflow written");
        return Ok((folder, doc));
    }

    let folder = WorkflowFolder::new(cli.workflow_dir()).with_durability(cli.durability());
    let doc = folder.load_or_init()?;
    Ok((folder, doc))
}

fn demo_dir() -> PathBuf {
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    std::env::temp_dir().join(format!(
        "flowstudio-demo-{}-{now_millis}",
        std::process::id()
    ))
}

/// Serves MCP over stdio and edits the workflow without a terminal UI.
async fn serve_headless(
    mut session: WorkflowSession,
    mcp: FlowstudioMcp,
    mut requests: mpsc::Receiver<McpRequest>,
) -> anyhow::Result<()> {
    let transport = mcp.serve_stdio();
    tokio::pin!(transport);
    let mut poll = tokio::time::interval(OUTCOME_POLL);

    // Requests still queued when the client disconnects have nobody to answer to.
    let result = loop {
        tokio::select! {
            result = &mut transport => break result,
            Some(request) = requests.recv() => handle_request(&mut session, request),
            _ = poll.tick() => {
                session.drain_outcomes();
                for notification in session.take_notifications() {
                    tracing::info!(
                        target: TRACING_TARGET,
                        level = ?notification.level,
                        message = %notification.message,
                        "notification"
                    );
                }
            }
        }
    };

    session.shutdown();
    result.context("MCP stdio transport failed")?;
    tracing::info!(target: TRACING_TARGET, "stdio session closed");
    Ok(())
}

/// Runs the TUI on a blocking thread while serving MCP over streamable HTTP.
async fn serve_tui(
    session: WorkflowSession,
    mcp: FlowstudioMcp,
    requests: mpsc::Receiver<McpRequest>,
    port: u16,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind MCP port {port}"))?;
    let address = listener.local_addr()?;

    let config = StreamableHttpServerConfig {
        stateful_mode: true,
        ..StreamableHttpServerConfig::default()
    };
    let shutdown_token = config.cancellation_token.clone();
    let server_shutdown = shutdown_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);
    let router = Router::new().nest_service("/mcp", mcp_service);

    tracing::info!(target: TRACING_TARGET, url = %format!("http://{address}/mcp"), "serving MCP");
    let server_handle = tokio::spawn(async move {
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            server_shutdown.cancelled().await;
        });
        if let Err(err) = serve.await {
            tracing::error!(target: TRACING_TARGET, error = %err, "MCP HTTP server error");
        }
    });

    let tui_join =
        tokio::task::spawn_blocking(move || flowstudio::tui::run(session, Some(requests))).await;

    shutdown_token.cancel();
    let _ = server_handle.await;

    tui_join
        .context("TUI thread failed")?
        .map_err(|err| anyhow::anyhow!(err))?;
    tracing::info!(target: TRACING_TARGET, "TUI closed");
    Ok(())
}
