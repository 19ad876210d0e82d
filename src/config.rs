// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Binary and editor configuration.
//!
//! ```text
//! flowstudio [DIR]            # TUI, MCP over http://127.0.0.1:<port>/mcp
//! flowstudio --workflow DIR   # same, explicit flag
//! flowstudio --demo           # built-in demo workflow
//! flowstudio [DIR] --mcp      # MCP over stdio, no TUI
//! ```
//!
//! Every option can also come from the environment (see `--help`).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::canvas::{CanvasMetrics, ZoomBounds};
use crate::model::Point;
use crate::store::WriteDurability;

pub const DEFAULT_MCP_HTTP_PORT: u16 = 27436;
pub const LOG_FILE_NAME: &str = "flowstudio.log";

/// Tracing target for configuration logs.
pub const TRACING_TARGET: &str = "flowstudio::config";

#[derive(Debug, Clone, Parser)]
#[command(name = "flowstudio")]
#[command(about = "Visual workflow graph editor for the terminal")]
#[command(version)]
pub struct Cli {
    /// Workflow folder. Defaults to the current directory.
    #[arg(value_name = "DIR", conflicts_with_all = ["workflow", "demo"])]
    pub dir: Option<PathBuf>,

    /// Workflow folder, as an explicit flag.
    #[arg(long, value_name = "DIR", conflicts_with = "demo")]
    pub workflow: Option<PathBuf>,

    /// Start from the built-in demo workflow (saved to a temporary folder).
    #[arg(long)]
    pub demo: bool,

    /// Serve MCP over stdio instead of running the TUI.
    #[arg(long)]
    pub mcp: bool,

    /// Port of the streamable HTTP MCP endpoint in TUI mode (0 = ephemeral).
    #[arg(long, env = "FLOWSTUDIO_MCP_PORT", default_value_t = DEFAULT_MCP_HTTP_PORT)]
    pub mcp_http_port: u16,

    /// fsync workflow writes where supported.
    #[arg(long)]
    pub durable_writes: bool,

    /// Latency of the simulated Run/Deploy collaborator, in milliseconds.
    #[arg(long, env = "FLOWSTUDIO_SIM_LATENCY_MS", default_value_t = 800)]
    pub simulated_latency_ms: u64,

    /// Log file used in TUI mode. Defaults to `<DIR>/flowstudio.log`.
    #[arg(long, env = "FLOWSTUDIO_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn workflow_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| self.workflow.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_file_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        if self.demo {
            return std::env::temp_dir().join(LOG_FILE_NAME);
        }
        self.workflow_dir().join(LOG_FILE_NAME)
    }

    pub fn durability(&self) -> WriteDurability {
        if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        }
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Logs the resolved configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET,
            version = env!("CARGO_PKG_VERSION"),
            pid = std::process::id(),
            mode = if self.mcp { "mcp-stdio" } else { "tui" },
            demo = self.demo,
            workflow_dir = %self.workflow_dir().display(),
            mcp_http_port = self.mcp_http_port,
            durable_writes = self.durable_writes,
            simulated_latency_ms = self.simulated_latency_ms,
            "configuration"
        );
    }
}

/// Editor tunables. Passed into the editor explicitly; nothing reads global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Document-space offset applied to clones.
    pub clone_offset: Point,
    pub zoom_bounds: ZoomBounds,
    /// Zoom factor per wheel notch.
    pub wheel_zoom_step: f64,
    pub metrics: CanvasMetrics,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            clone_offset: Point::new(50.0, 50.0),
            zoom_bounds: ZoomBounds::default(),
            wheel_zoom_step: 1.1,
            metrics: CanvasMetrics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, DEFAULT_MCP_HTTP_PORT};
    use crate::store::WriteDurability;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("flowstudio").chain(args.iter().copied()))
    }

    #[test]
    fn parses_empty_args() {
        let cli = parse(&[]).expect("parse");
        assert_eq!(cli.workflow_dir(), PathBuf::from("."));
        assert!(!cli.demo);
        assert!(!cli.mcp);
        assert_eq!(cli.durability(), WriteDurability::BestEffort);
        assert_eq!(cli.log_file_path(), PathBuf::from("./flowstudio.log"));
    }

    #[test]
    fn parses_positional_and_flag_dirs() {
        let cli = parse(&["some/dir", "--mcp"]).expect("parse");
        assert_eq!(cli.workflow_dir(), PathBuf::from("some/dir"));
        assert!(cli.mcp);

        let cli = parse(&["--workflow", "other"]).expect("parse");
        assert_eq!(cli.workflow_dir(), PathBuf::from("other"));
    }

    #[test]
    fn parses_demo_and_mcp_in_any_order() {
        for args in [["--demo", "--mcp"], ["--mcp", "--demo"]] {
            let cli = parse(&args).expect("parse");
            assert!(cli.demo && cli.mcp);
        }
    }

    #[test]
    fn rejects_demo_with_workflow_dir() {
        parse(&["--demo", "--workflow", "."]).unwrap_err();
        parse(&["dir", "--demo"]).unwrap_err();
    }

    #[test]
    fn rejects_positional_dir_with_workflow_flag() {
        parse(&["one", "--workflow", "two"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cli = parse(&[
            "--mcp-http-port",
            "0",
            "--durable-writes",
            "--simulated-latency-ms",
            "5",
            "--log-file",
            "/tmp/fs.log",
        ])
        .expect("parse");
        assert_eq!(cli.mcp_http_port, 0);
        assert_eq!(cli.durability(), WriteDurability::Durable);
        assert_eq!(cli.simulated_latency().as_millis(), 5);
        assert_eq!(cli.log_file_path(), PathBuf::from("/tmp/fs.log"));
        assert_ne!(DEFAULT_MCP_HTTP_PORT, 0);
    }
}
