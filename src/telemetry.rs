// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing initialization.
//!
//! The filter comes from `FLOWSTUDIO_LOG`, then `RUST_LOG`, then `info`:
//!
//! ```bash
//! FLOWSTUDIO_LOG=flowstudio::canvas=trace,flowstudio=debug flowstudio --demo
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV_VAR: &str = "FLOWSTUDIO_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Tracing target for process startup and shutdown.
pub const TRACING_TARGET: &str = "flowstudio::startup";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Used when the terminal belongs to the TUI.
    File(PathBuf),
    /// Used in stdio MCP mode, where stdout carries the protocol.
    Stderr,
}

pub fn init_tracing(sink: &LogSink) -> anyhow::Result<()> {
    let env_filter = create_env_filter(
        std::env::var(LOG_ENV_VAR).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    )?;

    match sink {
        LogSink::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(env_filter)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
        }
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .with(env_filter)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
        }
    }
    Ok(())
}

fn create_env_filter(primary: Option<&str>, fallback: Option<&str>) -> anyhow::Result<EnvFilter> {
    let directives = primary
        .or(fallback)
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE);
    EnvFilter::try_new(directives)
        .with_context(|| format!("invalid log filter {directives:?}"))
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
