// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! MCP access to the live workflow.
//!
//! Tool calls never touch the session directly: they are queued as [`McpRequest`]s and served by
//! the session owner via [`handle_request`] / [`drain_requests`].

mod server;
mod types;

pub use server::{drain_requests, handle_request, mcp_inbox, FlowstudioMcp, McpRequest, Reply};
pub use types::*;

/// Tracing target for MCP traffic.
pub const TRACING_TARGET: &str = "flowstudio::mcp";
