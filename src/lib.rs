// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowstudio: a terminal visual editor for AI workflow graphs, with an MCP surface.
//!
//! The document model lives in [`model`] and is only changed through [`editor::Editor`]
//! (interactively) or [`ops`] batches (from MCP). [`session::WorkflowSession`] owns the editor
//! plus the asynchronous collaborators behind Save, Run, Deploy and spec fetching.

pub mod canvas;
pub mod collab;
pub mod config;
pub mod editor;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod tui;
