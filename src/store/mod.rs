// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for workflows on disk.
//!
//! A workflow folder holds a single versioned `workflow.json`, written atomically.

pub mod workflow_folder;

pub use workflow_folder::{StoreError, WorkflowFolder, WriteDurability, WORKFLOW_FILENAME};

/// Tracing target for persistence.
pub const TRACING_TARGET: &str = "flowstudio::store";
