// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The interactive canvas: viewport transform, shapes, hit testing and gesture handling.

pub mod controller;
pub mod geometry;
pub mod payload;
pub mod viewport;

pub use controller::{CanvasController, CanvasEvent, CanvasState, PointerButton};
pub use geometry::{
    edge_curve, edge_midpoint, handle_position, hit_test, node_rect, CanvasMetrics, CubicBezier,
    HandleKind, Hit,
};
pub use payload::{DragPayload, DragTransfer, PayloadError, NODE_PAYLOAD_MIME};
pub use viewport::{Viewport, ZoomBounds};

/// Tracing target for canvas gestures.
pub const TRACING_TARGET: &str = "flowstudio::canvas";
