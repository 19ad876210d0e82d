// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal rendering of the canvas.
//!
//! Client space is the terminal grid scaled to virtual pixels: a cell is `CELL_WIDTH` x
//! `CELL_HEIGHT` client units and the pointer sits at the center of the cell it reports.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Widget;

use crate::canvas::{edge_curve, handle_position, node_rect, CubicBezier, HandleKind};
use crate::editor::{catalog_entry, Editor};
use crate::model::{Node, NodeKind, Point};

use super::theme::TuiTheme;

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const EDGE_SAMPLES_PER_CELL: f64 = 1.5;
const MIN_EDGE_SAMPLES: usize = 16;

/// Client point at the center of a terminal cell.
pub fn cell_to_client(column: u16, row: u16) -> Point {
    Point::new(
        (f64::from(column) + 0.5) * CELL_WIDTH,
        (f64::from(row) + 0.5) * CELL_HEIGHT,
    )
}

/// Client point of a cell's top-left corner; the canvas viewport origin.
pub fn area_origin(area: Rect) -> Point {
    Point::new(
        f64::from(area.x) * CELL_WIDTH,
        f64::from(area.y) * CELL_HEIGHT,
    )
}

/// Terminal cell containing a client point. May lie outside the screen.
pub fn client_to_cell(client: Point) -> (i64, i64) {
    (
        (client.x / CELL_WIDTH).floor() as i64,
        (client.y / CELL_HEIGHT).floor() as i64,
    )
}

/// Cell span covered by a client-space box, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CellBox {
    pub fn from_client(origin: Point, width: f64, height: f64) -> Self {
        let (left, top) = client_to_cell(origin);
        let right = ((origin.x + width) / CELL_WIDTH).ceil() as i64 - 1;
        let bottom = ((origin.y + height) / CELL_HEIGHT).ceil() as i64 - 1;
        Self {
            left,
            top,
            right: right.max(left + 1),
            bottom: bottom.max(top + 1),
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top + 1
    }

    pub fn middle_row(&self) -> i64 {
        self.top + (self.height() - 1) / 2
    }
}

/// Cell box of a node under the current viewport.
pub fn node_cells(editor: &Editor, node: &Node) -> CellBox {
    let canvas = editor.canvas();
    let viewport = canvas.viewport();
    let rect = node_rect(node, canvas.metrics());
    CellBox::from_client(
        viewport.to_client(rect.origin),
        rect.width * viewport.zoom(),
        rect.height * viewport.zoom(),
    )
}

/// A node being dragged in from the palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGhost {
    pub kind: NodeKind,
    pub client: Point,
}

pub struct CanvasView<'a> {
    pub editor: &'a Editor,
    pub theme: &'a TuiTheme,
    pub ghost: Option<DragGhost>,
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut painter = Painter { area, buf };
        painter.fill(self.theme.base_style());

        let editor = self.editor;
        let doc = editor.document();
        let canvas = editor.canvas();
        let viewport = canvas.viewport();
        let metrics = canvas.metrics();

        for edge in doc.edges() {
            let Some(curve) = edge_curve(doc, edge, metrics) else {
                continue;
            };
            let curve = CubicBezier {
                p0: viewport.to_client(curve.p0),
                p1: viewport.to_client(curve.p1),
                p2: viewport.to_client(curve.p2),
                p3: viewport.to_client(curve.p3),
            };
            let style = self.theme.edge_style(edge.animated());
            painter.curve(&curve, if edge.animated() { "┄" } else { "·" }, style);

            let (col, row) = client_to_cell(curve.midpoint());
            painter.put(col, row, "×", self.theme.edge_control_style());
            if let Some(label) = edge.label().filter(|label| !label.is_empty()) {
                let half = (Span::raw(label).width() / 2) as i64;
                painter.text(col - half, row - 1, label, i64::MAX, style);
            }
        }

        if let Some((source, cursor)) = canvas.pending_connection() {
            let start = doc
                .node(source)
                .and_then(|node| handle_position(node, HandleKind::Output, metrics));
            if let Some(start) = start {
                let curve =
                    CubicBezier::connector(viewport.to_client(start), viewport.to_client(cursor));
                painter.curve(&curve, "•", self.theme.pending_edge_style());
            }
        }

        for node in doc.nodes() {
            let cells = node_cells(editor, node);
            let selected = editor.selection() == Some(node.id());
            let accent = node
                .style()
                .map(|style| style.border.clone())
                .unwrap_or_else(|| catalog_entry(node.kind()).swatch.to_owned());
            let border = self.theme.node_border_style(&accent, selected);
            painter.node_box(cells, border, self.theme.base_style());

            let entry = catalog_entry(node.kind());
            let inner_width = cells.width() - 2;
            let title = format!("{} {}", entry.icon, node.label());
            painter.text(cells.left + 1, cells.middle_row(), &title, inner_width, border);
            if cells.height() > 3 && !node.data().description().is_empty() {
                painter.text(
                    cells.left + 1,
                    cells.middle_row() + 1,
                    node.data().description(),
                    inner_width,
                    self.theme.muted_style(),
                );
            }
            if node.data().note().is_some() {
                painter.put(cells.right - 1, cells.top, "✎", border);
            }

            for handle in [HandleKind::Input, HandleKind::Output] {
                if let Some(at) = handle_position(node, handle, metrics) {
                    let (col, row) = client_to_cell(viewport.to_client(at));
                    let col = match handle {
                        HandleKind::Input => col.max(cells.left),
                        HandleKind::Output => col.min(cells.right),
                    };
                    painter.put(col, row, "●", self.theme.handle_style());
                }
            }
        }

        if let Some(ghost) = self.ghost {
            let size = (metrics.node_width * viewport.zoom(), metrics.node_height * viewport.zoom());
            let cells = CellBox::from_client(ghost.client, size.0, size.1);
            let entry = catalog_entry(ghost.kind);
            let style = self.theme.node_border_style(entry.swatch, false);
            painter.node_box(cells, style, self.theme.base_style());
            let title = format!("{} {}", entry.icon, entry.label);
            painter.text(cells.left + 1, cells.middle_row(), &title, cells.width() - 2, style);
        }
    }
}

struct Painter<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Painter<'_> {
    fn contains(&self, col: i64, row: i64) -> bool {
        col >= i64::from(self.area.left())
            && col < i64::from(self.area.right())
            && row >= i64::from(self.area.top())
            && row < i64::from(self.area.bottom())
    }

    fn fill(&mut self, style: Style) {
        self.buf.set_style(self.area, style);
    }

    fn put(&mut self, col: i64, row: i64, symbol: &str, style: Style) {
        if !self.contains(col, row) {
            return;
        }
        // Bounds were checked above, so both casts are lossless.
        if let Some(cell) = self.buf.cell_mut((col as u16, row as u16)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    /// Writes `text` starting at `col`, clipped to `max_width` cells and to the area.
    fn text(&mut self, col: i64, row: i64, text: &str, max_width: i64, style: Style) {
        let mut x = col;
        let mut encoded = [0; 4];
        for ch in text.chars().take_while(|ch| *ch != '\n') {
            let symbol = ch.encode_utf8(&mut encoded);
            let width = Span::raw(&*symbol).width() as i64;
            if x - col + width > max_width {
                break;
            }
            self.put(x, row, symbol, style);
            x += width.max(1);
        }
    }

    fn curve(&mut self, curve: &CubicBezier, symbol: &str, style: Style) {
        let span = curve.p0.distance_to(curve.p3) / CELL_WIDTH;
        let samples = ((span * EDGE_SAMPLES_PER_CELL) as usize).max(MIN_EDGE_SAMPLES);
        for point in curve.sample(samples) {
            let (col, row) = client_to_cell(point);
            self.put(col, row, symbol, style);
        }
    }

    fn node_box(&mut self, cells: CellBox, border: Style, fill: Style) {
        for row in cells.top..=cells.bottom {
            for col in cells.left..=cells.right {
                let top = row == cells.top;
                let bottom = row == cells.bottom;
                let left = col == cells.left;
                let right = col == cells.right;
                let (symbol, style) = match (top, bottom, left, right) {
                    (true, _, true, _) => ("╭", border),
                    (true, _, _, true) => ("╮", border),
                    (_, true, true, _) => ("╰", border),
                    (_, true, _, true) => ("╯", border),
                    (true, _, _, _) | (_, true, _, _) => ("─", border),
                    (_, _, true, _) | (_, _, _, true) => ("│", border),
                    _ => (" ", fill),
                };
                self.put(col, row, symbol, style);
            }
        }
    }
}
