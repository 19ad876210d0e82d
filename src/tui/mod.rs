// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a [`WorkflowSession`] in a ratatui + crossterm shell: a node palette on the left, the
//! canvas in the middle and the configuration panel on the right. Mouse gestures are translated
//! into client-space pointer events for the editor; queued MCP requests are served between
//! frames so tool calls and user input never race.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;

use crate::canvas::{DragTransfer, PointerButton};
use crate::editor::{catalog_entry, MenuAction, PanelField, CATALOG};
use crate::mcp::{drain_requests, McpRequest};
use crate::model::{AttrValue, NodeId, NodeKind, Point, ValueKind};
use crate::session::{Notification, NotificationLevel, WorkflowSession};

mod scene;
mod theme;

use scene::{area_origin, cell_to_client, client_to_cell, CanvasView, DragGhost};
use theme::TuiTheme;

/// Tracing target for terminal host events.
pub const TRACING_TARGET: &str = "flowstudio::tui";

const TICK: Duration = Duration::from_millis(100);
const TOAST_TTL: Duration = Duration::from_secs(4);
const PALETTE_WIDTH: u16 = 22;
const PANEL_WIDTH: u16 = 40;
const MENU_WIDTH: u16 = 20;
const PICKER_WIDTH: u16 = 34;
const PICKER_MAX_ROWS: u16 = 8;

/// Runs the editor until the user quits. `requests` carries MCP tool calls to serve between
/// frames.
pub fn run(
    session: WorkflowSession,
    requests: Option<mpsc::Receiver<McpRequest>>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let theme = TuiTheme::from_env().unwrap_or_else(|err| {
        tracing::warn!(target: TRACING_TARGET, error = %err, "palette override ignored");
        TuiTheme::default()
    });
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(session, requests, theme);

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            app.handle_event(event::read()?);
        }
    }

    app.session.shutdown();
    tracing::info!(target: TRACING_TARGET, "terminal ui closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let layout = app.sync_layout(frame.area());

    render_header(frame, app, layout.header);
    render_palette(frame, app, layout.palette);
    frame.render_widget(
        CanvasView {
            editor: app.session.editor(),
            theme: &app.theme,
            ghost: app.palette_drag,
        },
        layout.canvas,
    );
    if let Some(panel_area) = layout.panel {
        render_panel(frame, app, panel_area);
    }
    render_footer(frame, app, layout.footer);

    if let Some(area) = app.picker_rect() {
        render_picker(frame, app, area);
    }
    if let Some(area) = app.menu_rect() {
        render_node_menu(frame, app, area);
    }
    if app.session.editor().note_editor().is_some() {
        render_note_editor(frame, app, layout.canvas);
    }
    if app.input.is_some() {
        render_text_input(frame, app, layout.canvas);
    }
    if app.session.editor().prompt().is_some() {
        render_prompt(frame, app, frame.area());
    }
    if app.session.error_panel().is_some() {
        render_error_panel(frame, app, frame.area());
    }
    if app.show_help {
        render_help(frame, app, frame.area());
    }
}

include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    expires_at: Instant,
}

/// What a single-line text input writes to when committed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputTarget {
    NodeLabel(NodeId),
    NodeDescription(NodeId),
    PanelField(PanelField),
    WorkflowName,
    WorkflowDescription,
}

impl InputTarget {
    fn title(&self) -> String {
        match self {
            Self::NodeLabel(_) => "Rename node".to_owned(),
            Self::NodeDescription(_) => "Node description".to_owned(),
            Self::PanelField(field) => field.title().into_owned(),
            Self::WorkflowName => "Workflow name".to_owned(),
            Self::WorkflowDescription => "Workflow description".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextInput {
    target: InputTarget,
    buffer: String,
}

struct App {
    session: WorkflowSession,
    requests: Option<mpsc::Receiver<McpRequest>>,
    theme: TuiTheme,
    layout: ScreenLayout,
    toast: Option<Toast>,
    input: Option<TextInput>,
    palette_drag: Option<DragGhost>,
    menu_highlight: usize,
    show_help: bool,
    quit_armed: bool,
    should_quit: bool,
}

impl App {
    fn new(
        session: WorkflowSession,
        requests: Option<mpsc::Receiver<McpRequest>>,
        theme: TuiTheme,
    ) -> Self {
        Self {
            session,
            requests,
            theme,
            layout: ScreenLayout::default(),
            toast: None,
            input: None,
            palette_drag: None,
            menu_highlight: 0,
            show_help: false,
            quit_armed: false,
            should_quit: false,
        }
    }

    /// Applies finished background work and queued MCP calls, then ages the toast.
    fn tick(&mut self, now: Instant) {
        self.session.drain_outcomes();
        if let Some(requests) = self.requests.as_mut() {
            let served = drain_requests(&mut self.session, requests);
            if served > 0 {
                tracing::trace!(target: TRACING_TARGET, served, "mcp requests served");
            }
        }
        if let Some(notification) = self.session.take_notifications().pop() {
            self.toast = Some(Toast {
                notification,
                expires_at: now + TOAST_TTL,
            });
        }
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn set_toast(&mut self, notification: Notification) {
        self.toast = Some(Toast {
            notification,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    /// Recomputes the screen layout and pins the canvas viewport to the canvas area.
    fn sync_layout(&mut self, area: Rect) -> ScreenLayout {
        let layout = screen_layout(area, self.session.editor().panel().is_some());
        self.session
            .editor_mut()
            .canvas_mut()
            .viewport_mut()
            .set_origin(area_origin(layout.canvas));
        self.layout = layout;
        layout
    }

    fn selected_node(&self) -> Option<NodeId> {
        self.session.editor().selection().cloned()
    }

    fn canvas_center(&self) -> Point {
        let canvas = self.layout.canvas;
        cell_to_client(
            canvas.x + canvas.width / 2,
            canvas.y + canvas.height / 2,
        )
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.session.error_panel().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.session.reset_error_panel();
            }
            return;
        }
        if self.input.is_some() {
            self.handle_input_key(key);
            return;
        }
        if self.session.editor().prompt().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.session.editor_mut().confirm_prompt(),
                KeyCode::Char('n') | KeyCode::Esc => self.session.editor_mut().decline_prompt(),
                _ => {}
            }
            return;
        }
        if self.session.editor().note_editor().is_some() {
            self.handle_note_key(key);
            return;
        }
        if self.session.editor().is_picker_open() {
            self.handle_picker_key(key);
            return;
        }
        if self.session.editor().node_menu().is_some() {
            self.handle_menu_key(key);
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }
        if self.session.editor().panel().is_some() && self.handle_panel_key(key) {
            return;
        }
        self.handle_global_key(key);
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Char('j') if ctrl => input.buffer.push('\n'),
            KeyCode::Char('u') if ctrl => input.buffer.clear(),
            KeyCode::Char(ch) if !ctrl => input.buffer.push(ch),
            _ => {}
        }
    }

    fn commit_input(&mut self) {
        let Some(TextInput { target, buffer }) = self.input.take() else {
            return;
        };
        tracing::debug!(target: TRACING_TARGET, ?target, "text input committed");
        let editor = self.session.editor_mut();
        match target {
            InputTarget::NodeLabel(node_id) => {
                editor.rename_node(&node_id, buffer);
            }
            InputTarget::NodeDescription(node_id) => {
                editor.set_node_description(&node_id, buffer);
            }
            InputTarget::PanelField(field) => {
                let result = editor
                    .panel_mut()
                    .map(|panel| panel.set_text(&field, &buffer));
                if let Some(Err(err)) = result {
                    self.session.notify(Notification::error(err.to_string()));
                }
            }
            InputTarget::WorkflowName => self.session.set_name(buffer),
            InputTarget::WorkflowDescription => self.session.set_description(buffer),
        }
    }

    fn begin_input(&mut self, target: InputTarget, initial: impl Into<String>) {
        self.input = Some(TextInput {
            target,
            buffer: initial.into(),
        });
    }

    fn handle_note_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let editor = self.session.editor_mut();
        match key.code {
            KeyCode::Esc => editor.cancel_note(),
            KeyCode::Enter => {
                editor.save_note();
            }
            KeyCode::Char('s') if ctrl => {
                editor.save_note();
            }
            KeyCode::Char('j') if ctrl => {
                if let Some(note) = editor.note_editor_mut() {
                    note.push_char('\n');
                }
            }
            KeyCode::Backspace => {
                if let Some(note) = editor.note_editor_mut() {
                    note.pop_char();
                }
            }
            KeyCode::Char(ch) if !ctrl => {
                if let Some(note) = editor.note_editor_mut() {
                    note.push_char(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let editor = self.session.editor_mut();
        match key.code {
            KeyCode::Esc => {
                editor.close_picker();
            }
            KeyCode::Enter => {
                editor.pick_highlighted();
            }
            KeyCode::Up => editor.picker_mut().move_highlight(-1),
            KeyCode::Down => editor.picker_mut().move_highlight(1),
            KeyCode::Backspace => editor.picker_mut().pop_char(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.picker_mut().push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let len = MenuAction::ALL.len();
        match key.code {
            KeyCode::Esc => self.session.editor_mut().escape(),
            KeyCode::Up => self.menu_highlight = (self.menu_highlight + len - 1) % len,
            KeyCode::Down => self.menu_highlight = (self.menu_highlight + 1) % len,
            KeyCode::Enter => {
                let action = MenuAction::ALL[self.menu_highlight % len];
                self.session.editor_mut().run_menu_action(action);
            }
            _ => {}
        }
    }

    /// Keys owned by the configuration panel. Returns `false` to fall through to global keys.
    fn handle_panel_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Some(panel) = self.session.editor_mut().panel_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => panel.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => panel.move_focus(-1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(field) = panel.focused_field() else {
                    return true;
                };
                if panel.value_kind(&field) == ValueKind::Bool {
                    if let Err(err) = panel.toggle(&field) {
                        self.session.notify(Notification::error(err.to_string()));
                    }
                } else if key.code == KeyCode::Enter {
                    let text = panel.text(&field);
                    self.begin_input(InputTarget::PanelField(field), text);
                }
            }
            KeyCode::Char('s') if ctrl => {
                // Failures are reported through session notifications.
                let _ = self.session.save_panel();
            }
            KeyCode::Char('f') if !ctrl => {
                if !self.session.fetch_spec() {
                    self.set_toast(Notification::info("Set a spec URI on a tool node first"));
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_global_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let quit = matches!(key.code, KeyCode::Char('q')) || (ctrl && key.code == KeyCode::Char('c'));
        if !quit {
            self.quit_armed = false;
        }

        let selected = self.selected_node();
        match key.code {
            _ if quit => self.request_quit(),
            KeyCode::Esc => self.session.editor_mut().escape(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('s') => {
                // Rejections are posted as notifications.
                let _ = self.session.save();
            }
            KeyCode::Char('r') => self.session.run(),
            KeyCode::Char('d') => self.session.deploy(),
            KeyCode::Char('a') => {
                let center = self.canvas_center();
                let editor = self.session.editor_mut();
                let anchor = editor.canvas().viewport().to_document(center);
                editor.canvas_mut().open_picker(anchor);
                editor.picker_mut().reset();
            }
            KeyCode::Char('w') => {
                let name = self.session.name().to_owned();
                self.begin_input(InputTarget::WorkflowName, name);
            }
            KeyCode::Char('W') => {
                let description = self.session.description().to_owned();
                self.begin_input(InputTarget::WorkflowDescription, description);
            }
            KeyCode::Char('0') => self.session.editor_mut().canvas_mut().viewport_mut().reset(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let center = self.canvas_center();
                self.session.editor_mut().wheel(center, 1.0);
            }
            KeyCode::Char('-') => {
                let center = self.canvas_center();
                self.session.editor_mut().wheel(center, -1.0);
            }
            KeyCode::Left => self.pan_cells(1, 0),
            KeyCode::Right => self.pan_cells(-1, 0),
            KeyCode::Up => self.pan_cells(0, 1),
            KeyCode::Down => self.pan_cells(0, -1),
            KeyCode::Char(ch) => {
                if let Some(node_id) = selected {
                    self.handle_node_key(ch, node_id);
                }
            }
            _ => {}
        }
    }

    /// Toolbar shortcuts for the selected node.
    fn handle_node_key(&mut self, ch: char, node_id: NodeId) {
        let editor = self.session.editor_mut();
        match ch {
            'n' => {
                editor.open_note_editor(&node_id);
            }
            'c' => {
                if let Some(clone_id) = editor.clone_node(&node_id) {
                    editor.request_select(clone_id);
                }
            }
            'x' => {
                editor.delete_node(&node_id);
            }
            'e' => {
                let label = editor
                    .document()
                    .node(&node_id)
                    .map(|node| node.label().to_owned())
                    .unwrap_or_default();
                self.begin_input(InputTarget::NodeLabel(node_id), label);
            }
            'i' => {
                let description = editor
                    .document()
                    .node(&node_id)
                    .map(|node| node.data().description().to_owned())
                    .unwrap_or_default();
                self.begin_input(InputTarget::NodeDescription(node_id), description);
            }
            _ => {}
        }
    }

    fn pan_cells(&mut self, cols: i32, rows: i32) {
        let delta = Point::new(
            f64::from(cols) * scene::CELL_WIDTH * 4.0,
            f64::from(rows) * scene::CELL_HEIGHT * 2.0,
        );
        self.session
            .editor_mut()
            .canvas_mut()
            .viewport_mut()
            .pan_by(delta);
    }

    fn request_quit(&mut self) {
        if self.session.is_modified() && !self.quit_armed {
            self.quit_armed = true;
            self.set_toast(Notification::info("Unsaved changes. Press q again to quit"));
            return;
        }
        self.should_quit = true;
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        let client = cell_to_client(col, row);

        let modal = self.session.error_panel().is_some()
            || self.session.editor().prompt().is_some()
            || self.session.editor().note_editor().is_some()
            || self.input.is_some()
            || self.show_help;
        if modal {
            if mouse.kind == MouseEventKind::Up(MouseButton::Left) && self.palette_drag.is_none() {
                self.session.editor_mut().pointer_up(client);
            }
            return;
        }

        if let Some(ghost) = self.palette_drag.as_mut() {
            match mouse.kind {
                MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                    ghost.client = client;
                }
                MouseEventKind::Up(MouseButton::Left) => self.finish_palette_drag(col, row, client),
                _ => {}
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(button) => self.mouse_down(button, col, row, client),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.session.editor_mut().pointer_move(client);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.session.editor_mut().pointer_up(client);
            }
            MouseEventKind::ScrollUp if rect_contains(self.layout.canvas, col, row) => {
                self.session.editor_mut().wheel(client, 1.0);
            }
            MouseEventKind::ScrollDown if rect_contains(self.layout.canvas, col, row) => {
                self.session.editor_mut().wheel(client, -1.0);
            }
            _ => {}
        }
    }

    fn mouse_down(&mut self, button: MouseButton, col: u16, row: u16, client: Point) {
        if let Some(area) = self.menu_rect() {
            match menu_row_at(area, col, row) {
                Some(idx) => self.session.editor_mut().run_menu_action(MenuAction::ALL[idx]),
                None => self.session.editor_mut().escape(),
            }
            return;
        }

        if let Some(area) = self.picker_rect() {
            if rect_contains(area, col, row) {
                let entries = self.session.editor().picker().entries();
                if let Some(entry) = picker_row_at(area, col, row).and_then(|idx| entries.get(idx)) {
                    let kind = entry.kind;
                    self.session.editor_mut().pick(kind);
                }
            } else {
                self.session.editor_mut().close_picker();
            }
            return;
        }

        if rect_contains(self.layout.palette, col, row) {
            if button == MouseButton::Left {
                if let Some(kind) = palette_row_at(self.layout.palette, row) {
                    tracing::trace!(target: TRACING_TARGET, kind = %kind, "palette drag started");
                    self.palette_drag = Some(DragGhost { kind, client });
                }
            }
            return;
        }

        if let Some(panel_area) = self.layout.panel {
            if rect_contains(panel_area, col, row) {
                if let (Some(idx), Some(panel)) = (
                    panel_row_at(panel_area, row),
                    self.session.editor_mut().panel_mut(),
                ) {
                    if idx < panel.fields().len() {
                        panel.move_focus(idx as isize - panel.focused() as isize);
                    }
                }
                return;
            }
        }

        if rect_contains(self.layout.canvas, col, row) {
            let button = match button {
                MouseButton::Left => PointerButton::Left,
                MouseButton::Right => PointerButton::Right,
                MouseButton::Middle => return,
            };
            self.menu_highlight = 0;
            self.session.editor_mut().pointer_down(button, client);
        }
    }

    fn finish_palette_drag(&mut self, col: u16, row: u16, client: Point) {
        let Some(ghost) = self.palette_drag.take() else {
            return;
        };
        if !rect_contains(self.layout.canvas, col, row) {
            return;
        }
        let transfer = DragTransfer::node(&catalog_entry(ghost.kind).drag_payload())
            .and_then(|transfer| self.session.editor_mut().drop_transfer(&transfer, client));
        if let Err(err) = transfer {
            tracing::warn!(target: TRACING_TARGET, error = %err, "palette drop failed");
            self.set_toast(Notification::error(format!("Could not add node: {err}")));
        }
    }

    /// Node context menu, clamped into the canvas.
    fn menu_rect(&self) -> Option<Rect> {
        let menu = self.session.editor().node_menu()?;
        let (col, row) = client_to_cell(menu.at);
        Some(popup_rect(
            col,
            row,
            MENU_WIDTH,
            MenuAction::ALL.len() as u16 + 2,
            self.layout.canvas,
        ))
    }

    /// Picker popup at its document anchor, clamped into the canvas.
    fn picker_rect(&self) -> Option<Rect> {
        let canvas = self.session.editor().canvas();
        let anchor = canvas.picker_anchor()?;
        let (col, row) = client_to_cell(canvas.viewport().to_client(anchor));
        Some(popup_rect(
            col,
            row,
            PICKER_WIDTH,
            PICKER_MAX_ROWS + 3,
            self.layout.canvas,
        ))
    }
}

/// Screen regions, shared by drawing and mouse routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScreenLayout {
    header: Rect,
    palette: Rect,
    canvas: Rect,
    panel: Option<Rect>,
    footer: Rect,
}

fn screen_layout(area: Rect, panel_open: bool) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let mut constraints = vec![Constraint::Length(PALETTE_WIDTH), Constraint::Min(0)];
    if panel_open {
        constraints.push(Constraint::Length(PANEL_WIDTH));
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(rows[1]);

    ScreenLayout {
        header: rows[0],
        palette: columns[0],
        canvas: columns[1],
        panel: columns.get(2).copied(),
        footer: rows[2],
    }
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}

/// A `width` x `height` box with its top-left at the given cell, shifted to stay in `bounds`.
fn popup_rect(col: i64, row: i64, width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);
    let max_x = i64::from(bounds.right() - width);
    let max_y = i64::from(bounds.bottom() - height);
    // Clamped into `bounds`, so both fit in u16.
    let x = col.clamp(i64::from(bounds.x), max_x) as u16;
    let y = row.clamp(i64::from(bounds.y), max_y) as u16;
    Rect::new(x, y, width, height)
}

/// Catalog entry under a palette row. Entries start below the block border.
fn palette_row_at(palette: Rect, row: u16) -> Option<NodeKind> {
    let idx = row.checked_sub(palette.y + 1)?;
    CATALOG.get(usize::from(idx)).map(|entry| entry.kind)
}

fn panel_row_at(panel: Rect, row: u16) -> Option<usize> {
    row.checked_sub(panel.y + 1).map(usize::from)
}

fn menu_row_at(menu: Rect, col: u16, row: u16) -> Option<usize> {
    if !rect_contains(menu, col, row) {
        return None;
    }
    let idx = usize::from(row.checked_sub(menu.y + 1)?);
    (idx < MenuAction::ALL.len()).then_some(idx)
}

/// Picker rows start below the border and the query line.
fn picker_row_at(picker: Rect, col: u16, row: u16) -> Option<usize> {
    if !rect_contains(picker, col, row) {
        return None;
    }
    row.checked_sub(picker.y + 2).map(usize::from)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).inspect_err(|_| {
            teardown_terminal();
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).inspect_err(|_| {
            teardown_terminal();
        })?;
        terminal.clear().inspect_err(|_| {
            teardown_terminal();
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
