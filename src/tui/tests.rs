// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use rstest::rstest;
use tokio::sync::oneshot;

use super::scene::{cell_to_client, client_to_cell, CellBox};
use super::theme::TuiTheme;
use super::{draw, popup_rect, screen_layout, App, InputTarget};
use crate::collab::{
    CollabError, ContentFetcher, ExecutionReport, FetchError, FetchedContent, SimulatedExecutor,
    WorkflowRunner,
};
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::mcp::{mcp_inbox, ApplyOpsParams, McpRequest};
use crate::model::{demo_workflow, AttrValue, DetailField, NodeId, NodeKind, Point, WorkflowRecord};
use crate::session::{Collaborators, NotificationLevel, WorkflowSession};
use crate::store::WorkflowFolder;

const WIDTH: u16 = 120;
const HEIGHT: u16 = 40;

// Demo layout at 120x40: the canvas starts at cell (22, 1), i.e. client (176, 16), and every
// demo node sits on row 12.
const AGENT_CELL: (u16, u16) = (70, 12);
const INPUT_CELL: (u16, u16) = (40, 12);
const INPUT_OUTPUT_HANDLE_CELL: (u16, u16) = (52, 12);
const TOOL_INPUT_HANDLE_CELL: (u16, u16) = (97, 12);
const EMPTY_CELL: (u16, u16) = (30, 30);

struct OfflineFetcher;

#[async_trait::async_trait]
impl ContentFetcher for OfflineFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedContent, FetchError> {
        Err(FetchError::Status {
            uri: uri.to_owned(),
            status: 503,
        })
    }
}

struct PanickingRunner;

#[async_trait::async_trait]
impl WorkflowRunner for PanickingRunner {
    async fn run(&self, _workflow: WorkflowRecord) -> Result<ExecutionReport, CollabError> {
        panic!("engine exploded");
    }
}

fn collaborators(dir: &tempfile::TempDir) -> Collaborators {
    let executor = Arc::new(SimulatedExecutor::new(Duration::from_millis(10)));
    Collaborators {
        store: Arc::new(WorkflowFolder::new(dir.path().join("support-desk"))),
        runner: executor.clone(),
        deployer: executor,
        fetcher: Arc::new(OfflineFetcher),
    }
}

fn demo_app(dir: &tempfile::TempDir) -> App {
    app_with(collaborators(dir))
}

fn app_with(collaborators: Collaborators) -> App {
    let session = WorkflowSession::new(
        Editor::new(demo_workflow(), EditorConfig::default()),
        collaborators,
    );
    let mut app = App::new(session, None, TuiTheme::default());
    app.sync_layout(Rect::new(0, 0, WIDTH, HEIGHT));
    app
}

fn render(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("terminal");
    terminal.draw(|frame| draw(frame, app)).expect("draw");
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer.cell((x, y)).map_or(" ", |cell| cell.symbol()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn node_id(raw: &str) -> NodeId {
    NodeId::new(raw).expect("node id")
}

fn mouse(app: &mut App, kind: MouseEventKind, (column, row): (u16, u16)) {
    app.handle_mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

fn click(app: &mut App, cell: (u16, u16)) {
    mouse(app, MouseEventKind::Down(MouseButton::Left), cell);
    mouse(app, MouseEventKind::Up(MouseButton::Left), cell);
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App, ch: char) {
    app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn position(app: &App, raw: &str) -> Point {
    app.session
        .editor()
        .document()
        .node(&node_id(raw))
        .expect("node")
        .position()
}

#[rstest]
#[case(0, 0, Point::new(4.0, 8.0))]
#[case(22, 1, Point::new(180.0, 24.0))]
#[case(70, 12, Point::new(564.0, 200.0))]
fn cell_centers_map_to_client_space(#[case] col: u16, #[case] row: u16, #[case] expected: Point) {
    let client = cell_to_client(col, row);
    assert_eq!(client, expected);
    assert_eq!(client_to_cell(client), (i64::from(col), i64::from(row)));
}

#[test]
fn default_node_box_spans_twenty_by_three_cells() {
    let cells = CellBox::from_client(Point::new(256.0, 176.0), 160.0, 48.0);
    assert_eq!((cells.left, cells.top), (32, 11));
    assert_eq!((cells.width(), cells.height()), (20, 3));
    assert_eq!(cells.middle_row(), 12);
}

#[test]
fn layout_reserves_panel_column_only_when_open() {
    let area = Rect::new(0, 0, WIDTH, HEIGHT);

    let closed = screen_layout(area, false);
    assert_eq!(closed.header, Rect::new(0, 0, WIDTH, 1));
    assert_eq!(closed.palette, Rect::new(0, 1, 22, 38));
    assert_eq!(closed.canvas, Rect::new(22, 1, 98, 38));
    assert_eq!(closed.panel, None);
    assert_eq!(closed.footer, Rect::new(0, 39, WIDTH, 1));

    let open = screen_layout(area, true);
    assert_eq!(open.canvas, Rect::new(22, 1, 58, 38));
    assert_eq!(open.panel, Some(Rect::new(80, 1, 40, 38)));
}

#[rstest]
#[case(30, 30, Rect::new(30, 28, 34, 11))]
#[case(110, 5, Rect::new(86, 5, 34, 11))]
#[case(-4, -2, Rect::new(22, 1, 34, 11))]
fn popups_stay_inside_the_canvas(#[case] col: i64, #[case] row: i64, #[case] expected: Rect) {
    let canvas = Rect::new(22, 1, 98, 38);
    assert_eq!(popup_rect(col, row, 34, 11, canvas), expected);
}

#[tokio::test]
async fn draws_header_palette_nodes_and_footer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    let screen = render(&mut app);
    assert!(screen.contains("Support desk"));
    assert!(screen.contains("Nodes"));
    assert!(screen.contains("Application"));
    assert!(screen.contains("Customer question"));
    assert!(screen.contains("Support agent"));
    assert!(screen.contains("×"), "edge delete controls are drawn");
    assert!(screen.contains("Save:s"));
    assert!(!screen.contains("modified"));
}

#[tokio::test]
async fn clicking_a_node_selects_it_and_opens_the_panel() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    click(&mut app, AGENT_CELL);

    assert_eq!(app.session.editor().selection(), Some(&node_id("agent-2")));
    assert!(app.session.editor().panel().is_some());
    let screen = render(&mut app);
    assert_eq!(app.layout.panel, Some(Rect::new(80, 1, 40, 38)));
    assert!(screen.contains("gpt-4o-mini"));
    assert!(screen.contains("Temperature"));
}

#[tokio::test]
async fn clicking_empty_canvas_closes_a_clean_panel() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);

    click(&mut app, EMPTY_CELL);

    assert_eq!(app.session.editor().selection(), None);
    assert!(app.session.editor().panel().is_none());
}

#[tokio::test]
async fn dragging_a_node_moves_it_in_document_space() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), AGENT_CELL);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), (75, 14));
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), (75, 14));

    assert_eq!(position(&app, "agent-2"), Point::new(380.0, 192.0));
    assert!(app.session.is_modified());
}

#[tokio::test]
async fn dragging_from_an_output_handle_to_an_input_handle_connects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(
        &mut app,
        MouseEventKind::Down(MouseButton::Left),
        INPUT_OUTPUT_HANDLE_CELL,
    );
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), (80, 20));
    assert!(app.session.editor().canvas().pending_connection().is_some());
    mouse(
        &mut app,
        MouseEventKind::Drag(MouseButton::Left),
        TOOL_INPUT_HANDLE_CELL,
    );
    mouse(
        &mut app,
        MouseEventKind::Up(MouseButton::Left),
        TOOL_INPUT_HANDLE_CELL,
    );

    let doc = app.session.editor().document();
    assert_eq!(doc.edge_count(), 4);
    assert!(doc.edges().any(|edge| {
        edge.source() == &node_id("input-1") && edge.target() == &node_id("tool-3")
    }));
    assert!(app.session.editor().canvas().pending_connection().is_none());
}

#[tokio::test]
async fn dragging_from_the_palette_drops_a_node_at_the_pointer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), (5, 2));
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), EMPTY_CELL);
    assert!(app.palette_drag.is_some());
    // Once in the palette, once as the ghost under the pointer.
    assert_eq!(render(&mut app).matches("▣ Application").count(), 2);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), EMPTY_CELL);

    assert!(app.palette_drag.is_none());
    let doc = app.session.editor().document();
    assert_eq!(doc.node_count(), 5);
    let created = doc.nodes().last().expect("created node");
    assert_eq!(created.kind(), NodeKind::Application);
    assert_eq!(created.position(), Point::new(68.0, 472.0));
    assert_eq!(created.label(), "Application");
}

#[tokio::test]
async fn palette_drop_outside_the_canvas_is_discarded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), (5, 3));
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), (6, 10));

    assert!(app.palette_drag.is_none());
    assert_eq!(app.session.editor().document().node_count(), 4);
}

#[tokio::test]
async fn right_click_on_empty_canvas_opens_a_filterable_picker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Right), EMPTY_CELL);
    assert!(app.session.editor().is_picker_open());
    assert!(render(&mut app).contains("Add node"));

    type_text(&mut app, "mem");
    press(&mut app, KeyCode::Enter);

    assert!(!app.session.editor().is_picker_open());
    let doc = app.session.editor().document();
    let created = doc.nodes().last().expect("created node");
    assert_eq!(created.kind(), NodeKind::Memory);
    assert_eq!(created.position(), Point::new(68.0, 472.0));
}

#[tokio::test]
async fn clicking_a_picker_row_creates_that_node_at_the_anchor() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    press(&mut app, KeyCode::Char('a'));
    let area = app.picker_rect().expect("picker open");
    click(&mut app, (area.x + 4, area.y + 2));

    let doc = app.session.editor().document();
    assert_eq!(doc.node_count(), 5);
    let created = doc.nodes().last().expect("created node");
    assert_eq!(created.kind(), NodeKind::Application);
    assert_eq!(created.position(), Point::new(396.0, 312.0));
}

#[tokio::test]
async fn escape_closes_the_picker_without_creating_anything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Esc);

    assert!(!app.session.editor().is_picker_open());
    assert_eq!(app.session.editor().document().node_count(), 4);
}

#[tokio::test]
async fn clicking_the_palette_closes_an_open_picker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    press(&mut app, KeyCode::Char('a'));
    assert!(app.picker_rect().is_some());
    click(&mut app, (5, 2));

    assert!(!app.session.editor().is_picker_open());
    assert!(app.palette_drag.is_none());
    assert_eq!(app.session.editor().document().node_count(), 4);
}

#[tokio::test]
async fn node_menu_delete_removes_the_node_and_its_edges() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Right), AGENT_CELL);
    let area = app.menu_rect().expect("menu open");
    assert!(render(&mut app).contains("Add/Edit note"));
    click(&mut app, (area.x + 2, area.y + 4));

    let doc = app.session.editor().document();
    assert!(!doc.contains_node(&node_id("agent-2")));
    assert_eq!(doc.edge_count(), 1);
    assert!(app.session.editor().node_menu().is_none());
}

#[tokio::test]
async fn clicking_outside_the_node_menu_closes_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Right), AGENT_CELL);
    click(&mut app, (25, 35));

    assert!(app.session.editor().node_menu().is_none());
    assert_eq!(app.session.editor().document().node_count(), 4);
}

#[tokio::test]
async fn rename_and_note_shortcuts_write_through() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);

    press(&mut app, KeyCode::Char('e'));
    assert!(matches!(
        app.input.as_ref().map(|input| &input.target),
        Some(InputTarget::NodeLabel(_))
    ));
    ctrl(&mut app, 'u');
    type_text(&mut app, "Triage");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "!");
    press(&mut app, KeyCode::Enter);

    let agent = app
        .session
        .editor()
        .document()
        .node(&node_id("agent-2"))
        .expect("agent");
    assert_eq!(agent.label(), "Triage");
    assert_eq!(agent.data().note(), Some("Keep answers under 120 words!"));
}

#[tokio::test]
async fn clone_shortcut_selects_the_copy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);

    press(&mut app, KeyCode::Char('c'));

    let doc = app.session.editor().document();
    assert_eq!(doc.node_count(), 5);
    let copy = doc.nodes().last().expect("clone");
    assert_eq!(copy.label(), "Support agent");
    assert_eq!(copy.position(), Point::new(390.0, 210.0));
    assert_eq!(app.session.editor().selection(), Some(copy.id()));
}

#[tokio::test]
async fn panel_edits_are_applied_on_ctrl_s() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);

    // Label, Description, Note, then Model.
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Enter);
    ctrl(&mut app, 'u');
    type_text(&mut app, "claude-haiku");
    press(&mut app, KeyCode::Enter);

    let panel = app.session.editor().panel().expect("panel");
    assert!(panel.is_dirty());
    assert!(render(&mut app).contains("Support agent ●"));

    ctrl(&mut app, 's');
    app.tick(Instant::now());

    let agent = app
        .session
        .editor()
        .document()
        .node(&node_id("agent-2"))
        .expect("agent");
    assert_eq!(
        agent.data().details().get(DetailField::Model),
        Some(AttrValue::Text("claude-haiku".to_owned()))
    );
    let toast = app.toast.as_ref().expect("toast");
    assert_eq!(toast.notification.level, NotificationLevel::Success);
    assert!(toast.notification.message.contains("Support agent"));
}

#[tokio::test]
async fn invalid_panel_numbers_are_reported_and_not_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);

    for _ in 0..4 {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Enter);
    ctrl(&mut app, 'u');
    type_text(&mut app, "warm");
    press(&mut app, KeyCode::Enter);
    app.tick(Instant::now());

    let toast = app.toast.as_ref().expect("toast");
    assert_eq!(toast.notification.level, NotificationLevel::Error);
    assert!(!app.session.editor().panel().expect("panel").is_dirty());
}

#[tokio::test]
async fn switching_nodes_with_a_dirty_panel_asks_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);
    press(&mut app, KeyCode::Enter);
    ctrl(&mut app, 'u');
    type_text(&mut app, "Triage");
    press(&mut app, KeyCode::Enter);

    click(&mut app, INPUT_CELL);
    assert!(app.session.editor().prompt().is_some());
    assert!(render(&mut app).contains("Unsaved changes"));

    // Modal: clicks do nothing until the prompt is answered.
    click(&mut app, EMPTY_CELL);
    assert!(app.session.editor().prompt().is_some());

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.session.editor().selection(), Some(&node_id("agent-2")));
    assert_eq!(
        app.session.editor().panel().expect("panel").draft().label(),
        "Triage"
    );

    click(&mut app, INPUT_CELL);
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.session.editor().selection(), Some(&node_id("input-1")));
    let agent = app
        .session
        .editor()
        .document()
        .node(&node_id("agent-2"))
        .expect("agent");
    assert_eq!(agent.label(), "Support agent");
}

#[tokio::test]
async fn pressing_a_node_behind_the_prompt_does_not_drag_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);
    press(&mut app, KeyCode::Enter);
    ctrl(&mut app, 'u');
    type_text(&mut app, "Triage");
    press(&mut app, KeyCode::Enter);

    let before = app
        .session
        .editor()
        .document()
        .node(&node_id("input-1"))
        .expect("input")
        .position();
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), INPUT_CELL);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), EMPTY_CELL);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), EMPTY_CELL);
    press(&mut app, KeyCode::Char('n'));
    mouse(&mut app, MouseEventKind::Moved, (60, 30));

    let input = app
        .session
        .editor()
        .document()
        .node(&node_id("input-1"))
        .expect("input");
    assert_eq!(input.position(), before);
    assert!(app.session.editor().canvas().dragging_node().is_none());
}

#[tokio::test]
async fn save_key_persists_and_acknowledges() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    press(&mut app, KeyCode::Char('w'));
    ctrl(&mut app, 'u');
    type_text(&mut app, "Help desk");
    press(&mut app, KeyCode::Enter);
    assert!(app.session.is_modified());

    press(&mut app, KeyCode::Char('s'));
    assert!(render(&mut app).contains("save…"));
    assert!(app.session.next_outcome().await);
    app.tick(Instant::now());

    assert!(!app.session.is_modified());
    let toast = app.toast.as_ref().expect("toast");
    assert_eq!(toast.notification.message, "Saved \"Help desk\"");
    assert!(dir.path().join("support-desk").join("workflow.json").is_file());
}

#[tokio::test]
async fn blank_name_save_is_rejected_with_a_toast() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    press(&mut app, KeyCode::Char('w'));
    ctrl(&mut app, 'u');
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('s'));
    app.tick(Instant::now());

    assert!(app.session.in_flight().is_empty());
    let toast = app.toast.as_ref().expect("toast");
    assert_eq!(toast.notification.level, NotificationLevel::Error);
    assert!(render(&mut app).contains("give the workflow a name"));
}

#[tokio::test]
async fn toasts_expire() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    press(&mut app, KeyCode::Char('w'));
    ctrl(&mut app, 'u');
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('s'));

    let now = Instant::now();
    app.tick(now);
    assert!(app.toast.is_some());
    app.tick(now + Duration::from_secs(5));
    assert!(app.toast.is_none());
}

#[tokio::test]
async fn quitting_with_unsaved_changes_needs_a_second_press() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit, "clean sessions quit at once");

    let mut app = demo_app(&dir);
    click(&mut app, AGENT_CELL);
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit);
    press(&mut app, KeyCode::Char('?'));
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit, "any other key disarms the guard");
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[tokio::test]
async fn run_panic_shows_a_dismissable_error_panel() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut collaborators = collaborators(&dir);
    collaborators.runner = Arc::new(PanickingRunner);
    let mut app = app_with(collaborators);

    press(&mut app, KeyCode::Char('r'));
    assert!(app.session.next_outcome().await);
    let screen = render(&mut app);
    assert!(screen.contains("Run crashed"));
    assert!(screen.contains("engine exploded"));

    press(&mut app, KeyCode::Char('s'));
    assert!(app.session.in_flight().is_empty(), "keys are blocked");
    press(&mut app, KeyCode::Enter);
    assert!(app.session.error_panel().is_none());
    assert_eq!(app.session.editor().document().node_count(), 4);
}

#[tokio::test]
async fn zoom_keys_and_reset_drive_the_viewport() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);

    press(&mut app, KeyCode::Char('+'));
    assert!(app.session.editor().canvas().viewport().zoom() > 1.0);
    mouse(&mut app, MouseEventKind::ScrollDown, EMPTY_CELL);
    mouse(&mut app, MouseEventKind::ScrollDown, EMPTY_CELL);
    assert!(app.session.editor().canvas().viewport().zoom() < 1.0);

    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Char('0'));
    let viewport = app.session.editor().canvas().viewport();
    assert_eq!(viewport.zoom(), 1.0);
    assert_eq!(viewport.pan(), Point::ORIGIN);
}

#[tokio::test]
async fn queued_mcp_calls_are_served_on_tick() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut app = demo_app(&dir);
    let (inbox, requests) = mcp_inbox();
    app.requests = Some(requests);

    let params: ApplyOpsParams = serde_json::from_value(serde_json::json!({
        "base_rev": 0,
        "ops": [{"type": "add_node", "node_id": "memory-9", "kind": "memory", "x": 80.0, "y": 320.0, "label": "History"}]
    }))
    .expect("params");
    let (apply_reply, applied) = oneshot::channel();
    inbox
        .send(McpRequest::ApplyOps {
            params,
            dry_run: false,
            reply: apply_reply,
        })
        .await
        .expect("queue apply");
    let (read_reply, read) = oneshot::channel();
    inbox
        .send(McpRequest::Read { reply: read_reply })
        .await
        .expect("queue read");

    app.tick(Instant::now());

    assert_eq!(applied.await.expect("reply").expect("apply").new_rev, 1);
    assert_eq!(read.await.expect("reply").expect("read").workflow.nodes.len(), 5);
    assert!(render(&mut app).contains("History"));
}
