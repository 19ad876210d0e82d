// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Header, footer, side panes, popups and help used by TUI rendering.
fn render_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = &app.session;
    let mut spans = vec![
        Span::styled(" Flowstudio ", theme.key_style()),
        Span::styled("│ ", theme.muted_style()),
        Span::styled(header_name(session.name()), theme.base_style().add_modifier(Modifier::BOLD)),
    ];
    if session.is_modified() {
        spans.push(Span::styled(" ● modified", theme.modified_style()));
    }
    if !session.description().is_empty() {
        spans.push(Span::styled(
            format!("  {}", first_line(session.description())),
            theme.muted_style(),
        ));
    }
    for action in session.in_flight() {
        spans.push(Span::styled(format!("  {action}…"), theme.key_style()));
    }
    let viewport = session.editor().canvas().viewport();
    spans.push(Span::styled(
        format!(
            "  rev {}  zoom {:.0}%",
            session.editor().document().rev(),
            viewport.zoom() * 100.0
        ),
        theme.muted_style(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.base_style()), area);
}

fn header_name(name: &str) -> String {
    if name.trim().is_empty() {
        "(unnamed workflow)".to_owned()
    } else {
        name.to_owned()
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn render_palette(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(app.palette_drag.is_some()))
        .title(" Nodes ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = CATALOG
        .iter()
        .map(|entry| {
            let dragging = app.palette_drag.is_some_and(|ghost| ghost.kind == entry.kind);
            let label_style = if dragging {
                theme.selection_style()
            } else {
                theme.base_style()
            };
            Line::from(vec![
                Span::styled(format!("{} ", entry.icon), theme.base_style().fg(theme.swatch(entry.swatch))),
                Span::styled(entry.label.to_owned(), label_style),
            ])
        })
        .collect::<Vec<_>>();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("drag onto canvas", theme.muted_style())));
    lines.push(Line::from(Span::styled("a: add at center", theme.muted_style())));
    frame.render_widget(Paragraph::new(lines).style(theme.base_style()), inner);
}

fn render_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some(panel) = app.session.editor().panel() else {
        return;
    };
    let entry = catalog_entry(panel.kind());
    let dirty = if panel.is_dirty() { " ●" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(true))
        .title(format!(" {} {}{dirty} ", entry.icon, panel.draft().label()));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let fields = panel.fields();
    let title_width = fields
        .iter()
        .map(|field| field.title().chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = match panel.value_kind(field) {
                ValueKind::Bool => {
                    let on = matches!(panel.value(field), Some(AttrValue::Bool(true)));
                    if on { "[x]".to_owned() } else { "[ ]".to_owned() }
                }
                ValueKind::Multiline => {
                    let text = panel.text(field);
                    match text.split_once('\n') {
                        Some((head, _)) => format!("{head}…"),
                        None => text,
                    }
                }
                ValueKind::Text | ValueKind::Number => panel.text(field),
            };
            let row_style = if idx == panel.focused() {
                theme.selection_style()
            } else {
                theme.base_style()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", field.title(), width = title_width),
                    theme.muted_style(),
                ),
                Span::styled(value, row_style),
            ])
        })
        .collect::<Vec<_>>();

    lines.push(Line::default());
    let mut hints = Vec::new();
    push_footer_entry(&mut hints, theme, "edit", "Enter");
    push_footer_entry(&mut hints, theme, "save", "^S");
    if panel.kind() == NodeKind::Tool {
        push_footer_entry(&mut hints, theme, "fetch", "f");
    }
    lines.push(Line::from(hints));
    frame.render_widget(Paragraph::new(lines).style(theme.base_style()), inner);
}

fn render_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    if let Some(toast) = &app.toast {
        let marker = match toast.notification.level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Info => "•",
            NotificationLevel::Error => "✗",
        };
        let line = Line::from(Span::styled(
            format!(" {marker} {}", toast.notification.message),
            theme.notification_style(toast.notification.level),
        ));
        frame.render_widget(Paragraph::new(line).style(theme.base_style()), area);
        return;
    }
    frame.render_widget(
        Paragraph::new(footer_help_line(app)).style(theme.base_style()),
        area,
    );
}

fn footer_help_line(app: &App) -> Line<'static> {
    let theme = &app.theme;
    let editor = app.session.editor();
    let mut spans = Vec::<Span<'static>>::new();

    if app.input.is_some() {
        push_footer_entry(&mut spans, theme, "apply", "Enter");
        push_footer_entry(&mut spans, theme, "newline", "^J");
        push_footer_entry(&mut spans, theme, "cancel", "Esc");
    } else if editor.note_editor().is_some() {
        push_footer_entry(&mut spans, theme, "save", "Enter");
        push_footer_entry(&mut spans, theme, "newline", "^J");
        push_footer_entry(&mut spans, theme, "cancel", "Esc");
    } else if editor.is_picker_open() {
        push_footer_entry(&mut spans, theme, "filter", "type");
        push_footer_entry(&mut spans, theme, "choose", "↑/↓");
        push_footer_entry(&mut spans, theme, "add", "Enter");
        push_footer_entry(&mut spans, theme, "close", "Esc");
    } else if editor.panel().is_some() {
        push_footer_entry(&mut spans, theme, "field", "Tab");
        push_footer_entry(&mut spans, theme, "edit", "Enter");
        push_footer_entry(&mut spans, theme, "apply", "^S");
        push_footer_entry(&mut spans, theme, "rename", "e");
        push_footer_entry(&mut spans, theme, "note", "n");
        push_footer_entry(&mut spans, theme, "clone", "c");
        push_footer_entry(&mut spans, theme, "delete", "x");
        push_footer_entry(&mut spans, theme, "close", "Esc");
    } else {
        push_footer_entry(&mut spans, theme, "save", "s");
        push_footer_entry(&mut spans, theme, "run", "r");
        push_footer_entry(&mut spans, theme, "deploy", "d");
        push_footer_entry(&mut spans, theme, "add", "a");
        push_footer_entry(&mut spans, theme, "name", "w");
        push_footer_entry(&mut spans, theme, "help", "?");
        push_footer_entry(&mut spans, theme, "quit", "q");
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, theme: &TuiTheme, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", theme.muted_style()));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        theme.muted_style(),
    ));
    spans.push(Span::styled(value.to_owned(), theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn render_picker(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let picker = app.session.editor().picker();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(true))
        .title(" Add node ");
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", theme.key_style()),
        Span::styled(format!("{}▏", picker.query()), theme.base_style()),
    ])];
    let entries = picker.entries();
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("no matching node types", theme.muted_style())));
    }
    for (idx, entry) in entries.iter().enumerate() {
        let style = if idx == picker.highlighted() {
            theme.selection_style()
        } else {
            theme.base_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", entry.icon), theme.base_style().fg(theme.swatch(entry.swatch))),
            Span::styled(entry.label.to_owned(), style),
            Span::styled(format!("  {}", entry.description), theme.muted_style()),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).style(theme.base_style()), inner);
}

fn render_node_menu(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border_style(true));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let lines = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let style = if idx == app.menu_highlight {
                theme.selection_style()
            } else if *action == MenuAction::Delete {
                theme.error_style()
            } else {
                theme.base_style()
            };
            Line::from(Span::styled(action.label().to_owned(), style))
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines).style(theme.base_style()), inner);
}

fn render_note_editor(frame: &mut Frame<'_>, app: &App, canvas: Rect) {
    let theme = &app.theme;
    let editor = app.session.editor();
    let Some(note) = editor.note_editor() else {
        return;
    };
    let label = editor
        .document()
        .node(note.node_id())
        .map(|node| node.label().to_owned())
        .unwrap_or_default();
    let area = centered_box(48, 10, canvas);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(true))
        .title(format!(" Note · {label} "));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(format!("{}▏", note.text()))
            .style(theme.base_style())
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn render_text_input(frame: &mut Frame<'_>, app: &App, canvas: Rect) {
    let theme = &app.theme;
    let Some(input) = &app.input else {
        return;
    };
    let lines = input.buffer.lines().count().max(1) as u16;
    let area = centered_box(52, lines.saturating_add(2).min(12), canvas);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(true))
        .title(format!(" {} ", input.target.title()));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(format!("{}▏", input.buffer))
            .style(theme.base_style())
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn render_prompt(frame: &mut Frame<'_>, app: &App, screen: Rect) {
    let theme = &app.theme;
    let Some(prompt) = app.session.editor().prompt() else {
        return;
    };
    let area = centered_box(50, 5, screen);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.modified_style())
        .title(" Unsaved changes ");
    let mut hints = Vec::new();
    push_footer_entry(&mut hints, theme, "discard", "y");
    push_footer_entry(&mut hints, theme, "keep editing", "n");
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![Line::from(prompt.message.clone()), Line::from(hints)])
            .style(theme.base_style())
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn render_error_panel(frame: &mut Frame<'_>, app: &App, screen: Rect) {
    let theme = &app.theme;
    let Some(panel) = app.session.error_panel() else {
        return;
    };
    let area = centered_box(60, 8, screen);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(theme.error_style())
        .title(" Run crashed ");
    let lines = vec![
        Line::from(Span::styled(panel.message.clone(), theme.error_style())),
        Line::default(),
        Line::from(Span::styled(
            "Your workflow is unchanged.",
            theme.muted_style(),
        )),
        Line::from(vec![
            Span::styled("Enter", theme.key_style()),
            Span::raw(" to dismiss"),
        ]),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .style(theme.base_style())
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

/// A fixed-size box centered in `area`, shrunk to fit.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_help(frame: &mut Frame<'_>, app: &App, screen: Rect) {
    let theme = &app.theme;
    let area = centered_box(64, 30, screen);
    frame.render_widget(Clear, area);

    let key_style = theme.key_style();
    let header_style = theme.base_style().add_modifier(Modifier::BOLD);
    let key_col_width = ["left-drag handle", "right-click"]
        .iter()
        .map(|s| s.len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    lines.push(Line::from(Span::styled("--- Workflow ---", header_style)));
    lines.push(help_kv("s", "Save workflow", key_col_width, key_style));
    lines.push(help_kv("r / d", "Run / Deploy", key_col_width, key_style));
    lines.push(help_kv("w / W", "Edit name / description", key_col_width, key_style));
    lines.push(help_kv("q", "Quit (twice when unsaved)", key_col_width, key_style));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("--- Canvas ---", header_style)));
    lines.push(help_kv("drag", "Move node or pan", key_col_width, key_style));
    lines.push(help_kv("left-drag handle", "Connect output to input", key_col_width, key_style));
    lines.push(help_kv("click ×", "Remove edge", key_col_width, key_style));
    lines.push(help_kv("right-click", "Node menu / add node", key_col_width, key_style));
    lines.push(help_kv("a", "Add node at center", key_col_width, key_style));
    lines.push(help_kv("wheel, + / -", "Zoom", key_col_width, key_style));
    lines.push(help_kv("arrows, 0", "Pan / reset view", key_col_width, key_style));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("--- Selected node ---", header_style)));
    lines.push(help_kv("e / i", "Rename / describe", key_col_width, key_style));
    lines.push(help_kv("n", "Edit note", key_col_width, key_style));
    lines.push(help_kv("c / x", "Clone / delete", key_col_width, key_style));
    lines.push(help_kv("Tab, Enter", "Panel field / edit", key_col_width, key_style));
    lines.push(help_kv("^S", "Apply panel changes", key_col_width, key_style));
    lines.push(help_kv("f", "Fetch tool spec", key_col_width, key_style));
    lines.push(help_kv("Esc", "Close innermost overlay", key_col_width, key_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.panel_border_style(true))
        .title(" Help ");
    frame.render_widget(
        Paragraph::new(lines).style(theme.base_style()).block(block),
        area,
    );
}
