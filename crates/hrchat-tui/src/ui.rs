use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use hrchat_core::table::{EXECUTED_QUERY_LABEL, NO_DATA_NOTICE};
use hrchat_core::{
    AddEmployeeForm, DataDisplay, DataTable, FormFocus, Message, MessageKind, ResultView, Sender,
};
use crate::app::{App, ConfirmChoice, Focus};

/// Width of the label column in the employee form
const FORM_LABEL_WIDTH: usize = 18;
const EMPTY_PANEL_TEXT: &str = "Query results and forms appear here.";

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.chat_open {
        let [data_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .areas(body_area);
        render_data_panel(app, frame, data_area);
        render_chat(app, frame, chat_area);
    } else {
        render_data_panel(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let [title_area, glyph_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let mut spans = vec![
        Span::styled(" HR Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.client.endpoint().to_string(), Style::default().fg(Color::Gray)),
    ];
    if app.widget.is_busy() {
        spans.push(Span::styled("  ● working", Style::default().fg(Color::Yellow)));
    }
    let queued = app.widget.queued();
    if queued > 0 {
        spans.push(Span::styled(
            format!(" [{} queued]", queued),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, title_area);

    let glyph = Paragraph::new(format!(" {} ", app.toggle_glyph()))
        .style(Style::default().bg(Color::Cyan).fg(Color::Black).bold());
    frame.render_widget(glyph, glyph_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let confirming = app.focus == Focus::Confirm
        && app.chat_open
        && app.widget.pending_confirmation().is_some();

    let (mode_text, mode_style) = if confirming {
        (" CONFIRM ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else if app.focus == Focus::Form && app.has_form() {
        (" FORM ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else {
        (" CHAT ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = if confirming {
        vec![
            Span::styled(" ←/→ ", key_style),
            Span::styled(" choose ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" y/n ", key_style),
            Span::styled(" proceed/cancel ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" chat ", label_style),
        ]
    } else if app.focus == Focus::Form && app.has_form() {
        let mut hints = vec![
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" field ", label_style),
            Span::styled(" ^S ", key_style),
            Span::styled(" submit ", label_style),
        ];
        if app.chat_open {
            hints.extend(vec![
                Span::styled(" Esc ", key_style),
                Span::styled(" chat ", label_style),
            ]);
        }
        hints
    } else if app.chat_open {
        let mut hints = vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
        ];
        if app.widget.pending_confirmation().is_some() {
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" confirm ", label_style),
            ]);
        } else if app.has_form() {
            hints.extend(vec![
                Span::styled(" Tab ", key_style),
                Span::styled(" form ", label_style),
            ]);
        }
        hints
    } else {
        vec![]
    };

    hints.extend(vec![
        Span::styled(" ^T ", key_style),
        Span::styled(if app.chat_open { " hide chat " } else { " show chat " }, label_style),
        Span::styled(" ^C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

// ---------------------------------------------------------------------------
// Chat pane
// ---------------------------------------------------------------------------

fn message_style(message: &Message) -> Style {
    match (message.sender, message.kind) {
        (Sender::User, _) => Style::default(),
        (_, MessageKind::Success) => Style::default().fg(Color::Green),
        (_, MessageKind::Error) => Style::default().fg(Color::Red),
        (_, MessageKind::Confirmation) => Style::default().fg(Color::Yellow),
        (_, MessageKind::Thinking) => {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
        }
        _ => Style::default(),
    }
}

/// Yes/No buttons under the confirmation that is currently awaiting a decision.
/// The selection is only highlighted while the prompt has focus. Falls back to
/// one button per row when the pane is too narrow for both.
fn confirm_controls(selected: ConfirmChoice, active: bool, width: usize) -> Vec<Line<'static>> {
    let options = [
        (" [y] Yes, Proceed ", ConfirmChoice::Proceed),
        (" [n] No, Cancel ", ConfirmChoice::Cancel),
    ];

    let buttons: Vec<Span<'static>> = options
        .into_iter()
        .map(|(label, choice)| {
            let style = match (choice == selected, active) {
                (true, true) => Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, _) => Style::default().fg(Color::DarkGray),
            };
            Span::styled(label, style)
        })
        .collect();

    let one_row: usize = buttons.iter().map(|b| b.width()).sum::<usize>() + 2;
    if one_row <= width {
        let mut spans = Vec::with_capacity(3);
        for (i, button) in buttons.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(button);
        }
        vec![Line::from(spans)]
    } else {
        buttons.into_iter().map(Line::from).collect()
    }
}

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping; a word longer than the width is split
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        // Words that can never fit get their own rows
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        if chars.is_empty() {
            continue;
        }

        let word_len = chars.len();
        let word: String = chars.into_iter().collect();
        if current_len == 0 {
            // First word on line
            current_line = word;
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            // Word fits on current line
            current_line.push(' ');
            current_line.push_str(&word);
            current_len += 1 + word_len;
        } else {
            // Word doesn't fit, start new line
            lines.push(std::mem::take(&mut current_line));
            current_line = word;
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Hard-wrap at `width` columns without touching spacing (SQL, code).
fn wrap_preformatted(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if width == 0 || chars.len() <= width {
        return vec![text.to_string()];
    }
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

fn push_rows(lines: &mut Vec<Line<'static>>, rows: Vec<String>, style: Style) {
    lines.extend(rows.into_iter().map(|row| Line::from(Span::styled(row, style))));
}

/// The chat log, already wrapped to `width` so one `Line` is one screen row.
fn chat_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    let prompt_active = app.focus == Focus::Confirm;

    for msg in app.widget.messages() {
        let label = match msg.sender {
            Sender::User => Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Sender::Bot => Span::styled(
                "Bot:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(label));

        let style = message_style(msg);
        if msg.kind == MessageKind::Thinking {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(format!("Thinking{}", dots), style)));
        } else if msg.is_preformatted() {
            // Keep SQL layout intact
            for line in msg.display_text().lines() {
                push_rows(&mut lines, wrap_preformatted(&format!("  {}", line), width), style);
            }
        } else {
            for line in msg.text.lines() {
                push_rows(&mut lines, wrap_text_to_width(line, width), style);
            }
        }

        if let Some(note) = &msg.note {
            push_rows(
                &mut lines,
                wrap_text_to_width(note, width),
                Style::default().add_modifier(Modifier::BOLD),
            );
        }

        if app.widget.confirmation().has_controls(msg.id) {
            lines.extend(confirm_controls(app.confirm_choice, prompt_active, width));
        }

        lines.push(Line::default());
    }

    lines
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [log_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Inner size minus borders
    app.chat_height = log_area.height.saturating_sub(2);
    app.chat_width = log_area.width.saturating_sub(2);
    let width = app.chat_width as usize;

    let mut lines = chat_lines(app, width);
    if lines.is_empty() {
        push_rows(
            &mut lines,
            wrap_text_to_width("Ask about employees, departments or leave...", width),
            Style::default().fg(Color::DarkGray),
        );
    }

    // chat_scroll counts up from the bottom; clamp it to what exists
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(app.chat_height);
    app.chat_scroll = app.chat_scroll.min(max_scroll);
    let offset = max_scroll - app.chat_scroll;

    let log_focused = matches!(app.focus, Focus::Input | Focus::Confirm);
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if log_focused { Color::Cyan } else { Color::DarkGray }))
        .title(" Chat ");

    // Rows are pre-wrapped, so no Wrap here: the offset must match the rows
    let chat = Paragraph::new(lines).block(chat_block).scroll((offset, 0));
    frame.render_widget(chat, log_area);

    render_input(app, frame, input_area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_focused = app.focus == Focus::Input;
    let border_color = if input_focused { Color::Yellow } else { Color::DarkGray };

    let title = if app.focus == Focus::Confirm {
        " Message (Tab to type) "
    } else {
        " Message (Enter to send) "
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, area);

    if input_focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

// ---------------------------------------------------------------------------
// Data pane
// ---------------------------------------------------------------------------

fn render_data_panel(app: &App, frame: &mut Frame, area: Rect) {
    match app.widget.display() {
        DataDisplay::Empty => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Data ");
            let hint = Paragraph::new(Span::styled(
                EMPTY_PANEL_TEXT,
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(hint, area);
        }
        DataDisplay::AddEmployeeForm(form) => {
            render_form(form, app.focus == Focus::Form, frame, area)
        }
        DataDisplay::Results(ResultView::Table(table)) => render_table(table, frame, area),
        DataDisplay::Results(ResultView::NoData { query_executed }) => {
            let [notice_area, query_area] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
            let notice = Paragraph::new(NO_DATA_NOTICE).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Query Results "),
            );
            frame.render_widget(notice, notice_area);
            if let Some(query) = query_executed {
                render_executed_query(query, frame, query_area);
            }
        }
        DataDisplay::Success(text) => render_outcome(text, " Success ", Color::Green, frame, area),
        DataDisplay::Error(text) => render_outcome(text, " Error ", Color::Red, frame, area),
    }
}

fn render_outcome(text: &str, title: &str, color: Color, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title.to_string(), Style::default().fg(color).bold()));
    let body = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

fn render_executed_query(query: &str, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", EXECUTED_QUERY_LABEL));
    let sql = Paragraph::new(query.to_string())
        .style(Style::default().fg(Color::Magenta))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(sql, area);
}

fn render_table(table: &DataTable, frame: &mut Frame, area: Rect) {
    let query_height = match &table.query_executed {
        Some(query) => {
            let inner = area.width.saturating_sub(2).max(1) as usize;
            (query.chars().count().div_ceil(inner).min(6) + 2) as u16
        }
        None => 0,
    };

    let [table_area, query_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(query_height),
    ])
    .areas(area);

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone())).collect::<Vec<_>>()))
        .collect();

    let widths = vec![Constraint::Fill(1); table.headers.len().max(1)];
    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", table.title)),
        );
    frame.render_widget(widget, table_area);

    if let Some(query) = &table.query_executed {
        render_executed_query(query, frame, query_area);
    }
}

fn form_lines(form: &AddEmployeeForm, focused: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(form.fields.len() + 2);

    for (i, field) in form.fields.iter().enumerate() {
        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.to_string()
        };
        let is_current = focused && form.focus == FormFocus::Field(i);

        let label_style = if is_current {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let value_style = if is_current {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![
            Span::styled(format!("{:<width$}", label, width = FORM_LABEL_WIDTH), label_style),
            Span::styled(field.value.clone(), value_style),
        ];
        if let Some(hint) = field.hint {
            spans.push(Span::styled(
                format!("  ({})", hint),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    let button_style = if focused && form.focus == FormFocus::Submit {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", AddEmployeeForm::SUBMIT_LABEL),
        button_style,
    )));

    lines
}

fn render_form(form: &AddEmployeeForm, focused: bool, frame: &mut Frame, area: Rect) {
    let border_color = if focused { Color::Magenta } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", AddEmployeeForm::TITLE));

    let body = Paragraph::new(form_lines(form, focused)).block(block);
    frame.render_widget(body, area);

    if let (true, FormFocus::Field(i)) = (focused, form.focus) {
        let Some(field) = form.fields.get(i) else {
            return;
        };
        let column = u16::try_from(FORM_LABEL_WIDTH + field.value.chars().count())
            .unwrap_or(u16::MAX);
        let row = u16::try_from(i).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(column);
        let y = area.y.saturating_add(1).saturating_add(row);
        if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
            frame.set_cursor_position((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrchat_core::ChatClient;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn app() -> App {
        App::new(ChatClient::new("http://127.0.0.1:5000"))
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn respond(app: &mut App, user: &str, response: serde_json::Value) {
        app.widget.submit_message(user);
        app.widget.start_next().unwrap();
        app.finish_call(Ok(response));
    }

    #[test]
    fn test_empty_screen() {
        let mut app = app();
        let screen = draw(&mut app);
        assert!(screen.contains("HR Assistant"));
        assert!(screen.contains("http://127.0.0.1:5000/chat"));
        assert!(screen.contains(EMPTY_PANEL_TEXT));
        assert!(screen.contains("✕"));
        assert!(screen.contains("Message (Enter to send)"));
    }

    #[test]
    fn test_closed_chat_hides_log_and_input() {
        let mut app = app();
        app.toggle_chat();
        let screen = draw(&mut app);
        assert!(screen.contains("✉"));
        assert!(!screen.contains("Message (Enter to send)"));
    }

    #[test]
    fn test_chat_log_and_thinking() {
        let mut app = app();
        respond(&mut app, "hello", json!({ "type": "CHAT", "response_text": "Hi there!" }));
        app.widget.submit_message("who is on leave?");
        app.widget.start_next().unwrap();

        let screen = draw(&mut app);
        assert!(screen.contains("You:"));
        assert!(screen.contains("Bot:"));
        assert!(screen.contains("Hi there!"));
        assert!(screen.contains("Thinking."));
        assert!(screen.contains("working"));
    }

    #[test]
    fn test_confirmation_controls_follow_the_flow() {
        let mut app = app();
        respond(
            &mut app,
            "raise salaries",
            json!({
                "type": "CONFIRMATION_REQUIRED",
                "response_text": "About to run `UPDATE employees SET salary = salary * 1.1`",
                "query_to_confirm": "UPDATE employees SET salary = salary * 1.1",
                "query_type_to_confirm": "UPDATE",
            }),
        );

        let screen = draw(&mut app);
        assert!(screen.contains("Yes, Proceed"));
        assert!(screen.contains("No, Cancel"));
        // Backticks are dropped from preformatted text
        assert!(!screen.contains('`'));
        assert!(screen.contains("CONFIRM"));

        app.decide(ConfirmChoice::Proceed);
        let screen = draw(&mut app);
        assert!(!screen.contains("Yes, Proceed"));
        assert!(screen.contains("User confirmed. Executing..."));
    }

    #[test]
    fn test_results_table() {
        let mut app = app();
        respond(
            &mut app,
            "list staff",
            json!({
                "type": "DATA_RESULT",
                "response_text": "2 employees.",
                "data": [
                    { "first_name": "Alice", "department_id": 10 },
                    { "first_name": "Bob", "department_id": null },
                ],
                "query_executed": "SELECT first_name, department_id FROM employees",
            }),
        );

        let screen = draw(&mut app);
        assert!(screen.contains("Query Results: \"list staff\""));
        assert!(screen.contains("First Name"));
        assert!(screen.contains("Department Id"));
        assert!(screen.contains("Alice"));
        assert!(screen.contains("N/A"));
        assert!(screen.contains(EXECUTED_QUERY_LABEL));
        assert!(screen.contains("SELECT first_name"));
    }

    #[test]
    fn test_no_data_notice() {
        let mut app = app();
        respond(&mut app, "ghosts", json!({ "type": "DATA_RESULT", "data": [] }));
        let screen = draw(&mut app);
        assert!(screen.contains(NO_DATA_NOTICE));
        assert!(!screen.contains(EXECUTED_QUERY_LABEL));
    }

    #[test]
    fn test_form_panel() {
        let mut app = app();
        respond(
            &mut app,
            "hire Alice",
            json!({
                "type": "LOAD_COMPONENT",
                "response_text": "Fill this in.",
                "component_name": "add_employee_form",
                "pre_fill_data": { "first_name": "Alice" },
            }),
        );

        let screen = draw(&mut app);
        assert!(screen.contains(AddEmployeeForm::TITLE));
        assert!(screen.contains("First Name *"));
        assert!(screen.contains("Phone Number"));
        assert!(!screen.contains("Phone Number *"));
        assert!(screen.contains("(YYYY-MM-DD)"));
        assert!(screen.contains("Alice"));
        assert!(screen.contains(AddEmployeeForm::SUBMIT_LABEL));
        assert!(screen.contains("FORM"));
    }

    #[test]
    fn test_outcome_panels() {
        let mut app = app();
        respond(&mut app, "fire", json!({ "type": "EXECUTION_ERROR", "response_text": "FK violation" }));
        let screen = draw(&mut app);
        assert!(screen.contains(" Error "));
        assert!(screen.contains("FK violation"));

        respond(&mut app, "fix", json!({ "type": "ACTION_SUCCESS", "response_text": "Done." }));
        let screen = draw(&mut app);
        assert!(screen.contains(" Success "));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        app.scroll_up(500);
        draw(&mut app);
        assert_eq!(app.chat_scroll, 0);

        for i in 0..40 {
            respond(&mut app, &format!("q{}", i), json!({ "type": "CHAT", "response_text": "a" }));
        }
        app.scroll_up(5);
        draw(&mut app);
        assert_eq!(app.chat_scroll, 5);
    }

    #[test]
    fn test_newest_reply_visible_after_wrapped_history() {
        let mut app = app();
        let long_word = "x".repeat(29);
        let wordy = vec![long_word.as_str(); 4].join(" ");
        for i in 0..15 {
            respond(&mut app, &format!("q{}", i), json!({ "type": "CHAT", "response_text": wordy }));
        }
        respond(&mut app, "last", json!({ "type": "CHAT", "response_text": "NEWEST-REPLY" }));

        let screen = draw(&mut app);
        assert_eq!(app.chat_scroll, 0);
        assert!(screen.contains("NEWEST-REPLY"));
    }

    #[test]
    fn test_pending_controls_visible_at_bottom() {
        let mut app = app();
        let wordy = "several words that will need wrapping in a narrow chat pane ".repeat(4);
        for i in 0..10 {
            respond(&mut app, &format!("q{}", i), json!({ "type": "CHAT", "response_text": wordy }));
        }
        respond(
            &mut app,
            "purge",
            json!({
                "type": "CONFIRMATION_REQUIRED",
                "response_text": "Delete every cancelled request?",
                "query_to_confirm": "DELETE FROM leave_requests WHERE status = 'Cancelled'",
            }),
        );

        let screen = draw(&mut app);
        assert!(screen.contains("Yes, Proceed"));
    }

    #[test]
    fn test_wrap_text_to_width() {
        assert_eq!(wrap_text_to_width("ab cd ef", 5), vec!["ab cd", "ef"]);
        assert_eq!(wrap_text_to_width("abcdefghij x", 4), vec!["abcd", "efgh", "ij x"]);
        assert_eq!(wrap_text_to_width("", 4), vec![""]);
    }

    #[test]
    fn test_wrap_preformatted_keeps_spacing() {
        assert_eq!(wrap_preformatted("  SELECT  *", 6), vec!["  SELE", "CT  *"]);
        assert_eq!(wrap_preformatted("  ok", 10), vec!["  ok"]);
    }

    #[test]
    fn test_form_cursor_with_very_long_value() {
        let mut app = app();
        respond(
            &mut app,
            "hire",
            json!({ "type": "LOAD_COMPONENT", "component_name": "add_employee_form" }),
        );
        app.widget.form_mut().unwrap().set_value("first_name", "a".repeat(70_000));
        draw(&mut app);
    }
}
