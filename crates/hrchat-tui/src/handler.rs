use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use hrchat_core::FormFocus;
use crate::app::{App, ConfirmChoice, Focus};
use crate::tui::{AppEvent, EventSender};

const PAGE_SCROLL: u16 = 10;
const MOUSE_SCROLL_STEP: u16 = 3;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent, tx: &EventSender) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::CallFinished(result) => app.finish_call(result),
    }

    // Anything an event queued goes out now, one call at a time
    app.start_pending_call(tx);
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any mode
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if ctrl && key.code == KeyCode::Char('t') {
        app.toggle_chat();
        return;
    }

    match key.code {
        KeyCode::PageUp => return app.scroll_up(PAGE_SCROLL),
        KeyCode::PageDown => return app.scroll_down(PAGE_SCROLL),
        _ => {}
    }

    // The prompt can only hold focus while its buttons are on screen
    let prompt_shown = app.chat_open && app.widget.pending_confirmation().is_some();
    if app.focus == Focus::Confirm && !prompt_shown {
        app.focus = Focus::Input;
    }

    match app.focus {
        Focus::Confirm => handle_confirmation(app, key),
        Focus::Form if app.has_form() => handle_form(app, key),
        Focus::Form => app.focus = Focus::Input,
        Focus::Input if app.chat_open => handle_input(app, key),
        Focus::Input => {
            if app.has_form() {
                app.focus = Focus::Form;
                handle_form(app, key);
            }
        }
    }
}

fn handle_confirmation(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Right => {
            app.confirm_choice = app.confirm_choice.toggle();
        }
        KeyCode::Enter => app.decide(app.confirm_choice),
        KeyCode::Char('y') | KeyCode::Char('Y') => app.decide(ConfirmChoice::Proceed),
        KeyCode::Char('n') | KeyCode::Char('N') => app.decide(ConfirmChoice::Cancel),
        // Leave the question open and go back to chatting
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => app.focus = Focus::Input,
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        _ => {}
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.send_input(),
        KeyCode::Tab => {
            if app.widget.pending_confirmation().is_some() {
                app.focus = Focus::Confirm;
            } else if app.has_form() {
                app.focus = Focus::Form;
            }
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        app.submit_form();
        return;
    }

    let chat_open = app.chat_open;
    let Some(form) = app.widget.form_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc if chat_open => app.focus = Focus::Input,
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Enter => {
            if form.focus == FormFocus::Submit {
                app.submit_form();
            } else {
                form.focus_next();
            }
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => {
            form.insert_char(c);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_STEP),
        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_STEP),
        _ => {}
    }
}
