use hrchat_core::{ChatClient, ChatTransport, ChatWidget, MessageId, TransportError};
use serde_json::Value;

use crate::tui::{AppEvent, EventSender};

/// Glyph shown in the header while the chat is open (click-to-close).
pub const CLOSE_GLYPH: &str = "✕";
/// Glyph shown while the chat is closed.
pub const CHAT_GLYPH: &str = "✉";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Form,
    /// The Yes/No buttons of the pending confirmation
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmChoice {
    #[default]
    Proceed,
    Cancel,
}

impl ConfirmChoice {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Proceed => ConfirmChoice::Cancel,
            ConfirmChoice::Cancel => ConfirmChoice::Proceed,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub chat_open: bool,
    pub focus: Focus,

    // Message input
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat log view
    pub chat_scroll: u16, // lines scrolled up from the bottom
    pub chat_height: u16,
    pub chat_width: u16,
    pub confirm_choice: ConfirmChoice,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub widget: ChatWidget,
    pub client: ChatClient,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self::with_widget(client, ChatWidget::new())
    }

    pub fn with_widget(client: ChatClient, widget: ChatWidget) -> Self {
        Self {
            should_quit: false,
            chat_open: true,
            focus: Focus::Input,
            input: String::new(),
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            confirm_choice: ConfirmChoice::default(),
            animation_frame: 0,
            widget,
            client,
        }
    }

    pub fn toggle_glyph(&self) -> &'static str {
        if self.chat_open {
            CLOSE_GLYPH
        } else {
            CHAT_GLYPH
        }
    }

    /// Open or close the chat. Opening puts the cursor back in the input.
    pub fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
        if self.chat_open {
            self.focus = Focus::Input;
        } else if self.widget.display().form().is_some() {
            self.focus = Focus::Form;
        }
    }

    pub fn has_form(&self) -> bool {
        self.widget.display().form().is_some()
    }

    /// Send whatever is in the input box.
    pub fn send_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        self.cursor = 0;
        if self.widget.submit_message(&text) {
            self.scroll_to_bottom();
        }
        if self.chat_open {
            self.focus = Focus::Input;
        }
    }

    pub fn submit_form(&mut self) {
        self.widget.submit_form();
        self.scroll_to_bottom();
    }

    pub fn decide(&mut self, choice: ConfirmChoice) {
        let acted = match choice {
            ConfirmChoice::Proceed => self.widget.confirm_proceed(),
            ConfirmChoice::Cancel => self.widget.confirm_cancel(),
        };
        if acted {
            self.confirm_choice = ConfirmChoice::default();
            self.scroll_to_bottom();
        }
        if self.focus == Focus::Confirm {
            self.focus = Focus::Input;
        }
    }

    /// Kick off the next queued call, if the widget has one ready.
    pub fn start_pending_call(&mut self, tx: &EventSender) {
        let Some(call) = self.widget.start_next() else {
            return;
        };
        self.scroll_to_bottom();

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.send(&call.request).await;
            // The loop may already be gone on shutdown
            let _ = tx.send(AppEvent::CallFinished(result));
        });
    }

    pub fn finish_call(&mut self, result: Result<Value, TransportError>) {
        let had_form = self.has_form();
        let had_pending = self.pending_id();
        self.widget.complete(result);
        self.scroll_to_bottom();

        // Don't pull focus away from a message being typed
        let typing = self.chat_open && !self.input.is_empty();

        match (had_form, self.has_form()) {
            (false, true) if !typing => self.focus = Focus::Form,
            (_, false) if self.focus == Focus::Form => self.focus = Focus::Input,
            _ => {}
        }

        let pending = self.pending_id();
        if pending.is_none() && self.focus == Focus::Confirm {
            self.focus = Focus::Input;
        }
        if pending.is_some() && pending != had_pending {
            self.confirm_choice = ConfirmChoice::default();
            if self.chat_open && !typing {
                self.focus = Focus::Confirm;
            }
        }
    }

    fn pending_id(&self) -> Option<MessageId> {
        self.widget.pending_confirmation().map(|p| p.message_id)
    }

    pub fn tick_animation(&mut self) {
        if self.widget.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = 0;
    }
}
