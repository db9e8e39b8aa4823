use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key),
            Message::Tick => {
                self.drain_api_outcomes();
                self.maybe_revert_saved(Instant::now());
            }
            Message::Resize(_, _) => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.input.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('n') => self.open_input(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('f') => self.toggle_focus_mode(),
            KeyCode::Char('r') => self.load_tasks(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_input(),
            KeyCode::Enter => self.submit_new_task(),
            KeyCode::Backspace => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.push(ch);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = App::new(Settings::default(), false).unwrap();
        assert!(!app.should_quit());
        app.update(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit());

        let mut app = App::new(Settings::default(), false).unwrap();
        app.update(Message::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_input_mode_captures_typed_text() {
        let mut app = App::new(Settings::default(), false).unwrap();
        app.update(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.input.as_deref(), Some(""));

        for ch in "Walk".chars() {
            app.update(key(KeyCode::Char(ch))).unwrap();
        }
        app.update(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.input.as_deref(), Some("Wal"));

        // Esc while the input is focused cancels it instead of quitting.
        app.update(key(KeyCode::Esc)).unwrap();
        assert!(app.input.is_none());
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_focus_mode_key_toggles_flag() {
        let mut app = App::new(Settings::default(), false).unwrap();
        app.update(key(KeyCode::Char('f'))).unwrap();
        assert!(app.focus_mode);
        app.update(key(KeyCode::Char('f'))).unwrap();
        assert!(!app.focus_mode);
    }

    #[tokio::test]
    async fn test_submit_short_title_shows_validation_banner() {
        let mut app = App::new(Settings::default(), false).unwrap();
        app.update(key(KeyCode::Char('n'))).unwrap();
        app.update(key(KeyCode::Char('h'))).unwrap();
        app.update(key(KeyCode::Char('i'))).unwrap();
        app.update(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.banner.as_deref(), Some(super::super::TITLE_TOO_SHORT));
        assert!(app.tasks.is_empty());
    }
}
