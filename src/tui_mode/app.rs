use unicode_segmentation::UnicodeSegmentation;

use crate::command::{self, Outcome};
use crate::history::HistoryLog;

pub struct HistoryEntry {
    pub input: String,
    pub outcome: Result<Outcome, String>,
}

pub struct App {
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub log: HistoryLog,
    pub entries: Vec<HistoryEntry>,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
}

impl App {
    pub fn new(log: HistoryLog) -> Self {
        App {
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            log,
            entries: Vec::new(),
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        } else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total_chars.saturating_sub(visible_width) {
            self.input_scroll = total_chars.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                self.should_quit = true;
                return;
            }
            "clear" | "reset" => {
                self.entries.clear();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.clear_input();
                return;
            }
            "help" => {
                self.show_help = true;
                self.clear_input();
                return;
            }
            _ => {}
        }

        let result = command::parse_line(&input)
            .and_then(|cmd| command::execute(&cmd, &self.log))
            .map_err(|e| e.to_string());

        let outcome = match result {
            Ok(outcome) => {
                // arithmetic results go to the persisted log as well
                if let Outcome::Value { summary, value } = &outcome {
                    match self.log.append(summary, *value) {
                        Ok(()) => Ok(outcome),
                        Err(e) => Err(format!("history write failed: {}", e)),
                    }
                } else {
                    Ok(outcome)
                }
            }
            Err(e) => Err(e),
        };

        self.entries.push(HistoryEntry { input, outcome });
        self.cursor_history = self.entries.len().saturating_sub(1);
        self.clear_input();
        self.scroll_to_bottom = true;
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let byte_pos = Self::char_index_to_byte_index(&self.input, self.cursor_position);

        let target = if direction < 0 {
            self.input[..byte_pos]
                .unicode_word_indices()
                .map(|(i, _)| i)
                .last()
                .unwrap_or(0)
        } else {
            self.input[byte_pos..]
                .unicode_word_indices()
                .map(|(i, word)| byte_pos + i + word.len())
                .find(|&end| end > byte_pos)
                .unwrap_or(self.input.len())
        };

        self.cursor_position = self.input[..target].chars().count();
    }

    pub fn navigate_history(&mut self, direction: i32) {
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < self.entries.len().saturating_sub(1) {
            self.cursor_history += 1;
        }

        if self.cursor_history < self.entries.len() {
            self.input = self.entries[self.cursor_history].input.clone();
        } else {
            self.input.clear();
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self
                .cursor_history
                .saturating_add(step)
                .min(self.entries.len().saturating_sub(1));
        }

        if self.cursor_history < self.entries.len() {
            self.input = self.entries[self.cursor_history].input.clone();
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or_else(|| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn app(name: &str) -> App {
        let path: PathBuf =
            std::env::temp_dir().join(format!("mcalc_tui_{}_{}.txt", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        App::new(HistoryLog::open(path).unwrap())
    }

    #[test]
    fn submit_records_value_outcome() {
        let mut app = app("value_outcome");
        app.input = "sum 2 3".to_string();
        app.submit();
        assert_eq!(app.entries.len(), 1);
        match &app.entries[0].outcome {
            Ok(Outcome::Value { summary, value }) => {
                assert_eq!(summary, "sum 2 3");
                assert_eq!(*value, 5.0);
            }
            other => panic!("unexpected outcome: {:?}", other.is_ok()),
        }
        assert!(app.input.is_empty());
    }

    #[test]
    fn submit_records_parse_error() {
        let mut app = app("parse_error");
        app.input = "graph cot".to_string();
        app.submit();
        assert_eq!(app.entries.len(), 1);
        assert!(app.entries[0].outcome.is_err());
    }

    #[test]
    fn word_movement_stops_at_boundaries() {
        let mut app = app("word_movement");
        app.input = "graph poly 1 -3 2".to_string();
        app.cursor_position = app.input.chars().count();

        app.move_cursor_by_words(-1);
        assert_eq!(app.cursor_position, 16); // before "2"

        app.cursor_position = 0;
        app.move_cursor_by_words(1);
        assert_eq!(app.cursor_position, 5); // after "graph"
    }
}
