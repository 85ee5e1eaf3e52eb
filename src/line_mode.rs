use std::io::{stdin, stdout, Write};

use anyhow::Result;
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};

use crate::calc_engine::format_number;
use crate::command::{self, Outcome};
use crate::history::{HistoryLog, DEFAULT_FILE};

const PROMPT: &str = "mcalc> ";

// Позиция символа -> байтовая позиция
fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| s.len())
}

fn remove_char_at(s: &mut String, char_index: usize) {
    let byte_idx = char_index_to_byte_index(s, char_index);
    if let Some(c) = s[byte_idx..].chars().next() {
        s.drain(byte_idx..byte_idx + c.len_utf8());
    }
}

pub fn run_line() -> Result<()> {
    println!("mcalc - console calculator with ASCII graphs");
    println!("Commands: sum, sub, mul, div, fact, sqr, graph <function>, history");
    println!("Navigation: Left/Right, Backspace/Delete, Home/End, Up/Down for recall");
    println!("Type 'help' for usage, 'quit' to exit\n");

    let mut log = HistoryLog::open(DEFAULT_FILE)?;
    let mut stdout = stdout().into_raw_mode()?;
    let mut session: Vec<String> = Vec::new();
    let mut session_index = 0usize;

    loop {
        write!(stdout, "{}{}", ClearLine, PROMPT)?;
        stdout.flush()?;

        let mut input = String::new();
        let mut cursor_pos = 0usize;
        let (_, row) = stdout.cursor_pos()?;

        let stdin = stdin();
        let mut keys = stdin.keys();

        loop {
            write!(stdout, "{}{}{}{}", Goto(1, row), ClearLine, PROMPT, input)?;
            write!(
                stdout,
                "{}",
                Goto((PROMPT.len() + cursor_pos + 1) as u16, row)
            )?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                return Ok(());
            };
            match key? {
                Key::Char('\n') => break,
                Key::Char(c) => {
                    let byte_idx = char_index_to_byte_index(&input, cursor_pos);
                    input.insert(byte_idx, c);
                    cursor_pos += 1;
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    remove_char_at(&mut input, cursor_pos);
                }
                Key::Delete if cursor_pos < input.chars().count() => {
                    remove_char_at(&mut input, cursor_pos);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < input.chars().count() => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = input.chars().count(),
                Key::Up => {
                    if session_index > 0 {
                        session_index -= 1;
                        input = session[session_index].clone();
                        cursor_pos = input.chars().count();
                    }
                }
                Key::Down => {
                    if session_index < session.len().saturating_sub(1) {
                        session_index += 1;
                        input = session[session_index].clone();
                        cursor_pos = input.chars().count();
                    } else {
                        session_index = session.len();
                        input.clear();
                        cursor_pos = 0;
                    }
                }
                Key::Ctrl('c') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                _ => {}
            }
        }

        let input = input.trim().to_string();
        write!(stdout, "\r\n")?;

        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                write!(stdout, "\rGoodbye!\r\n")?;
                return Ok(());
            }
            "clear" | "reset" => {
                session.clear();
                session_index = 0;
                write!(stdout, "\rSession history cleared\r\n\r\n")?;
                continue;
            }
            "help" => {
                for line in command::usage().lines() {
                    write!(stdout, "\r{}\r\n", line)?;
                }
                write!(stdout, "\r\n")?;
                continue;
            }
            _ => {}
        }

        session.push(input.clone());
        session_index = session.len();

        let outcome = command::parse_line(&input).and_then(|cmd| command::execute(&cmd, &log));
        match outcome {
            Ok(Outcome::Value { summary, value }) => {
                log.append(&summary, value)?;
                write!(stdout, "\r  {} = {}\r\n\r\n", summary, format_number(value))?;
            }
            Ok(Outcome::Graph(plot)) => {
                write!(stdout, "\r{}\r\n", plot.description)?;
                for line in &plot.lines {
                    write!(stdout, "\r{}\r\n", line)?;
                }
                write!(stdout, "\r\n")?;
            }
            Ok(Outcome::Listing(entries)) => {
                if entries.is_empty() {
                    write!(stdout, "\r  History is empty\r\n\r\n")?;
                } else {
                    for entry in &entries {
                        write!(stdout, "\r  {}\r\n", entry)?;
                    }
                    write!(stdout, "\r\n")?;
                }
            }
            Err(e) => {
                write!(stdout, "\r  Error: {}\r\n\r\n", e)?;
            }
        }
    }
}
