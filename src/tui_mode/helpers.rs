use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec!["".to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            let mut remaining = word;
            while !remaining.is_empty() {
                let mut chunk = String::new();
                let mut chunk_width = 0;
                let mut chunk_byte_len = 0;

                for c in remaining.chars() {
                    let char_width = UnicodeWidthChar::width_cjk(c).unwrap_or(1);
                    if chunk_width + char_width > width {
                        break;
                    }
                    chunk.push(c);
                    chunk_width += char_width;
                    chunk_byte_len += c.len_utf8();
                }

                if !current_line.is_empty() {
                    lines.push(current_line.trim().to_string());
                    current_line.clear();
                    current_width = 0;
                }

                lines.push(chunk);
                remaining = &remaining[chunk_byte_len..];
            }
            continue;
        }

        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(current_line.trim().to_string());
            current_line.clear();
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line.trim().to_string());
    }

    lines
}

pub fn is_command_word(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "sum"
            | "sub"
            | "mul"
            | "div"
            | "fact"
            | "sqr"
            | "graph"
            | "poly"
            | "history"
            | "help"
            | "clear"
            | "quit"
            | "sin"
            | "cos"
            | "tan"
            | "exp"
            | "log"
    )
}

/// Split a command line into styled spans: known command words, the
/// `--range` flag, and numbers each get their own color.
pub fn highlight_command(line: &str, base_style: Style) -> Vec<Span<'static>> {
    let keyword_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);
    let flag_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let number_style = Style::default().fg(Color::LightGreen);

    let flush = |spans: &mut Vec<Span<'static>>, token: &mut String, was_space: bool| {
        if token.is_empty() {
            return;
        }
        let style = if was_space {
            Style::default()
        } else if is_command_word(token) {
            keyword_style
        } else if token == "--range" {
            flag_style
        } else if token.parse::<f64>().is_ok() {
            number_style
        } else {
            base_style
        };
        spans.push(Span::styled(token.clone(), style));
        token.clear();
    };

    let mut spans = Vec::new();
    let mut token = String::new();
    let mut in_space = false;

    for c in line.chars() {
        let is_space = c.is_whitespace();
        if is_space != in_space {
            flush(&mut spans, &mut token, in_space);
            in_space = is_space;
        }
        token.push(c);
    }
    flush(&mut spans, &mut token, in_space);

    spans
}
