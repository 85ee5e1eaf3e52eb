use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" mcalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "mcalc - Terminal Calculator with ASCII Graphs",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Arithmetic:"),
        Line::from("  sum a b  : Addition        (e.g., sum 5 3 = 8)"),
        Line::from("  sub a b  : Subtraction     (e.g., sub 10 4 = 6)"),
        Line::from("  mul a b  : Multiplication  (e.g., mul 6 7 = 42)"),
        Line::from("  div a b  : Division        (e.g., div 15 3 = 5)"),
        Line::from("  fact n   : Factorial       (e.g., fact 5 = 120)"),
        Line::from("  sqr a    : Square          (e.g., sqr 4 = 16)"),
        Line::from(""),
        section("Graphs:"),
        Line::from("  graph <function> [start end]"),
        Line::from("    Functions: sin, cos, tan, sqr, exp, log"),
        Line::from("    Default interval: -2pi..2pi for sin/cos/tan, -10..10 otherwise"),
        Line::from("  graph poly <c...> [--range start end]"),
        Line::from("    Coefficients in descending power order"),
        Line::from("    e.g., graph poly 1 -3 2 plots x^2 - 3x + 2"),
        Line::from(""),
        Line::from("  Graphs draw on an 80x20 grid: '*' samples, '-' and '|' axes."),
        Line::from(""),
        section("History:"),
        Line::from("  history : Show the computation log (mcalc_history.txt)"),
        Line::from("  Every arithmetic result is appended to the log with a timestamp."),
        Line::from(""),
        section("Session commands:"),
        Line::from("  clear : Clear the session pane"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit the calculator"),
        Line::from(""),
        section("Navigation:"),
        Line::from("  Left/Right : Move cursor"),
        Line::from("  Ctrl+Left/Right : Move cursor by words"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  Up/Down : Recall previous commands"),
        Line::from("  PgUp/PgDn : Page through the session"),
        Line::from("  Mouse wheel : Scroll"),
        Line::from(""),
        section("Examples:"),
        Line::from("  graph sin"),
        Line::from("  graph exp -1 4"),
        Line::from("  graph poly 1 0 -2 --range -3 3"),
        Line::from("  fact 12"),
        Line::from("  history"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
