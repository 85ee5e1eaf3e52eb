use anyhow::Result;

mod calc_engine;
mod command;
mod error;
mod graph_engine;
mod history;
#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use command::Outcome;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        return run_interactive();
    }

    if args[0].eq_ignore_ascii_case("help") {
        println!("{}", command::usage());
        return Ok(());
    }

    let cmd = match command::parse(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            println!("Error: {}", e);
            println!("{}", command::usage());
            return Ok(());
        }
    };

    let mut log = history::HistoryLog::open(history::DEFAULT_FILE)?;
    match command::execute(&cmd, &log) {
        Ok(Outcome::Value { summary, value }) => {
            log.append(&summary, value)?;
            println!("Result: {}", calc_engine::format_number(value));
        }
        Ok(Outcome::Graph(plot)) => {
            println!("{}", plot.description);
            for line in &plot.lines {
                println!("{}", line);
            }
        }
        Ok(Outcome::Listing(entries)) => {
            if entries.is_empty() {
                println!("History is empty");
            } else {
                for entry in entries {
                    println!("{}", entry);
                }
            }
        }
        Err(e) => println!("Error: {}", e),
    }

    Ok(())
}

fn run_interactive() -> Result<()> {
    #[cfg(feature = "tui")]
    {
        return tui_mode::run_tui();
    }

    #[cfg(all(feature = "line", not(feature = "tui")))]
    {
        return line_mode::run_line();
    }

    #[allow(unreachable_code)]
    {
        println!("{}", command::usage());
        Ok(())
    }
}
