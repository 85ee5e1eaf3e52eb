use crate::calc_engine::{format_number, parse_number, Op};
use crate::error::{CalcError, CalcResult};
use crate::graph_engine::{self, Func, Plot};
use crate::history::HistoryLog;

/// One parsed invocation, shared by the argv surface and the interactive
/// modes. `quit`/`clear`/`help` are mode-level words and never reach here.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Calc { op: Op, operands: Vec<f64> },
    Graph { func: Func, start: f64, end: f64 },
    History,
}

pub enum Outcome {
    Value { summary: String, value: f64 },
    Graph(Plot),
    Listing(Vec<String>),
}

pub fn parse_line(line: &str) -> CalcResult<Command> {
    let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    parse(&args)
}

pub fn parse(args: &[String]) -> CalcResult<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Err(CalcError::invalid("No command given"));
    };

    if name.eq_ignore_ascii_case("graph") {
        return parse_graph(rest);
    }
    if name.eq_ignore_ascii_case("history") {
        if !rest.is_empty() {
            return Err(CalcError::invalid("'history' takes no arguments"));
        }
        return Ok(Command::History);
    }

    match Op::parse(name) {
        Some(op) => {
            if rest.len() != op.arity() {
                return Err(CalcError::invalid(format!(
                    "'{}' expects {} operand(s), got {}",
                    op.name(),
                    op.arity(),
                    rest.len()
                )));
            }
            let operands = rest
                .iter()
                .map(|s| parse_number(s))
                .collect::<CalcResult<Vec<f64>>>()?;
            Ok(Command::Calc { op, operands })
        }
        None => Err(CalcError::invalid(format!("Unknown operation: {}", name))),
    }
}

fn parse_graph(rest: &[String]) -> CalcResult<Command> {
    let Some((fname, tail)) = rest.split_first() else {
        return Err(CalcError::invalid("'graph' expects a function name"));
    };

    if fname.eq_ignore_ascii_case("poly") {
        return parse_poly(tail);
    }

    let func = Func::builtin(fname)?;
    let (start, end) = match tail.len() {
        0 => func.default_range(),
        2 => (parse_number(&tail[0])?, parse_number(&tail[1])?),
        _ => {
            return Err(CalcError::invalid(
                "'graph' expects either no interval or both start and end",
            ))
        }
    };
    Ok(Command::Graph { func, start, end })
}

fn parse_poly(tail: &[String]) -> CalcResult<Command> {
    let (coeff_args, range) = match tail.iter().position(|a| a == "--range") {
        Some(idx) => {
            let bounds = &tail[idx + 1..];
            if bounds.len() != 2 {
                return Err(CalcError::invalid("'--range' expects start and end"));
            }
            let start = parse_number(&bounds[0])?;
            let end = parse_number(&bounds[1])?;
            (&tail[..idx], Some((start, end)))
        }
        None => (tail, None),
    };

    let coeffs = coeff_args
        .iter()
        .map(|s| parse_number(s))
        .collect::<CalcResult<Vec<f64>>>()?;
    let func = Func::poly(coeffs)?;
    let (start, end) = range.unwrap_or_else(|| func.default_range());
    Ok(Command::Graph { func, start, end })
}

/// Run a command. Pure with respect to the log: callers append successful
/// `Value` outcomes themselves, so the two interactive modes and the argv
/// surface share one execution path.
pub fn execute(cmd: &Command, log: &HistoryLog) -> CalcResult<Outcome> {
    match cmd {
        Command::Calc { op, operands } => {
            let value = op.apply(operands)?;
            let summary = std::iter::once(op.name().to_string())
                .chain(operands.iter().map(|v| format_number(*v)))
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Outcome::Value { summary, value })
        }
        Command::Graph { func, start, end } => {
            Ok(Outcome::Graph(graph_engine::plot(func, *start, *end)?))
        }
        Command::History => Ok(Outcome::Listing(log.entries().to_vec())),
    }
}

pub fn usage() -> &'static str {
    "\
Usage: mcalc <command> [args...]

Commands:
  sum <a> <b>                       Addition
  sub <a> <b>                       Subtraction
  mul <a> <b>                       Multiplication
  div <a> <b>                       Division
  fact <n>                          Factorial
  sqr <a>                           Square
  graph <function> [start end]      Plot sin, cos, tan, sqr, exp or log
  graph poly <c...> [--range a b]   Plot a polynomial, coefficients in
                                    descending power order
  history                           Show the computation log

Run without arguments for the interactive mode."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_arithmetic() {
        let cmd = parse(&args(&["sum", "2", "3"])).unwrap();
        assert_eq!(
            cmd,
            Command::Calc {
                op: Op::Sum,
                operands: vec![2.0, 3.0]
            }
        );
    }

    #[test]
    fn rejects_wrong_operand_count() {
        assert!(matches!(
            parse(&args(&["sum", "2"])),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            parse(&args(&["fact", "2", "3"])),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_unknown_operation() {
        assert!(matches!(
            parse(&args(&["pow", "2", "3"])),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn graph_defaults_to_function_range() {
        let cmd = parse(&args(&["graph", "sin"])).unwrap();
        match cmd {
            Command::Graph { func, start, end } => {
                assert_eq!(func, Func::Sin);
                assert!((start + 2.0 * std::f64::consts::PI).abs() < 1e-12);
                assert!((end - 2.0 * std::f64::consts::PI).abs() < 1e-12);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn graph_takes_explicit_interval() {
        let cmd = parse(&args(&["graph", "exp", "-1", "4"])).unwrap();
        assert_eq!(
            cmd,
            Command::Graph {
                func: Func::Exp,
                start: -1.0,
                end: 4.0
            }
        );
    }

    #[test]
    fn graph_rejects_half_interval() {
        assert!(matches!(
            parse(&args(&["graph", "sin", "-1"])),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn graph_rejects_unknown_function() {
        assert!(matches!(
            parse(&args(&["graph", "cot"])),
            Err(CalcError::UnsupportedFunction(_))
        ));
    }

    #[test]
    fn poly_with_range() {
        let cmd = parse(&args(&["graph", "poly", "1", "-3", "2", "--range", "0", "5"])).unwrap();
        assert_eq!(
            cmd,
            Command::Graph {
                func: Func::Poly(vec![1.0, -3.0, 2.0]),
                start: 0.0,
                end: 5.0
            }
        );
    }

    #[test]
    fn poly_defaults_to_ten() {
        let cmd = parse(&args(&["graph", "poly", "1", "0", "0"])).unwrap();
        assert_eq!(
            cmd,
            Command::Graph {
                func: Func::Poly(vec![1.0, 0.0, 0.0]),
                start: -10.0,
                end: 10.0
            }
        );
    }

    #[test]
    fn poly_rejects_empty_coefficients() {
        assert!(matches!(
            parse(&args(&["graph", "poly"])),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            parse(&args(&["graph", "poly", "--range", "0", "5"])),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn poly_rejects_incomplete_range() {
        assert!(matches!(
            parse(&args(&["graph", "poly", "1", "--range", "0"])),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn calc_summary_matches_history_format() {
        let log = HistoryLog::open(
            std::env::temp_dir().join(format!("mcalc_cmd_{}.txt", std::process::id())),
        )
        .unwrap();
        let cmd = parse(&args(&["sum", "2", "3"])).unwrap();
        match execute(&cmd, &log).unwrap() {
            Outcome::Value { summary, value } => {
                assert_eq!(summary, "sum 2 3");
                assert_eq!(value, 5.0);
            }
            _ => panic!("expected a value outcome"),
        }
    }
}
