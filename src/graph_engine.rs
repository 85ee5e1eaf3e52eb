use std::f64::consts::PI;

use crate::calc_engine::format_number;
use crate::error::{CalcError, CalcResult};

pub const GRID_WIDTH: usize = 80;
pub const GRID_HEIGHT: usize = 20;

const SAMPLE_GLYPH: char = '*';
const H_AXIS_GLYPH: char = '-';
const V_AXIS_GLYPH: char = '|';

/// A plottable function: one of the fixed built-ins or a polynomial given
/// by its coefficients in descending power order.
#[derive(Debug, Clone, PartialEq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sqr,
    Exp,
    Log,
    Poly(Vec<f64>),
}

impl Func {
    pub fn builtin(name: &str) -> CalcResult<Func> {
        match name.to_lowercase().as_str() {
            "sin" => Ok(Func::Sin),
            "cos" => Ok(Func::Cos),
            "tan" => Ok(Func::Tan),
            "sqr" => Ok(Func::Sqr),
            "exp" => Ok(Func::Exp),
            "log" => Ok(Func::Log),
            other => Err(CalcError::UnsupportedFunction(other.to_string())),
        }
    }

    pub fn poly(coeffs: Vec<f64>) -> CalcResult<Func> {
        if coeffs.is_empty() {
            return Err(CalcError::invalid(
                "poly requires at least one coefficient",
            ));
        }
        Ok(Func::Poly(coeffs))
    }

    /// Evaluate at `x`. `log` does not guard its domain: NaN and infinities
    /// flow into the renderer unchanged.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Sqr => x * x,
            Func::Exp => x.exp(),
            Func::Log => x.ln(),
            Func::Poly(coeffs) => horner(coeffs, x),
        }
    }

    pub fn default_range(&self) -> (f64, f64) {
        match self {
            Func::Sin | Func::Cos | Func::Tan => (-2.0 * PI, 2.0 * PI),
            _ => (-10.0, 10.0),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Func::Sin => "sin(x)".to_string(),
            Func::Cos => "cos(x)".to_string(),
            Func::Tan => "tan(x)".to_string(),
            Func::Sqr => "x*x".to_string(),
            Func::Exp => "exp(x)".to_string(),
            Func::Log => "ln(x)".to_string(),
            Func::Poly(coeffs) => {
                let list = coeffs
                    .iter()
                    .map(|c| format_number(*c))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("poly({})", list)
            }
        }
    }
}

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Evaluate `func` at `width` evenly spaced points across `[start, end]`.
/// The first x equals `start` and the last equals `end`.
pub fn sample(func: &Func, start: f64, end: f64, width: usize) -> CalcResult<Vec<(f64, f64)>> {
    if width < 2 {
        return Err(CalcError::invalid("sample width must be at least 2"));
    }
    if start == end {
        return Err(CalcError::invalid(
            "interval must have distinct start and end",
        ));
    }

    let step = (end - start) / (width - 1) as f64;
    Ok((0..width)
        .map(|j| {
            let x = start + j as f64 * step;
            (x, func.eval(x))
        })
        .collect())
}

pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    fn set(&mut self, row: usize, col: usize, glyph: char) {
        self.cells[row * self.width + col] = glyph;
    }

    fn set_if_blank(&mut self, row: usize, col: usize, glyph: char) {
        let cell = &mut self.cells[row * self.width + col];
        if *cell == ' ' {
            *cell = glyph;
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                self.cells[row * self.width..(row + 1) * self.width]
                    .iter()
                    .collect()
            })
            .collect()
    }
}

/// Map sampled y-values onto the grid and overlay the coordinate axes.
/// Sample glyphs always win over axis glyphs; the horizontal axis is drawn
/// before the vertical one, so the intersection keeps the dash.
pub fn render(samples: &[(f64, f64)], start: f64, end: f64, width: usize, height: usize) -> Grid {
    let mut grid = Grid::new(width, height);

    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in samples {
        if y < min_y {
            min_y = y;
        }
        if y > max_y {
            max_y = y;
        }
    }
    if min_y == max_y {
        // constant function: widen symmetrically so the line sits centered
        min_y -= 1.0;
        max_y += 1.0;
    }

    let row_for = |y: f64| {
        let norm = (y - min_y) / (max_y - min_y);
        ((height - 1) as f64 * (1.0 - norm)).round()
    };

    for (col, &(_, y)) in samples.iter().enumerate().take(width) {
        let row = row_for(y);
        // out-of-range and non-finite rows are dropped, never clamped
        if row >= 0.0 && row < height as f64 {
            grid.set(row as usize, col, SAMPLE_GLYPH);
        }
    }

    if min_y <= 0.0 && 0.0 <= max_y {
        let row = row_for(0.0);
        if row >= 0.0 && row < height as f64 {
            for col in 0..width {
                grid.set_if_blank(row as usize, col, H_AXIS_GLYPH);
            }
        }
    }

    if start <= 0.0 && 0.0 <= end {
        let col = ((0.0 - start) / (end - start) * (width - 1) as f64).round();
        if col >= 0.0 && col < width as f64 {
            for row in 0..height {
                grid.set_if_blank(row, col as usize, V_AXIS_GLYPH);
            }
        }
    }

    grid
}

/// A rendered graph: one description line plus `GRID_HEIGHT` text lines of
/// `GRID_WIDTH` characters each.
pub struct Plot {
    pub description: String,
    pub lines: Vec<String>,
}

pub fn plot(func: &Func, start: f64, end: f64) -> CalcResult<Plot> {
    let samples = sample(func, start, end, GRID_WIDTH)?;
    let grid = render(&samples, start, end, GRID_WIDTH, GRID_HEIGHT);
    Ok(Plot {
        description: format!(
            "Graph of {} on [{}, {}]",
            func.describe(),
            format_number(start),
            format_number(end)
        ),
        lines: grid.to_lines(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;

    #[test]
    fn sampler_covers_interval() {
        let samples = sample(&Func::Sin, -1.0, 3.0, 80).unwrap();
        assert_eq!(samples.len(), 80);
        assert!((samples[0].0 - -1.0).abs() < 1e-12);
        assert!((samples[79].0 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn sampler_rejects_degenerate_width() {
        assert!(matches!(
            sample(&Func::Sin, 0.0, 1.0, 1),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn sampler_rejects_degenerate_interval() {
        assert!(matches!(
            sample(&Func::Sin, 2.0, 2.0, 80),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn horner_evaluation() {
        // x^2 - 3x + 2
        let poly = Func::poly(vec![1.0, -3.0, 2.0]).unwrap();
        assert_eq!(poly.eval(2.0), 0.0);
        assert_eq!(poly.eval(0.0), 2.0);
    }

    #[test]
    fn empty_polynomial_rejected() {
        assert!(matches!(
            Func::poly(Vec::new()),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn unsupported_function_lists_builtins() {
        let err = Func::builtin("cot").unwrap_err();
        assert!(matches!(err, CalcError::UnsupportedFunction(_)));
        let msg = err.to_string();
        for name in ["sin", "cos", "tan", "sqr", "exp", "log", "poly"] {
            assert!(msg.contains(name), "missing '{}' in: {}", name, msg);
        }
    }

    #[test]
    fn constant_function_renders_centered_line() {
        let constant = Func::poly(vec![5.0]).unwrap();
        let result = plot(&constant, 1.0, 10.0).unwrap();
        assert_eq!(result.lines.len(), GRID_HEIGHT);
        for line in &result.lines {
            assert_eq!(line.chars().count(), GRID_WIDTH);
        }

        // min/max widened to [4, 6]; y = 5 normalizes to the center band
        let center = ((GRID_HEIGHT - 1) as f64 * 0.5).round() as usize;
        assert!(result.lines[center].chars().all(|c| c == '*'));
        for (row, line) in result.lines.iter().enumerate() {
            if row != center {
                assert!(line.chars().all(|c| c == ' '));
            }
        }
    }

    #[test]
    fn sine_shows_both_axes_and_oscillation() {
        let (start, end) = Func::Sin.default_range();
        let result = plot(&Func::Sin, start, end).unwrap();

        assert!(result.lines[0].contains('*'), "no sample in top band");
        assert!(result.lines[19].contains('*'), "no sample in bottom band");

        let axis_row = &result.lines[10];
        assert!(axis_row.contains('-'), "horizontal axis missing");
        assert!(
            result.lines.iter().any(|l| l.as_bytes()[40] == b'|'),
            "vertical axis missing"
        );
    }

    #[test]
    fn axes_absent_outside_origin() {
        // y in [4, 6] and x in [1, 10]: neither axis qualifies
        let constant = Func::poly(vec![5.0]).unwrap();
        let result = plot(&constant, 1.0, 10.0).unwrap();
        assert!(result.lines.iter().all(|l| !l.contains('-')));
        assert!(result.lines.iter().all(|l| !l.contains('|')));
    }

    #[test]
    fn sample_glyph_beats_axis_glyphs() {
        // y = x over [-39, 40]: column 39 samples x = 0 exactly, which lands
        // on both the horizontal axis row and the vertical axis column
        let identity = Func::poly(vec![1.0, 0.0]).unwrap();
        let result = plot(&identity, -39.0, 40.0).unwrap();

        let crossing_row = result
            .lines
            .iter()
            .position(|l| l.contains('-'))
            .expect("horizontal axis missing");
        assert_eq!(result.lines[crossing_row].as_bytes()[39], b'*');
    }

    #[test]
    fn axis_intersection_keeps_dash() {
        // sin over its default range: the column sampling nearest x = 0 maps
        // to row 9, so the axis crossing cell (10, 40) holds no sample and
        // shows the dash drawn by the earlier horizontal pass
        let (start, end) = Func::Sin.default_range();
        let result = plot(&Func::Sin, start, end).unwrap();
        assert_eq!(result.lines[10].as_bytes()[40], b'-');
    }

    #[test]
    fn log_nan_samples_draw_nothing() {
        // ln(x) on [-10, 10] is NaN for half the columns; those columns must
        // stay empty apart from axis glyphs
        let result = plot(&Func::Log, -10.0, 10.0).unwrap();
        for line in &result.lines {
            for (col, c) in line.chars().enumerate() {
                if col < 39 {
                    assert_ne!(c, '*', "sample glyph in NaN region at col {}", col);
                }
            }
        }
    }
}
