use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::calc_engine::format_number;

pub const DEFAULT_FILE: &str = "mcalc_history.txt";

/// Append-only computation log: one line per calculator invocation,
/// `<timestamp>: <operation> <args> = <result>`. Read in full at startup.
/// Concurrent writers may interleave lines; that is accepted.
pub struct HistoryLog {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut entries = Vec::new();

        if path.exists() {
            let file = File::open(&path)
                .with_context(|| format!("cannot read history file {}", path.display()))?;
            for line in BufReader::new(file).lines() {
                let line = line
                    .with_context(|| format!("cannot read history file {}", path.display()))?;
                if !line.trim().is_empty() {
                    entries.push(line);
                }
            }
        }

        Ok(HistoryLog { path, entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn append(&mut self, operation: &str, result: f64) -> Result<()> {
        let line = format!(
            "{}: {} = {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            operation,
            format_number(result)
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open history file {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("cannot write history file {}", self.path.display()))?;

        self.entries.push(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mcalc_{}_{}.txt", name, std::process::id()))
    }

    #[test]
    fn append_and_reload() {
        let path = temp_path("append_and_reload");
        let _ = fs::remove_file(&path);

        let mut log = HistoryLog::open(&path).unwrap();
        assert!(log.entries().is_empty());
        log.append("sum 2 3", 5.0).unwrap();
        log.append("div 1 4", 0.25).unwrap();

        let reloaded = HistoryLog::open(&path).unwrap();
        assert_eq!(reloaded.entries().len(), 2);
        assert!(reloaded.entries()[0].ends_with(": sum 2 3 = 5"));
        assert!(reloaded.entries()[1].ends_with(": div 1 4 = 0.25"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let path = temp_path("missing_file");
        let _ = fs::remove_file(&path);
        let log = HistoryLog::open(&path).unwrap();
        assert!(log.entries().is_empty());
    }
}
