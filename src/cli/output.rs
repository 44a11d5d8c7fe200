//! Output formatting for the flowlog-stacks CLI
//!
//! Human output is colored unless disabled; JSON output emits one document
//! per call so results can be piped into other tools.

use colored::Colorize;
use serde_json::Value;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Output formatter for different output modes
pub struct OutputFormatter {
    /// Use colored output
    use_color: bool,
    /// JSON output mode
    json_mode: bool,
    /// Verbosity level
    verbosity: u8,
    /// Start time for duration calculations
    start_time: Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(use_color: bool, json_mode: bool, verbosity: u8) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();

        Self {
            use_color,
            json_mode,
            verbosity,
            start_time: Instant::now(),
        }
    }

    /// True when JSON output was requested
    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Print a banner/header
    pub fn banner(&self, title: &str) {
        if self.json_mode {
            return;
        }

        let line = "=".repeat(title.len() + 4);
        if self.use_color {
            println!("\n{}", line.bright_blue());
            println!("{}", format!("  {title}  ").bright_blue().bold());
            println!("{}\n", line.bright_blue());
        } else {
            println!("\n{line}");
            println!("  {title}  ");
            println!("{line}\n");
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("\n{}", title.cyan().bold());
            println!("{}", "-".repeat(title.len()).cyan());
        } else {
            println!("\n{title}");
            println!("{}", "-".repeat(title.len()));
        }
    }

    /// Print a stack header
    pub fn stack_header(&self, stack_name: &str) {
        if self.json_mode {
            return;
        }

        let header = format!("STACK [{stack_name}]");
        let stars = "*".repeat(80_usize.saturating_sub(header.len()));

        if self.use_color {
            println!("\n{} {}", header.bright_white().bold(), stars.bright_black());
        } else {
            println!("\n{header} {stars}");
        }
    }

    /// Emit a JSON document (pretty-printed)
    pub fn json(&self, value: &Value) {
        println!("{value:#}");
    }

    /// Print raw text exactly as given (documents, DOT graphs)
    pub fn raw(&self, text: &str) {
        println!("{text}");
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.json_mode {
            let err = serde_json::json!({
                "type": "error",
                "message": message
            });
            eprintln!("{err}");
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "ERROR:".red().bold(), message);
        } else {
            eprintln!("ERROR: {message}");
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.json_mode {
            let warn = serde_json::json!({
                "type": "warning",
                "message": message
            });
            eprintln!("{warn}");
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "WARNING:".yellow().bold(), message);
        } else {
            eprintln!("WARNING: {message}");
        }
    }

    /// Print a hint message
    pub fn hint(&self, message: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            eprintln!("{} {}", "HINT:".cyan().bold(), message);
        } else {
            eprintln!("HINT: {message}");
        }
    }

    /// Print an info message (respects verbosity)
    pub fn info(&self, message: &str) {
        if self.verbosity < 1 || self.json_mode {
            return;
        }

        if self.use_color {
            println!("{} {}", "INFO:".blue(), message);
        } else {
            println!("INFO: {message}");
        }
    }

    /// Print a debug message (requires higher verbosity)
    pub fn debug(&self, message: &str) {
        if self.verbosity < 2 || self.json_mode {
            return;
        }

        if self.use_color {
            println!("{} {}", "DEBUG:".magenta(), message);
        } else {
            println!("DEBUG: {message}");
        }
    }

    /// Print a success line
    pub fn success(&self, message: &str) {
        if self.json_mode {
            return;
        }

        if self.use_color {
            println!("{}", message.green().bold());
        } else {
            println!("{message}");
        }
    }

    /// Print a list of items
    pub fn list(&self, title: &str, items: &[String]) {
        if self.use_color {
            println!("\n{}:", title.bright_white().bold());
        } else {
            println!("\n{title}:");
        }

        for item in items {
            if self.use_color {
                println!("  {} {}", "-".bright_black(), item);
            } else {
                println!("  - {item}");
            }
        }
    }

    /// Print a table
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        // Calculate column widths
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let header_line = join_cells(headers.iter().copied(), &widths);
        if self.use_color {
            println!("{}", header_line.bright_white().bold());
        } else {
            println!("{header_line}");
        }

        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        if self.use_color {
            println!("{}", sep.join("-+-").bright_black());
        } else {
            println!("{}", sep.join("-+-"));
        }

        for row in rows {
            println!("{}", join_cells(row.iter().map(String::as_str), &widths));
        }
    }

    /// Print how long the command took
    pub fn elapsed(&self, what: &str) {
        if self.json_mode {
            return;
        }

        let duration_str = format_duration(self.start_time.elapsed());
        if self.use_color {
            println!("\n{} {}", format!("{what} took").bright_black(), duration_str.bright_white());
        } else {
            println!("\n{what} took {duration_str}");
        }
    }

    /// Flush stdout
    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Format a duration as a human-readable string
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_join_cells_pads_columns() {
        let line = join_cells(["a", "bb"].into_iter(), &[3, 2]);
        assert_eq!(line, "a   | bb");
    }

    #[test]
    fn test_json_mode_flag() {
        assert!(OutputFormatter::new(false, true, 0).is_json());
        assert!(!OutputFormatter::new(false, false, 0).is_json());
    }
}
