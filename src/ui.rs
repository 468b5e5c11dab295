//! Terminal UI helpers: box-drawn tables and progress spinners.
//!
//! ## Example
//!
//! ```rust
//! use extsync::ui::Table;
//!
//! let mut table = Table::new(&["Name", "Pinned"]);
//! table.add_row(vec!["glfw".to_string(), "3.3.9".to_string()]);
//! table.print();
//! ```

use colored::*;
use console::{measure_text_width, truncate_str};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while an external command runs.
///
/// Hidden automatically when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷ "),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(measure_text_width(&flatten(cell)));
            }
        }
        shrink_to_fit(&mut widths, max_width);

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: Vec<String>| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| {
                    let cell = truncate_str(cell, w, "...");
                    let pad = w.saturating_sub(measure_text_width(&cell));
                    format!(" {}{} ", cell, " ".repeat(pad))
                })
                .collect();
            format!("  │{}│", padded.join("│"))
        };

        let mut out = vec![rule("┌", "┬", "┐")];
        out.push(line(
            self.headers.iter().map(|h| h.bold().to_string()).collect(),
        ));
        out.push(rule("├", "┼", "┤"));
        for row in &self.rows {
            out.push(line(row.iter().map(|c| flatten(c)).collect()));
        }
        out.push(rule("└", "┴", "┘"));
        out
    }

    pub fn print(&self) {
        let (_rows, cols) = console::Term::stdout().size();
        for line in self.render(cols as usize) {
            println!("{}", line);
        }
    }
}

fn flatten(s: &str) -> String {
    s.replace(['\n', '\r', '\t'], " ")
}

/// Narrow the widest columns (never below 8) until the table fits.
fn shrink_to_fit(widths: &mut [usize], max_width: usize) {
    let overhead = 3 + 3 * widths.len();
    let available = max_width.saturating_sub(overhead);
    while widths.iter().sum::<usize>() > available {
        let Some(widest) = widths.iter_mut().max() else {
            return;
        };
        if *widest <= 8 {
            return;
        }
        *widest -= 1;
    }
}
