//! Terminal UI utilities.
//!
//! A small box-drawing table used for batch summaries. Column widths are
//! content-sized and clamped to the terminal width, with ANSI colour codes
//! excluded from the measurement.

use colored::*;
use console::measure_text_width;

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

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        if self.headers.is_empty() {
            return;
        }

        let (_, term_width) = console::Term::stdout().size();
        // Per-column budget keeps even narrow terminals readable.
        let cap = ((term_width as usize).saturating_sub(4) / self.headers.len()).max(8);

        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| measure_text_width(h))
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(cell));
            }
        }
        for w in &mut widths {
            *w = (*w).min(cap);
        }

        let sep = |left: &str, mid: &str, right: &str| {
            let mut s = String::from("  ");
            s.push_str(left);
            for (i, w) in widths.iter().enumerate() {
                s.push_str(&"─".repeat(w + 2));
                s.push_str(if i + 1 < widths.len() { mid } else { right });
            }
            s
        };

        println!("{}", sep("┌", "┬", "┐"));
        self.print_row_cells(&self.headers, &widths, true);
        println!("{}", sep("├", "┼", "┤"));
        for row in &self.rows {
            self.print_row_cells(row, &widths, false);
        }
        println!("{}", sep("└", "┴", "┘"));
    }

    fn print_row_cells(&self, cells: &[String], widths: &[usize], bold: bool) {
        print!("  │");
        for (i, cell) in cells.iter().enumerate() {
            let shown = console::truncate_str(cell, widths[i], "...").to_string();
            let pad = widths[i].saturating_sub(measure_text_width(&shown));
            let text = if bold {
                shown.bold().to_string()
            } else {
                shown.to_string()
            };
            print!(" {}{} │", text, " ".repeat(pad));
        }
        println!();
    }
}
