//! Console table rendering.
//!
//! Layout:
//!
//! ```text
//! ──────────────────────────────────────────────────────────────
//! Case                │     candidate     │     image-rs      │
//!                     │   Size     Time   │   Size     Time   │
//! ──────────────────────────────────────────────────────────────
//! gradient            │    1 234    4.2ms │    1 100   12.9ms │
//! ──────────────────────────────────────────────────────────────
//! Totals (bytes):
//!   candidate: 1 234
//! ```
//!
//! Best values per row are green, the rest red. A backend with no result for
//! a case shows a dash.

use std::fmt::Write as _;
use std::time::Duration;

use crate::eval::report::{BenchReport, BenchmarkCase};

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// Minimum width of the case-name column.
const NAME_WIDTH: usize = 20;
/// Width of the size and time sub-columns.
const VALUE_WIDTH: usize = 9;
/// Width of one backend column: size, a space, time.
const CELL_WIDTH: usize = VALUE_WIDTH * 2 + 1;

/// Placeholder for a backend absent from a case.
pub const PLACEHOLDER: &str = "–";

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    /// Emit ANSI colors for best/other values.
    pub color: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TableStyle {
    /// Plain output without escape codes.
    #[must_use]
    pub fn plain() -> Self {
        Self { color: false }
    }
}

/// Format a byte count with space-separated thousands: `1234567` -> `1 234 567`.
#[must_use]
pub fn human_readable_bytes(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format a duration as milliseconds with one decimal: `  12.3ms`.
#[must_use]
pub fn format_millis(duration: Duration) -> String {
    format!("{:6.1}ms", duration.as_secs_f64() * 1e3)
}

/// One-line summary printed before the table.
#[must_use]
pub fn render_banner(report: &BenchReport) -> String {
    format!(
        "Benchmarking {} images using: {}\n",
        report.cases.len(),
        report.available_backends().join(", ")
    )
}

/// Render the comparison table and totals block.
#[must_use]
pub fn render(report: &BenchReport, style: &TableStyle) -> String {
    let backends: Vec<&str> = report.backend_names().collect();
    let name_width = report
        .cases
        .iter()
        .map(|c| c.name().chars().count())
        .max()
        .unwrap_or(0)
        .max(NAME_WIDTH);
    let rule = "─".repeat(name_width + backends.len() * (CELL_WIDTH + 1));

    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let header: String = backends
        .iter()
        .map(|b| format!("{b:^CELL_WIDTH$}│"))
        .collect();
    let _ = writeln!(out, "{:name_width$}│{header}", "Case");
    let units: String = backends
        .iter()
        .map(|_| format!("{:^CELL_WIDTH$}│", "Size     Time"))
        .collect();
    let _ = writeln!(out, "{:name_width$}│{units}", "");
    let _ = writeln!(out, "{rule}");

    for case in &report.cases {
        let cells: String = backends
            .iter()
            .map(|b| format!("{}│", render_cell(case, b, style)))
            .collect();
        let _ = writeln!(out, "{:name_width$}│{cells}", case.name());
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Totals (bytes):");
    let label_width = backends.iter().map(|b| b.len()).max().unwrap_or(0).max(8);
    for total in report.totals() {
        let _ = writeln!(
            out,
            "  {:label_width$}: {}",
            total.backend,
            human_readable_bytes(total.bytes)
        );
    }
    let _ = writeln!(out, "{rule}");

    out
}

fn render_cell(case: &BenchmarkCase, backend: &str, style: &TableStyle) -> String {
    let Some(m) = case.get(backend) else {
        return format!("{PLACEHOLDER:^CELL_WIDTH$}");
    };

    let size = format!("{:>VALUE_WIDTH$}", human_readable_bytes(m.size));
    let time = format!("{:>VALUE_WIDTH$}", format_millis(m.duration));

    format!(
        "{} {}",
        highlight(&size, case.is_best_size(backend), style),
        highlight(&time, case.is_best_duration(backend), style)
    )
}

fn highlight(text: &str, best: bool, style: &TableStyle) -> String {
    if !style.color {
        return text.to_string();
    }
    let color = if best { GREEN } else { RED };
    format!("{color}{text}{RESET}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Requirement;
    use crate::eval::report::fixtures::{case, info, report};

    #[test]
    fn test_human_readable_bytes() {
        assert_eq!(human_readable_bytes(0), "0");
        assert_eq!(human_readable_bytes(999), "999");
        assert_eq!(human_readable_bytes(1000), "1 000");
        assert_eq!(human_readable_bytes(123_456), "123 456");
        assert_eq!(human_readable_bytes(1_234_567), "1 234 567");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Duration::from_micros(12_345)), "  12.3ms");
        assert_eq!(format_millis(Duration::from_millis(1500)), "1500.0ms");
    }

    fn sample() -> BenchReport {
        report(
            vec![
                info("A", Requirement::Mandatory, true),
                info("B", Requirement::Mandatory, true),
                info("C", Requirement::Optional, false),
            ],
            vec![case("gradient", &[("A", 100, 5), ("B", 100, 9)])],
        )
    }

    #[test]
    fn test_row_has_placeholder_for_absent_backend() {
        let text = render(&sample(), &TableStyle::plain());
        let row = text.lines().find(|l| l.starts_with("gradient")).unwrap();
        let cells: Vec<&str> = row.split('│').collect();

        // name, A, B, C, trailing empty
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[1].trim(), "100     5.0ms");
        assert_eq!(cells[2].trim(), "100     9.0ms");
        assert_eq!(cells[3].trim(), PLACEHOLDER);
        assert_eq!(cells[1].chars().count(), CELL_WIDTH);
        assert_eq!(cells[3].chars().count(), CELL_WIDTH);
    }

    #[test]
    fn test_totals_block_lists_participants_only() {
        let text = render(&sample(), &TableStyle::plain());
        let totals: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "Totals (bytes):")
            .skip(1)
            .take_while(|l| l.starts_with("  "))
            .collect();
        assert_eq!(totals, ["  A       : 100", "  B       : 100"]);
    }

    #[test]
    fn test_colors_mark_ties() {
        let text = render(&sample(), &TableStyle::default());
        let row = text.lines().find(|l| l.starts_with("gradient")).unwrap();

        // Both sizes tie for best; only A has the best time.
        assert_eq!(row.matches(GREEN).count(), 3);
        assert_eq!(row.matches(RED).count(), 1);
    }

    #[test]
    fn test_banner() {
        assert_eq!(render_banner(&sample()), "Benchmarking 1 images using: A, B\n");
    }

    #[test]
    fn test_long_names_widen_column() {
        let long = "a-very-long-case-name-that-exceeds";
        let report = report(
            vec![info("A", Requirement::Mandatory, true)],
            vec![case(long, &[("A", 1, 1)])],
        );
        let text = render(&report, &TableStyle::plain());
        let row = text.lines().find(|l| l.starts_with(long)).unwrap();
        assert!(row.starts_with(&format!("{long}│")));
    }
}
