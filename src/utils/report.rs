// src/utils/report.rs

//! Console report formatting for CLI output.
//!
//! Diagnostics go through the `log` facade; this module only renders the
//! results a user asked for (listings, details, summaries) on stdout.

const WIDTH: usize = 60;

/// Format a boxed header.
pub fn format_header(title: &str) -> String {
    let border = "═".repeat(WIDTH);
    format!("{border}\n  {title}\n{border}")
}

/// Format an indented sub-item.
pub fn format_sub_item(message: &str) -> String {
    format!("    {message}")
}

/// Format a titled key/value summary.
pub fn format_summary(title: &str, items: &[(&str, String)]) -> String {
    let mut out = format!("[SUMMARY] {title}");
    for (key, value) in items {
        out.push_str(&format!("\n    {key}: {value}"));
    }
    out
}

/// Print a header
pub fn header(title: &str) {
    println!("{}", format_header(title));
}

/// Print a separator line
pub fn separator() {
    println!("{}", "─".repeat(WIDTH));
}

/// Print a line
pub fn line(message: &str) {
    println!("{message}");
}

/// Print a sub-item (indented)
pub fn sub_item(message: &str) {
    println!("{}", format_sub_item(message));
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("{}", format_summary(title, items));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_header() {
        let header = format_header("Schools");
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  Schools");
        assert_eq!(lines[0].chars().count(), WIDTH);
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(
            "Directory",
            &[("Matches", "3".to_string()), ("Page", "1/1".to_string())],
        );
        assert_eq!(
            summary,
            "[SUMMARY] Directory\n    Matches: 3\n    Page: 1/1"
        );
    }

    #[test]
    fn test_format_sub_item() {
        assert_eq!(format_sub_item("Bole"), "    Bole");
    }
}
