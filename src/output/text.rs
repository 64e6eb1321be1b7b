//! Terminal summary of the hottest records.

use crate::aggregator::{message_text, PrecisionPolicy, RecordRef};

/// Truncate `text` to at most `width` characters, keeping the tail
fn tail(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        text.to_string()
    } else {
        let keep: String = text.chars().skip(count - (width - 3)).collect();
        format!("...{}", keep)
    }
}

/// Truncate `text` to at most `width` characters, keeping the head
fn head(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let keep: String = text.chars().take(width - 3).collect();
        format!("{}...", keep)
    }
}

/// Column widths of the summary table, borders excluded
const COLUMN_WIDTHS: [usize; 4] = [12, 9, 30, 50];

/// One horizontal rule of the table
fn border(left: char, mid: char, right: char) -> String {
    let cells: Vec<String> = COLUMN_WIDTHS.iter().map(|w| "━".repeat(*w)).collect();
    format!("  {}{}{}", left, cells.join(&mid.to_string()), right)
}

/// Render a boxed table of ranked records
///
/// `ranked` is expected hottest first (see `rank_by_hotness`).
pub fn generate_text_summary(
    ranked: &[RecordRef<'_>],
    policy: &PrecisionPolicy,
    max_lines: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push("  HOTTEST OPTIMIZATION RECORDS".to_string());
    lines.push(border('┏', '┳', '┓'));
    lines.push(format!(
        "  ┃ {:>10} ┃ {:<7} ┃ {:<28} ┃ {:<48} ┃",
        "COUNT", "KIND", "LOCATION", "MESSAGE"
    ));
    lines.push(border('┣', '╋', '┫'));

    for r in ranked.iter().take(max_lines) {
        let count = policy
            .hotness(r.record)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let location = r
            .record
            .location()
            .map(|loc| loc.to_string())
            .unwrap_or_default();

        lines.push(format!(
            "  ┃ {:>10} ┃ {:<7} ┃ {:<28} ┃ {:<48} ┃",
            count,
            head(r.record.kind.as_str(), 7),
            tail(&location, 28),
            head(&message_text(r.record), 48)
        ));
    }

    lines.push(border('┗', '┻', '┛'));

    if ranked.len() > max_lines {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} records)",
            max_lines,
            ranked.len()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation() {
        assert_eq!(tail("src/very/long/path.c:1:1", 10), "...h.c:1:1");
        assert_eq!(head("loop vectorized", 8), "loop ...");
        assert_eq!(head("short", 8), "short");
    }
}
