//! Spreadsheet paste parsing.
//!
//! Excel and Sheets put one row per line on the clipboard with cells
//! separated by tabs. We take the first two cells as `name` and `table`,
//! ignore anything past the second tab, and skip lines where both cells
//! are blank.

use crate::guest::GuestDraft;

/// Parse clipboard text into guest drafts, in input order. CRLF and LF
/// line endings are both accepted.
pub fn parse_paste(text: &str) -> Vec<GuestDraft> {
    text.trim()
        .lines()
        .filter_map(|line| {
            let mut cells = line.split('\t');
            let full_name = cells.next().unwrap_or("").trim();
            let table_label = cells.next().unwrap_or("").trim();
            if full_name.is_empty() && table_label.is_empty() {
                return None;
            }
            Some(GuestDraft {
                full_name: full_name.to_string(),
                table_label: table_label.to_string(),
            })
        })
        .collect()
}
