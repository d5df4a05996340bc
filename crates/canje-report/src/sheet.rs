//! Output table naming.

use std::collections::BTreeSet;

/// Maximum sheet name length of spreadsheet workbooks.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Replaces characters spreadsheets reject and caps the length.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.is_empty() {
        "SHEET".to_string()
    } else {
        cleaned
    }
}

/// Hands out sanitized names that are unique within one bundle.
///
/// Names are compared case-insensitively, as workbooks do. A clash gets a
/// `_2`, `_3`, ... suffix, shortening the base so the cap still holds.
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: BTreeSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.taken.insert(base.to_uppercase()) {
            return base;
        }
        let mut counter = 2usize;
        loop {
            let suffix = format!("_{counter}");
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.taken.insert(candidate.to_uppercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}
