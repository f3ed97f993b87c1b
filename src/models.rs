use serde::{Deserialize, Serialize};

use crate::source::JobRow;

/// Longest description a listing will carry. Anything past this is cut off
/// with no ellipsis.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

/// One normalized job posting. Every field is a string and always present;
/// columns the source did not fill in come through as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub company: String,
    pub city: String,
    pub state: String,
    pub date_posted: String,
    pub job_url: String,
    pub description: String,
}

impl Listing {
    pub fn from_row(row: &JobRow) -> Self {
        Self {
            title: row.text("title"),
            company: row.text("company_name"),
            city: row.text("city"),
            state: row.text("state"),
            date_posted: row.text("date_posted"),
            job_url: row.text("job_url"),
            description: truncate_chars(&row.text("description"), DESCRIPTION_MAX_CHARS),
        }
    }
}

/// Prefix cut after at most `max` characters, always on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
