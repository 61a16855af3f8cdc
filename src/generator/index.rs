//! Index ordering

use crate::content::IndexEntry;

/// File name of the site index inside the public directory.
pub const INDEX_FILE: &str = "index.html";

/// Sort entries newest first.
///
/// The sort is stable: entries with equal dates keep discovery order, and
/// entries whose date is missing or unparsable sink to the end, also in
/// discovery order.
pub fn sort_entries(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}
