//! Live row filtering.

use crate::render::{Row, Table};

/// Show rows whose visible text contains `query`, ignoring case; hide the rest.
///
/// Every row is re-evaluated, so the result never depends on an earlier
/// query. An empty query shows all rows. Returns the number of visible rows.
pub fn filter(rows: &mut [Row], query: &str) -> usize {
    let needle = query.to_lowercase();
    let mut visible = 0;

    for row in rows.iter_mut() {
        row.hidden = !row.text().to_lowercase().contains(&needle);
        if !row.hidden {
            visible += 1;
        }
    }

    tracing::trace!(query, visible, total = rows.len(), "rows filtered");
    visible
}

impl Table {
    /// Apply [`filter`] to this table's rows.
    pub fn apply_filter(&mut self, query: &str) -> usize {
        filter(&mut self.rows, query)
    }
}
