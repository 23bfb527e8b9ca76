//! Name search over an already loaded user list

use crate::models::UserRecord;

/// Users whose full name contains `query`, compared in lowercase
///
/// The query is matched as typed, whitespace included. An empty query keeps
/// every record.
pub fn filter_by_name(records: &[UserRecord], query: &str) -> Vec<UserRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| record.full_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
