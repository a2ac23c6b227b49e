use std::collections::BTreeMap;

use crate::model::TransactionRecord;

/// Partition transactions by owning client id, preserving input order
/// within each group. Rows with no resolvable id are dropped, not
/// assigned to an "unknown" bucket.
pub fn group_by_client(txns: &[TransactionRecord]) -> BTreeMap<String, Vec<TransactionRecord>> {
    let mut groups: BTreeMap<String, Vec<TransactionRecord>> = BTreeMap::new();
    for txn in txns {
        let Some(id) = txn.client_id.as_deref() else {
            continue;
        };
        groups.entry(id.to_string()).or_default().push(txn.clone());
    }
    groups
}
