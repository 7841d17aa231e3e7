use super::resolver::Partition;

/// Share of known users available for a slot, in percent. `None` when no user
/// is known, which callers treat as "nothing to recommend".
pub fn availability_percentage(partition: &Partition) -> Option<f64> {
    let total = partition.total();
    if total == 0 {
        return None;
    }
    Some(partition.available.len() as f64 / total as f64 * 100.0)
}
