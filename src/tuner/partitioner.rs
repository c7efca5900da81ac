//! Preserve-existing-unless-safe merge rule for the partitioner key.

/// Decide which partitioner the tuned document should carry.
///
/// An absent or empty on-disk value takes the desired one. The two standard
/// strategies (RandomPartitioner and Murmur3Partitioner) are safe to
/// reassert, so the desired value wins for those too. Any other existing
/// value names a deliberately chosen strategy on an already-provisioned node
/// and is kept verbatim: changing the partitioner under live data destroys
/// the cluster's key distribution.
pub fn resolve_partitioner(existing: Option<&str>, desired: &str) -> String {
    let existing = match existing {
        Some(value) if !value.is_empty() => value,
        _ => return desired.to_string(),
    };

    let lower = existing.to_lowercase();
    if lower.contains("randomparti") || lower.contains("murmur") {
        desired.to_string()
    } else {
        existing.to_string()
    }
}
