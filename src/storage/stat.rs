//! Cache Usage Statistics
//!
//! Running counters describing the store's contents. The counters are kept
//! under the same lock as the store itself (see `memory`), so a snapshot read
//! after a mutation's lock is released always matches the actual contents.

/// A snapshot of the store's contents: how many entries are live and how many
/// value bytes they hold in total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStat {
    /// Number of live entries
    pub entries: u64,

    /// Sum of the lengths of all live values, in bytes
    pub value_bytes: u64,
}

impl CacheStat {
    /// Accounts for a newly inserted entry.
    pub(crate) fn add(&mut self, value_len: usize) {
        self.entries += 1;
        self.value_bytes += value_len as u64;
    }

    /// Removes a destroyed entry's contribution.
    ///
    /// Must be balanced against a prior `add` for the same entry.
    pub(crate) fn remove(&mut self, value_len: usize) {
        self.entries -= 1;
        self.value_bytes -= value_len as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut stat = CacheStat::default();

        stat.add(3);
        stat.add(5);
        assert_eq!(stat.entries, 2);
        assert_eq!(stat.value_bytes, 8);

        stat.remove(3);
        assert_eq!(stat.entries, 1);
        assert_eq!(stat.value_bytes, 5);

        stat.remove(5);
        assert_eq!(stat, CacheStat::default());
    }

    #[test]
    fn test_empty_value_counts_entry_only() {
        let mut stat = CacheStat::default();
        stat.add(0);
        assert_eq!(stat.entries, 1);
        assert_eq!(stat.value_bytes, 0);
    }
}
