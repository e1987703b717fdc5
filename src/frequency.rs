//! Byte frequency analysis

use std::thread;

/// Occurrence count for each of the 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; 256] }
    }
}

impl FrequencyTable {
    /// Count every byte of `data` in a single pass.
    pub fn count(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &b in data {
            table.counts[b as usize] += 1;
        }
        table
    }

    /// Count `data` in shards on scoped threads and merge the results.
    ///
    /// Produces exactly the same table as [`FrequencyTable::count`]; each
    /// thread gets at least `shard_size` bytes.
    pub fn count_parallel(data: &[u8], shard_size: usize) -> Self {
        let threads = thread::available_parallelism().map_or(1, |n| n.get());
        let chunk = shard_size.max(data.len().div_ceil(threads)).max(1);
        if data.len() <= chunk {
            return Self::count(data);
        }

        thread::scope(|scope| {
            let handles: Vec<_> = data
                .chunks(chunk)
                .map(|shard| scope.spawn(move || Self::count(shard)))
                .collect();

            let mut table = Self::default();
            for handle in handles {
                match handle.join() {
                    Ok(partial) => table.merge(&partial),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            table
        })
    }

    /// Add the counts of `other` into `self`.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Symbols with a non-zero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(i, &c)| (i as u8, c))
    }

    /// Number of distinct symbols present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts, equal to the length of the counted input.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_basic() {
        let table = FrequencyTable::count(b"aaaabbbcc");
        assert_eq!(table.get(b'a'), 4);
        assert_eq!(table.get(b'b'), 3);
        assert_eq!(table.get(b'c'), 2);
        assert_eq!(table.get(b'd'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 9);
    }

    #[test]
    fn test_count_empty() {
        let table = FrequencyTable::count(b"");
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_iter_ascending() {
        let table = FrequencyTable::count(b"zyxzz");
        let symbols: Vec<(u8, u64)> = table.iter().collect();
        assert_eq!(symbols, vec![(b'x', 1), (b'y', 1), (b'z', 3)]);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let serial = FrequencyTable::count(&data);
        assert_eq!(FrequencyTable::count_parallel(&data, 1000), serial);
        assert_eq!(FrequencyTable::count_parallel(&data, 1), serial);
        assert_eq!(FrequencyTable::count_parallel(&data, usize::MAX), serial);
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = FrequencyTable::count(b"hello");
        let b = FrequencyTable::count(b"world");
        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab, FrequencyTable::count(b"helloworld"));
    }
}
