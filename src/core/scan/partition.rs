//! Index-range partitioning for scan workers

use std::ops::Range;

/// Split `0..total` into exactly `workers` contiguous ranges
///
/// The chunk size is `total / workers + 1`, so the last busy worker takes the
/// remainder and trailing workers may get an empty range `total..total`.
/// A worker count of 0 is treated as 1.
///
/// # Example
///
/// ```
/// use wallet_ledger::core::scan::partition;
///
/// assert_eq!(partition(7, 3), vec![0..3, 3..6, 6..7]);
/// ```
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let chunk = total / workers + 1;

    (0..workers)
        .map(|worker| {
            let start = worker.saturating_mul(chunk).min(total);
            let end = start.saturating_add(chunk).min(total);
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_single(0, 1, vec![0..0])]
    #[case::empty_many(0, 3, vec![0..0, 0..0, 0..0])]
    #[case::zero_workers(7, 0, vec![0..7])]
    #[case::one_worker(3, 1, vec![0..3])]
    #[case::remainder_in_last(7, 3, vec![0..3, 3..6, 6..7])]
    #[case::trailing_idle(6, 3, vec![0..3, 3..6, 6..6])]
    #[case::more_workers_than_items(2, 4, vec![0..1, 1..2, 2..2, 2..2])]
    #[case::half_idle(
        10,
        10,
        vec![0..2, 2..4, 4..6, 6..8, 8..10, 10..10, 10..10, 10..10, 10..10, 10..10]
    )]
    fn test_partition_ranges(
        #[case] total: usize,
        #[case] workers: usize,
        #[case] expected: Vec<Range<usize>>,
    ) {
        assert_eq!(partition(total, workers), expected);
    }

    #[rstest]
    fn test_partition_covers_every_index_once(
        #[values(0, 1, 5, 99, 1000)] total: usize,
        #[values(0, 1, 2, 3, 8, 64)] workers: usize,
    ) {
        let ranges = partition(total, workers);

        assert_eq!(ranges.len(), workers.max(1));
        let covered: Vec<usize> = ranges.into_iter().flatten().collect();
        assert_eq!(covered, (0..total).collect::<Vec<_>>());
    }
}
