//! Adaptive merging of data-starved accumulated-amount buckets.
//!
//! High buckets only fill on paths that accumulate quickly, so their
//! observation counts can be tiny. Before regression, contiguous
//! buckets pool into groups large enough to fit on, and every bucket in
//! a group later shares the group's single proxy function.

use std::ops::Range;

/// Partitions bucket indices into contiguous groups dense enough for
/// regression.
///
/// Scanning from the lowest bucket, a group absorbs neighbours until
/// `density x group_size >= total` and the group can feed both
/// regression segments (`group_size >= 2 x min_points`). If the final
/// group comes up short, it folds into its predecessor, so only a
/// globally sparse fixing can yield a single under-dense group.
pub(crate) fn group_buckets(
    sizes: &[usize],
    density: usize,
    min_points: usize,
) -> Vec<Range<usize>> {
    let total: usize = sizes.iter().sum();
    let mut groups: Vec<Range<usize>> = Vec::new();

    let mut start = 0;
    while start < sizes.len() {
        let mut end = start + 1;
        let mut size = sizes[start];
        while end < sizes.len() && (density * size < total || size < 2 * min_points) {
            size += sizes[end];
            end += 1;
        }
        groups.push(start..end);
        start = end;
    }

    if groups.len() >= 2 {
        let last = &groups[groups.len() - 1];
        let tail: usize = sizes[last.start..last.end].iter().sum();
        if density * tail < total || tail < 2 * min_points {
            let end = last.end;
            groups.truncate(groups.len() - 1);
            if let Some(previous) = groups.last_mut() {
                previous.end = end;
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_sizes(sizes: &[usize], groups: &[Range<usize>]) -> Vec<usize> {
        groups
            .iter()
            .map(|g| sizes[g.start..g.end].iter().sum())
            .collect()
    }

    #[test]
    fn test_dense_buckets_stay_separate() {
        // 1000 points over 5 even buckets at density 10: each bucket
        // already clears the 100-point floor on its own
        let sizes = [200, 200, 200, 200, 200];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..1, 1..2, 2..3, 3..4, 4..5]);
    }

    #[test]
    fn test_sparse_buckets_merge_pairwise() {
        // 20 points total: density is satisfied by 2 points, but the
        // regression floor of 3 per segment forces pairs
        let sizes = [4, 4, 4, 4, 4];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..2, 2..5]);
    }

    #[test]
    fn test_empty_tail_folds_into_predecessor() {
        let sizes = [1000, 0, 0, 0, 0];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..5]);
    }

    #[test]
    fn test_dense_tail_survives_on_its_own() {
        let sizes = [500, 0, 0, 0, 500];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..1, 1..5]);
    }

    #[test]
    fn test_interior_mass_absorbs_leading_empties() {
        let sizes = [0, 0, 1000, 0, 0];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..5]);
    }

    #[test]
    fn test_all_empty_collapses_to_one_group() {
        let sizes = [0, 0, 0];
        let groups = group_buckets(&sizes, 10, 3);
        assert_eq!(groups, vec![0..3]);
    }

    #[test]
    fn test_single_bucket() {
        let groups = group_buckets(&[7], 10, 3);
        assert_eq!(groups, vec![0..1]);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_grouping_preserves_total_count(
                sizes in prop::collection::vec(0usize..400, 1..12),
                density in 1usize..40,
                min_points in 3usize..8
            ) {
                let groups = group_buckets(&sizes, density, min_points);
                let total: usize = sizes.iter().sum();
                let grouped: usize = group_sizes(&sizes, &groups).iter().sum();
                prop_assert_eq!(grouped, total);
            }

            #[test]
            fn test_groups_are_contiguous_and_cover_all_buckets(
                sizes in prop::collection::vec(0usize..400, 1..12),
                density in 1usize..40,
                min_points in 3usize..8
            ) {
                let groups = group_buckets(&sizes, density, min_points);
                prop_assert!(!groups.is_empty());
                prop_assert_eq!(groups[0].start, 0);
                prop_assert_eq!(groups[groups.len() - 1].end, sizes.len());
                for pair in groups.windows(2) {
                    prop_assert_eq!(pair[0].end, pair[1].start);
                    prop_assert!(pair[0].start < pair[0].end);
                }
            }

            #[test]
            fn test_multi_group_partitions_are_dense_everywhere(
                sizes in prop::collection::vec(0usize..400, 2..12),
                density in 1usize..40,
                min_points in 3usize..8
            ) {
                let total: usize = sizes.iter().sum();
                let groups = group_buckets(&sizes, density, min_points);
                // Only a lone group may be sparse; the tail fold keeps
                // any multi-group partition dense throughout
                if groups.len() >= 2 {
                    for group in &groups {
                        let size: usize = sizes[group.start..group.end].iter().sum();
                        prop_assert!(density * size >= total);
                        prop_assert!(size >= 2 * min_points);
                    }
                }
            }
        }
    }
}
