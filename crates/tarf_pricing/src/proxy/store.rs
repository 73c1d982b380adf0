//! Observation storage for proxy-surface regression.
//!
//! While paths are simulated, every open fixing contributes one
//! observation per path: the spot at the fixing and the discounted
//! value of the remainder of that path. Observations are binned along
//! two axes, fixing row and accumulated-amount bucket, and kept sorted
//! by spot so the regression stages can slice them without re-sorting.

/// One simulated data point for the regression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Spot at the fixing.
    pub spot: f64,
    /// Discounted residual payoff of the path from this fixing on.
    pub value: f64,
}

/// Lower fences of the accumulated-amount buckets.
///
/// The `buckets` fences divide `[accumulated, target)` uniformly, with
/// the first fence forced to zero so that any amount below the second
/// fence lands in the first bucket. Amounts at or beyond `target` land
/// in the last bucket.
///
/// # Examples
///
/// ```rust
/// use tarf_pricing::proxy::bucket_limits;
///
/// let limits = bucket_limits(0.0, 1.0, 5);
/// assert_eq!(limits, vec![0.0, 0.2, 0.4, 0.6, 0.8]);
/// ```
pub fn bucket_limits(accumulated: f64, target: f64, buckets: usize) -> Vec<f64> {
    let span = target - accumulated;
    let mut limits: Vec<f64> = (0..buckets)
        .map(|i| accumulated + i as f64 / buckets as f64 * span)
        .collect();
    limits[0] = 0.0;
    limits
}

/// Index of the bucket whose fence interval contains `accumulated`.
///
/// Buckets are left-closed: an amount equal to a fence belongs to that
/// fence's bucket.
pub fn bucket_index(limits: &[f64], accumulated: f64) -> usize {
    limits
        .partition_point(|&fence| fence <= accumulated)
        .saturating_sub(1)
}

/// Per-(fixing row, bucket) collections of spot-sorted observations.
///
/// Rows are ordered by time to the next fixing: row 0 holds the last
/// chronological fixing (shortest residual path), the highest row the
/// first. Each worker batch fills its own store; batches are then
/// merged in batch order so the final contents are independent of
/// thread scheduling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationStore {
    rows: usize,
    buckets: usize,
    limits: Vec<f64>,
    cells: Vec<Vec<Observation>>,
}

impl ObservationStore {
    /// Creates an empty store with `rows` fixing rows and one bucket
    /// per fence in `limits`.
    pub fn new(rows: usize, limits: Vec<f64>) -> Self {
        let buckets = limits.len();
        Self {
            rows,
            buckets,
            limits,
            cells: vec![Vec::new(); rows * buckets],
        }
    }

    /// Number of fixing rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of accumulated-amount buckets.
    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// The bucket fences.
    #[inline]
    pub fn limits(&self) -> &[f64] {
        &self.limits
    }

    /// Observations in one cell, sorted ascending by spot.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `bucket` is out of range.
    pub fn cell(&self, row: usize, bucket: usize) -> &[Observation] {
        assert!(row < self.rows && bucket < self.buckets);
        &self.cells[row * self.buckets + bucket]
    }

    /// Total observations across all buckets of one row.
    pub fn row_total(&self, row: usize) -> usize {
        let start = row * self.buckets;
        self.cells[start..start + self.buckets]
            .iter()
            .map(Vec::len)
            .sum()
    }

    /// Files one observation under `row` and the bucket of
    /// `accumulated`, preserving the spot ordering of the cell.
    ///
    /// Equal spots keep insertion order, which is what makes the final
    /// contents reproducible.
    pub fn record(&mut self, row: usize, accumulated: f64, observation: Observation) {
        let bucket = bucket_index(&self.limits, accumulated);
        let cell = &mut self.cells[row * self.buckets + bucket];
        let at = cell.partition_point(|o| o.spot <= observation.spot);
        cell.insert(at, observation);
    }

    /// Absorbs another store filled against the same rows and limits.
    ///
    /// Cells merge stably: on equal spots, this store's observations
    /// stay ahead of the other's. Merging batch stores in batch order
    /// therefore reproduces the sequential fill exactly.
    pub fn merge_from(&mut self, other: ObservationStore) {
        debug_assert_eq!(self.rows, other.rows);
        debug_assert_eq!(self.limits, other.limits);

        for (mine, theirs) in self.cells.iter_mut().zip(other.cells) {
            if theirs.is_empty() {
                continue;
            }
            if mine.is_empty() {
                *mine = theirs;
                continue;
            }
            let merged = merge_sorted(mine, &theirs);
            *mine = merged;
        }
    }

    /// Consumes the store into per-row, per-bucket observation vectors.
    pub fn into_rows(self) -> Vec<Vec<Vec<Observation>>> {
        let buckets = self.buckets;
        let mut iter = self.cells.into_iter();
        (0..self.rows)
            .map(|_| iter.by_ref().take(buckets).collect())
            .collect()
    }
}

/// Stable two-way merge of spot-sorted cells; `a` wins ties.
pub(crate) fn merge_sorted(a: &[Observation], b: &[Observation]) -> Vec<Observation> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].spot <= b[j].spot {
            merged.push(a[i]);
            i += 1;
        } else {
            merged.push(b[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}
